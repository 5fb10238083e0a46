//! In-memory [`ArgumentApi`] for tests.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::time::Duration;
use async_trait::async_trait;
use ar_core::{
    ArgumentApi, ArgumentContext, ArgumentPage, AspectSpace, Error, Explanation, RawArgument,
    RawAspect, RawPremise, Result, Stance,
};

/// A request as seen by [`MockApi`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    TotalSize(String),
    Page { query: String, page: u64, page_size: u64 },
    AspectSpace(String),
}

/// Serves a fixed list of arguments page by page and records every request.
#[derive(Debug, Default)]
pub struct MockApi {
    total: Option<u64>,
    arguments: Vec<RawArgument>,
    aspect_space: AspectSpace,
    fail_total: bool,
    fail_aspects: bool,
    fail_page: Option<u64>,
    empty_from_page: Option<u64>,
    page_delays: HashMap<u64, Duration>,
    stalled_queries: HashSet<String>,
    requests: Mutex<Vec<Request>>,
}

/// A raw argument whose conclusion is `argument {index}`.
pub fn raw_argument(index: usize) -> RawArgument {
    RawArgument {
        conclusion: format!("argument {}", index),
        premises: vec![RawPremise {
            text: format!("premise {}", index),
        }],
        stance: if index % 2 == 0 { Stance::Pro } else { Stance::Con },
        context: (index % 3 == 0).then(|| ArgumentContext {
            aspects: Some(vec![RawAspect {
                name: format!("aspect {}", index),
                normalized_weight: 0.5,
            }]),
            source_url: Some(format!("https://args.example/{}", index)),
            source_title: Some(format!("debate {}", index)),
        }),
        explanation: Explanation {
            score: index as f64,
        },
    }
}

impl MockApi {
    /// A service holding `count` arguments and reporting them all.
    pub fn with_arguments(count: usize) -> Self {
        Self {
            total: Some(count as u64),
            arguments: (0..count).map(raw_argument).collect(),
            ..Self::default()
        }
    }

    /// Reports `total` regardless of how many arguments are actually served.
    pub fn reporting_total(mut self, total: Option<u64>) -> Self {
        self.total = total;
        self
    }

    pub fn with_aspect_space(mut self, space: AspectSpace) -> Self {
        self.aspect_space = space;
        self
    }

    pub fn failing_total(mut self) -> Self {
        self.fail_total = true;
        self
    }

    pub fn failing_aspects(mut self) -> Self {
        self.fail_aspects = true;
        self
    }

    pub fn failing_page(mut self, page: u64) -> Self {
        self.fail_page = Some(page);
        self
    }

    /// Pages from `page` on come back empty.
    pub fn empty_from_page(mut self, page: u64) -> Self {
        self.empty_from_page = Some(page);
        self
    }

    pub fn delaying_page(mut self, page: u64, delay: Duration) -> Self {
        self.page_delays.insert(page, delay);
        self
    }

    /// Requests for `query` never complete.
    pub fn stalling(mut self, query: &str) -> Self {
        self.stalled_queries.insert(query.to_string());
        self
    }

    pub fn requests(&self) -> Vec<Request> {
        self.requests.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Requested page numbers, in request order.
    pub fn requested_pages(&self) -> Vec<u64> {
        self.requests()
            .into_iter()
            .filter_map(|r| match r {
                Request::Page { page, .. } => Some(page),
                _ => None,
            })
            .collect()
    }

    fn record(&self, request: Request) {
        self.requests.lock().unwrap_or_else(|e| e.into_inner()).push(request);
    }

    async fn stall_if_needed(&self, query: &str) {
        if self.stalled_queries.contains(query) {
            std::future::pending::<()>().await;
        }
    }
}

#[async_trait]
impl ArgumentApi for MockApi {
    async fn total_size(&self, query: &str) -> Result<u64> {
        self.record(Request::TotalSize(query.to_string()));
        self.stall_if_needed(query).await;
        if self.fail_total {
            return Err(Error::Network("metadata request refused".to_string()));
        }
        self.total
            .ok_or_else(|| Error::MalformedResponse("missing field `totalSize`".to_string()))
    }

    async fn fetch_page(&self, query: &str, page: u64, page_size: u64) -> Result<ArgumentPage> {
        self.record(Request::Page {
            query: query.to_string(),
            page,
            page_size,
        });
        self.stall_if_needed(query).await;
        if let Some(delay) = self.page_delays.get(&page) {
            tokio::time::sleep(*delay).await;
        }
        if self.fail_page == Some(page) {
            return Err(Error::Network(format!("page {} unavailable", page)));
        }
        if self.empty_from_page.is_some_and(|first| page >= first) {
            return Ok(ArgumentPage {
                total_size: self.total,
                arguments: Vec::new(),
            });
        }

        let len = self.arguments.len();
        let start = ((page.saturating_sub(1) * page_size) as usize).min(len);
        let end = ((page * page_size) as usize).min(len);
        Ok(ArgumentPage {
            total_size: self.total,
            arguments: self.arguments[start..end].to_vec(),
        })
    }

    async fn fetch_aspect_space(&self, query: &str) -> Result<AspectSpace> {
        self.record(Request::AspectSpace(query.to_string()));
        self.stall_if_needed(query).await;
        if self.fail_aspects {
            return Err(Error::Network("aspect space unavailable".to_string()));
        }
        Ok(self.aspect_space.clone())
    }
}
