//! Paginated retrieval of every argument matching a query.

use std::sync::Arc;
use futures::stream::{self, StreamExt};
use ar_core::{ArgumentApi, ArgumentList, Error, FetchMode, RawArgument, Result};

use crate::logging::Logger;

/// Pages needed to retrieve `total` arguments with pages of at most
/// `max_page_size` items.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PagePlan {
    pub total: u64,
    pub page_size: u64,
}

impl PagePlan {
    pub fn page_count(&self) -> u64 {
        if self.total == 0 {
            0
        } else {
            self.total.div_ceil(self.page_size)
        }
    }

    /// 1-based page numbers in request order.
    pub fn pages(&self) -> impl Iterator<Item = u64> {
        1..=self.page_count()
    }
}

pub fn page_plan(total: u64, max_page_size: u64) -> Result<PagePlan> {
    if max_page_size == 0 {
        return Err(Error::InvalidConfig("max page size must be at least 1".to_string()));
    }
    Ok(PagePlan {
        total,
        page_size: total.min(max_page_size),
    })
}

fn partial(items: ArgumentList, source: Error) -> Error {
    Error::PartialResult {
        items,
        source: Box::new(source),
    }
}

pub struct ArgumentFetcher {
    api: Arc<dyn ArgumentApi>,
    mode: FetchMode,
}

impl ArgumentFetcher {
    pub fn new(api: Arc<dyn ArgumentApi>) -> Self {
        Self {
            api,
            mode: FetchMode::Sequential,
        }
    }

    pub fn with_mode(mut self, mode: FetchMode) -> Self {
        self.mode = mode;
        self
    }

    /// Retrieves all arguments for an already-normalized `query`.
    ///
    /// A failing metadata request returns its error unchanged. A failing page
    /// request returns [`Error::PartialResult`] holding the arguments of the
    /// pages fetched before it.
    pub async fn fetch_all_arguments(&self, query: &str, max_page_size: u64) -> Result<ArgumentList> {
        let logger = Logger::new().with_prefix(format!("[{}]", query));

        if max_page_size == 0 {
            return Err(Error::InvalidConfig("max page size must be at least 1".to_string()));
        }
        let total = self.api.total_size(query).await?;
        let plan = page_plan(total, max_page_size)?;
        if plan.total == 0 {
            logger.info("no arguments found");
            return Ok(Vec::new());
        }
        logger.info(&format!(
            "fetching {} arguments in {} page(s) of {}",
            plan.total,
            plan.page_count(),
            plan.page_size
        ));

        let items = match self.mode {
            FetchMode::Sequential => self.fetch_sequential(query, plan, &logger).await?,
            FetchMode::Concurrent(limit) => {
                self.fetch_concurrent(query, plan, limit.max(1), &logger).await?
            }
        };

        if (items.len() as u64) < plan.total {
            logger.warn(&format!(
                "service reported {} arguments but returned {}",
                plan.total,
                items.len()
            ));
        }
        Ok(items)
    }

    async fn fetch_sequential(&self, query: &str, plan: PagePlan, logger: &Logger) -> Result<ArgumentList> {
        let mut items = Vec::new();
        let mut counter: u64 = 0;

        loop {
            let page = counter + 1;
            let fetched = match self.api.fetch_page(query, page, plan.page_size).await {
                Ok(fetched) => fetched,
                Err(e) => {
                    logger.error(&format!("page {} failed: {}", page, e));
                    return Err(partial(items, e));
                }
            };
            let received = fetched.arguments.len();
            items.extend(fetched.arguments.into_iter().map(RawArgument::normalize));
            counter += 1;
            logger.debug(&format!("page {}: {} arguments", page, received));

            if received == 0 {
                logger.warn(&format!("page {} was empty, stopping", page));
                break;
            }
            if counter.saturating_mul(plan.page_size) >= plan.total {
                break;
            }
        }

        Ok(items)
    }

    async fn fetch_concurrent(
        &self,
        query: &str,
        plan: PagePlan,
        limit: usize,
        logger: &Logger,
    ) -> Result<ArgumentList> {
        let api = self.api.as_ref();
        let page_size = plan.page_size;
        // `buffered` yields in input order, so pages arrive by index.
        let mut pages = Box::pin(
            stream::iter(plan.pages())
                .map(|page| async move { (page, api.fetch_page(query, page, page_size).await) })
                .buffered(limit),
        );

        let mut items = Vec::new();
        while let Some((page, result)) = pages.next().await {
            let fetched = match result {
                Ok(fetched) => fetched,
                Err(e) => {
                    logger.error(&format!("page {} failed: {}", page, e));
                    return Err(partial(items, e));
                }
            };
            let received = fetched.arguments.len();
            items.extend(fetched.arguments.into_iter().map(RawArgument::normalize));
            logger.debug(&format!("page {}: {} arguments", page, received));

            if received == 0 {
                logger.warn(&format!("page {} was empty, stopping", page));
                break;
            }
        }

        Ok(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_plan() {
        let plan = page_plan(2500, 1000).unwrap();
        assert_eq!(plan.page_size, 1000);
        assert_eq!(plan.page_count(), 3);
        assert_eq!(plan.pages().collect::<Vec<_>>(), vec![1, 2, 3]);
    }

    #[test]
    fn test_page_plan_small_total() {
        let plan = page_plan(42, 1000).unwrap();
        assert_eq!(plan.page_size, 42);
        assert_eq!(plan.page_count(), 1);
    }

    #[test]
    fn test_page_plan_empty() {
        let plan = page_plan(0, 1000).unwrap();
        assert_eq!(plan.page_count(), 0);
        assert_eq!(plan.pages().count(), 0);
    }

    #[test]
    fn test_page_plan_counts() {
        for (total, max, expected) in [(1, 1, 1), (10, 3, 4), (9, 3, 3), (1000, 1000, 1), (1001, 1000, 2)] {
            assert_eq!(page_plan(total, max).unwrap().page_count(), expected, "{}/{}", total, max);
        }
    }

    #[test]
    fn test_page_plan_rejects_zero_page_size() {
        assert!(matches!(page_plan(10, 0), Err(Error::InvalidConfig(_))));
    }
}
