//! Query cycles: one aspect-space fetch and one paginated argument fetch per
//! submitted query, with superseded cycles cancelled.

use std::sync::Arc;
use chrono::{DateTime, Utc};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info};
use ar_core::query::{is_blank, normalize};
use ar_core::{ArgumentApi, ArgumentList, AspectSpace, Config, Error, Result};

use crate::fetcher::ArgumentFetcher;

/// Everything fetched for one submitted query. The two halves fail
/// independently.
#[derive(Debug)]
pub struct QueryOutcome {
    pub raw_query: String,
    pub query: String,
    pub fetched_at: DateTime<Utc>,
    pub aspects: Result<AspectSpace>,
    pub arguments: Result<ArgumentList>,
}

impl QueryOutcome {
    pub fn is_success(&self) -> bool {
        self.aspects.is_ok() && self.arguments.is_ok()
    }
}

pub async fn run_query_cycle(api: Arc<dyn ArgumentApi>, raw_query: &str, config: &Config) -> QueryOutcome {
    let query = normalize(raw_query);
    info!("🔎 Query cycle for {:?} ({})", raw_query, query);

    let fetcher = ArgumentFetcher::new(api.clone()).with_mode(config.fetch_mode);
    let (aspects, arguments) = tokio::join!(
        api.fetch_aspect_space(&query),
        fetcher.fetch_all_arguments(&query, config.max_page_size),
    );

    QueryOutcome {
        raw_query: raw_query.to_string(),
        query,
        fetched_at: Utc::now(),
        aspects,
        arguments,
    }
}

/// Runs query cycles in the background. Submitting a new query aborts the
/// cycle still in flight, so only the latest query produces an outcome.
pub struct QuerySession {
    api: Arc<dyn ArgumentApi>,
    config: Config,
    current: Option<JoinHandle<()>>,
    outcomes: mpsc::UnboundedSender<QueryOutcome>,
}

impl QuerySession {
    pub fn new(api: Arc<dyn ArgumentApi>, config: Config) -> (Self, mpsc::UnboundedReceiver<QueryOutcome>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let session = Self {
            api,
            config,
            current: None,
            outcomes: tx,
        };
        (session, rx)
    }

    /// Starts a cycle for `raw_query`. Returns false for a blank query, which
    /// leaves any running cycle untouched.
    pub fn submit(&mut self, raw_query: &str) -> bool {
        if is_blank(raw_query) {
            return false;
        }
        self.cancel();

        let api = self.api.clone();
        let config = self.config.clone();
        let outcomes = self.outcomes.clone();
        let raw_query = raw_query.to_string();
        self.current = Some(tokio::spawn(async move {
            let outcome = run_query_cycle(api, &raw_query, &config).await;
            // The receiver may be gone during shutdown.
            let _ = outcomes.send(outcome);
        }));
        true
    }

    /// Aborts the running cycle. Returns true if one was still in flight.
    pub fn cancel(&mut self) -> bool {
        match self.current.take() {
            Some(handle) if !handle.is_finished() => {
                debug!("Cancelling superseded query cycle");
                handle.abort();
                true
            }
            _ => false,
        }
    }

    pub fn is_running(&self) -> bool {
        self.current.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Waits for the running cycle, if any, to deliver its outcome.
    pub async fn wait(&mut self) -> Result<()> {
        if let Some(handle) = self.current.take() {
            handle.await.map_err(|e| Error::External(e.into()))?;
        }
        Ok(())
    }
}

impl Drop for QuerySession {
    fn drop(&mut self) {
        self.cancel();
    }
}
