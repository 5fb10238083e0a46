use serde::{Deserialize, Serialize};
use crate::{Error, Result};

pub const DEFAULT_BASE_URL: &str = "https://www.args.me/api/v2";
pub const DEFAULT_MAX_PAGE_SIZE: u64 = 1000;

/// How the pages of one query are requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FetchMode {
    /// One page at a time, page n+1 after page n.
    Sequential,
    /// Up to `n` page requests in flight.
    Concurrent(usize),
}

impl Default for FetchMode {
    fn default() -> Self {
        Self::Sequential
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub base_url: String,
    pub max_page_size: u64,
    pub fetch_mode: FetchMode,
    pub user_agent: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            max_page_size: DEFAULT_MAX_PAGE_SIZE,
            fetch_mode: FetchMode::default(),
            user_agent: format!("argscope/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn with_max_page_size(mut self, max_page_size: u64) -> Self {
        self.max_page_size = max_page_size;
        self
    }

    pub fn with_fetch_mode(mut self, mode: FetchMode) -> Self {
        self.fetch_mode = mode;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_page_size == 0 {
            return Err(Error::InvalidConfig("max page size must be at least 1".to_string()));
        }
        if let FetchMode::Concurrent(0) = self.fetch_mode {
            return Err(Error::InvalidConfig("page concurrency must be at least 1".to_string()));
        }
        url::Url::parse(&self.base_url)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.base_url, "https://www.args.me/api/v2");
        assert_eq!(config.max_page_size, 1000);
        assert_eq!(config.fetch_mode, FetchMode::Sequential);
        assert!(config.user_agent.starts_with("argscope/"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        assert!(matches!(
            Config::new().with_max_page_size(0).validate(),
            Err(Error::InvalidConfig(_))
        ));
        assert!(matches!(
            Config::new().with_fetch_mode(FetchMode::Concurrent(0)).validate(),
            Err(Error::InvalidConfig(_))
        ));
        assert!(matches!(
            Config::new().with_base_url("not a url").validate(),
            Err(Error::InvalidUrl(_))
        ));
    }
}
