use std::fmt;
use std::sync::Arc;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use url::Url;
use ar_core::{ArgumentApi, ArgumentPage, AspectSpace, Config, Result};

use crate::response;

/// Fields requested for every argument of a page.
pub const ARGUMENT_FIELDS: &[&str] = &[
    "arguments.conclusion",
    "arguments.premises.text",
    "arguments.stance",
    "arguments.context.aspects",
    "arguments.context.sourceUrl",
    "arguments.context.sourceTitle",
    "arguments.explanation.score",
];

/// HTTP client for the args.me v2 API.
pub struct ArgsMeClient {
    client: Arc<Client>,
    base_url: Url,
}

impl ArgsMeClient {
    pub fn new(config: &Config) -> Result<Self> {
        config.validate()?;
        let client = Client::builder().user_agent(config.user_agent.as_str()).build()?;
        Ok(Self {
            client: Arc::new(client),
            base_url: base_url(&config.base_url)?,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Builds an endpoint URL. Values are inserted verbatim; the query is
    /// expected to be normalized already.
    pub fn endpoint(&self, path: &str, params: &[(&str, String)]) -> Result<Url> {
        let mut url = self.base_url.join(path)?;
        let query = params
            .iter()
            .map(|(key, value)| format!("{}={}", key, value))
            .chain(std::iter::once("format=json".to_string()))
            .collect::<Vec<_>>()
            .join("&");
        url.set_query(Some(&query));
        Ok(url)
    }

    async fn get_json(&self, url: Url) -> Result<Value> {
        tracing::debug!("GET {}", url);
        let response = self.client.get(url).send().await?.error_for_status()?;
        Ok(response.json::<Value>().await?)
    }
}

impl fmt::Debug for ArgsMeClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArgsMeClient")
            .field("client", &"<reqwest::Client>")
            .field("base_url", &self.base_url.as_str())
            .finish()
    }
}

#[async_trait]
impl ArgumentApi for ArgsMeClient {
    async fn total_size(&self, query: &str) -> Result<u64> {
        let url = self.endpoint(
            "arguments",
            &[
                ("query", query.to_string()),
                ("pageSize", "1".to_string()),
                ("fields", "totalSize".to_string()),
            ],
        )?;
        let body = self.get_json(url).await?;
        response::parse_total_size(&body)
    }

    async fn fetch_page(&self, query: &str, page: u64, page_size: u64) -> Result<ArgumentPage> {
        let url = self.endpoint(
            "arguments",
            &[
                ("query", query.to_string()),
                ("pageSize", page_size.to_string()),
                ("page", page.to_string()),
                ("fields", ARGUMENT_FIELDS.join(",")),
            ],
        )?;
        let body = self.get_json(url).await?;
        response::parse_page(body)
    }

    async fn fetch_aspect_space(&self, query: &str) -> Result<AspectSpace> {
        let url = self.endpoint("aspectSpace", &[("query", query.to_string())])?;
        let body = self.get_json(url).await?;
        response::parse_aspect_space(body)
    }
}

/// `Url::join` replaces the last path segment unless the base ends in `/`.
fn base_url(raw: &str) -> Result<Url> {
    let mut raw = raw.trim().to_string();
    if !raw.ends_with('/') {
        raw.push('/');
    }
    Ok(Url::parse(&raw)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ar_core::Error;

    fn client() -> ArgsMeClient {
        ArgsMeClient::new(&Config::default()).unwrap()
    }

    #[test]
    fn test_base_url_keeps_last_segment() {
        let client = client();
        assert_eq!(client.base_url().as_str(), "https://www.args.me/api/v2/");
        let url = client.endpoint("arguments", &[]).unwrap();
        assert_eq!(url.as_str(), "https://www.args.me/api/v2/arguments?format=json");
    }

    #[test]
    fn test_page_endpoint() {
        let url = client()
            .endpoint(
                "arguments",
                &[
                    ("query", "climate+change".to_string()),
                    ("pageSize", "1000".to_string()),
                    ("page", "3".to_string()),
                    ("fields", ARGUMENT_FIELDS.join(",")),
                ],
            )
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://www.args.me/api/v2/arguments?query=climate+change&pageSize=1000&page=3\
             &fields=arguments.conclusion,arguments.premises.text,arguments.stance,\
             arguments.context.aspects,arguments.context.sourceUrl,arguments.context.sourceTitle,\
             arguments.explanation.score&format=json"
        );
    }

    #[test]
    fn test_aspect_space_endpoint_keeps_encoding() {
        let url = client()
            .endpoint("aspectSpace", &[("query", "cats+%26+dogs".to_string())])
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://www.args.me/api/v2/aspectSpace?query=cats+%26+dogs&format=json"
        );
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let result = ArgsMeClient::new(&Config::new().with_base_url("::nope"));
        assert!(matches!(result, Err(Error::InvalidUrl(_))));
    }

    #[tokio::test]
    async fn test_unreachable_server_is_network_error() {
        // Port 9 (discard) on localhost is not expected to serve HTTP.
        let client = ArgsMeClient::new(&Config::new().with_base_url("http://127.0.0.1:9/api")).unwrap();
        let result = client.total_size("climate").await;
        assert!(matches!(result, Err(Error::Network(_))));
    }
}
