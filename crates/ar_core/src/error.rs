use thiserror::Error;
use crate::types::NormalizedArgument;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// A page request failed after earlier pages were already accumulated.
    #[error("Incomplete result after {} arguments: {source}", .items.len())]
    PartialResult {
        items: Vec<NormalizedArgument>,
        #[source]
        source: Box<Error>,
    },

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("External error: {0}")]
    External(#[from] anyhow::Error),
}

impl Error {
    /// Arguments that were fetched before the failure, if any.
    pub fn partial_items(&self) -> &[NormalizedArgument] {
        match self {
            Error::PartialResult { items, .. } => items,
            _ => &[],
        }
    }

    pub fn is_partial(&self) -> bool {
        matches!(self, Error::PartialResult { .. })
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            Error::MalformedResponse(e.to_string())
        } else {
            Error::Network(e.to_string())
        }
    }
}

impl From<url::ParseError> for Error {
    fn from(e: url::ParseError) -> Self {
        Error::InvalidUrl(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Stance;

    fn argument() -> NormalizedArgument {
        NormalizedArgument {
            conclusion: "c".to_string(),
            premises: vec![],
            stance: Stance::Con,
            relevance: 0.0,
            aspects: vec![],
            source_url: None,
            source_title: None,
        }
    }

    #[test]
    fn test_partial_result_message() {
        let err = Error::PartialResult {
            items: vec![argument(), argument()],
            source: Box::new(Error::Network("connection reset".to_string())),
        };
        assert!(err.is_partial());
        assert_eq!(err.partial_items().len(), 2);
        assert_eq!(
            err.to_string(),
            "Incomplete result after 2 arguments: Network error: connection reset"
        );
    }

    #[test]
    fn test_non_partial_has_no_items() {
        let err = Error::MalformedResponse("missing totalSize".to_string());
        assert!(!err.is_partial());
        assert!(err.partial_items().is_empty());
    }

    #[test]
    fn test_url_parse_error_maps_to_invalid_url() {
        let err: Error = url::Url::parse("not a url").unwrap_err().into();
        assert!(matches!(err, Error::InvalidUrl(_)));
    }
}
