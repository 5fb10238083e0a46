use serde::{Deserialize, Serialize};
use std::fmt;

/// Position of an argument toward the query's conclusion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Stance {
    Pro,
    Con,
}

impl fmt::Display for Stance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stance::Pro => write!(f, "PRO"),
            Stance::Con => write!(f, "CON"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawPremise {
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawAspect {
    pub name: String,
    pub normalized_weight: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArgumentContext {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aspects: Option<Vec<RawAspect>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_title: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Explanation {
    pub score: f64,
}

/// An argument as returned by the `/arguments` endpoint, restricted to the
/// fields we request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawArgument {
    pub conclusion: String,
    #[serde(default)]
    pub premises: Vec<RawPremise>,
    pub stance: Stance,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<ArgumentContext>,
    pub explanation: Explanation,
}

impl RawArgument {
    pub fn normalize(self) -> NormalizedArgument {
        let context = self.context.unwrap_or_default();
        let aspects = context
            .aspects
            .unwrap_or_default()
            .into_iter()
            .map(|a| Aspect {
                name: a.name,
                weight: a.normalized_weight,
            })
            .collect();

        NormalizedArgument {
            conclusion: self.conclusion,
            premises: self.premises.into_iter().map(|p| p.text).collect(),
            stance: self.stance,
            relevance: self.explanation.score,
            aspects,
            source_url: context.source_url,
            source_title: context.source_title,
        }
    }
}

impl From<RawArgument> for NormalizedArgument {
    fn from(raw: RawArgument) -> Self {
        raw.normalize()
    }
}

/// One page of the `/arguments` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArgumentPage {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_size: Option<u64>,
    pub arguments: Vec<RawArgument>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Aspect {
    pub name: String,
    pub weight: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedArgument {
    pub conclusion: String,
    pub premises: Vec<String>,
    pub stance: Stance,
    pub relevance: f64,
    pub aspects: Vec<Aspect>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_title: Option<String>,
}

impl NormalizedArgument {
    /// Short label for where the argument was found: the source title,
    /// falling back to its URL.
    pub fn source_label(&self) -> Option<&str> {
        self.source_title
            .as_deref()
            .filter(|t| !t.trim().is_empty())
            .or(self.source_url.as_deref())
    }
}

/// All arguments of a query, in page-then-within-page order.
pub type ArgumentList = Vec<NormalizedArgument>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dimension {
    pub weight: f64,
    #[serde(default)]
    pub aspects: Vec<String>,
}

/// Response of the `/aspectSpace` endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AspectSpace {
    pub dimensions: Vec<Dimension>,
}
