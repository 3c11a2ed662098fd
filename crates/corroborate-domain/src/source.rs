//! Source tracking - one record per retrieved document

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a retrieved source (e.g. `S1`)
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SourceId(String);

impl SourceId {
    /// Create a source id
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Borrow the raw id
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SourceId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Kind of document a source is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceType {
    /// Peer-reviewed paper
    Paper,
    /// Preprint server submission
    Preprint,
    /// Blog post
    Blog,
    /// Institutional or industry report
    Report,
    /// Product or project documentation
    Documentation,
    /// News article
    News,
    /// Anything else
    #[default]
    Other,
}

impl SourceType {
    /// Key used in the `source_type_weights` table
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceType::Paper => "paper",
            SourceType::Preprint => "preprint",
            SourceType::Blog => "blog",
            SourceType::Report => "report",
            SourceType::Documentation => "documentation",
            SourceType::News => "news",
            SourceType::Other => "other",
        }
    }
}

fn default_source_weight() -> f64 {
    1.0
}

/// A retrieved document and its derived trust weight
///
/// `source_weight` is filled in once by weighting and not touched afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Source {
    /// Unique identifier within the batch
    pub id: SourceId,

    /// Canonical URL of the document
    pub url: String,

    /// Document title
    #[serde(default)]
    pub title: String,

    /// Publishing organisation (e.g. "Nature", "arXiv")
    #[serde(default)]
    pub publisher: Option<String>,

    /// Search provider that surfaced the document (e.g. "semantic_scholar")
    #[serde(default)]
    pub provider: Option<String>,

    /// Lowercased host of the URL
    #[serde(default)]
    pub domain: Option<String>,

    /// Kind of document
    #[serde(default)]
    pub source_type: SourceType,

    /// Derived trust weight in [0.1, 1.0]
    #[serde(default = "default_source_weight")]
    pub source_weight: f64,
}

impl Source {
    /// Create an unweighted source
    pub fn new(id: impl Into<SourceId>, url: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            url: url.into(),
            title: String::new(),
            publisher: None,
            provider: None,
            domain: None,
            source_type: SourceType::Other,
            source_weight: default_source_weight(),
        }
    }

    /// Set the search provider
    pub fn with_provider(mut self, provider: impl Into<String>) -> Self {
        self.provider = Some(provider.into());
        self
    }

    /// Set the publisher
    pub fn with_publisher(mut self, publisher: impl Into<String>) -> Self {
        self.publisher = Some(publisher.into());
        self
    }

    /// Set the domain
    pub fn with_domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = Some(domain.into());
        self
    }

    /// Set the source type
    pub fn with_source_type(mut self, source_type: SourceType) -> Self {
        self.source_type = source_type;
        self
    }
}
