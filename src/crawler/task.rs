//! Units of crawl work

use crate::url::is_external;
use url::Url;

/// A unit of work owned by the queue until a worker claims it
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Task {
    /// Fetch a URL, record its status and follow its references
    Fetch(FetchTask),

    /// Validate one embedded structured data block
    StructuredData(StructuredDataTask),
}

impl Task {
    /// Short description used in logs
    pub fn describe(&self) -> &str {
        match self {
            Self::Fetch(task) => task.url.as_str(),
            Self::StructuredData(task) => &task.origin,
        }
    }
}

/// Fetch of a single URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTask {
    /// The URL to fetch
    pub url: Url,

    /// Page on which the URL was discovered; `None` for seeds
    pub origin: Option<Url>,
}

impl FetchTask {
    pub fn seed(url: Url) -> Self {
        Self { url, origin: None }
    }

    pub fn discovered(url: Url, origin: Url) -> Self {
        Self {
            url,
            origin: Some(origin),
        }
    }

    /// Key under which this fetch's result is recorded
    pub fn key(&self) -> &str {
        self.url.as_str()
    }

    /// Returns true if the URL sits on another site than the page linking to it
    pub fn is_external(&self) -> bool {
        is_external(&self.url, self.origin.as_ref())
    }
}

/// Validation of one JSON-LD block found on a page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructuredDataTask {
    /// Raw text content of the block
    pub content: String,

    /// Result key of the page the block was found on
    pub origin: String,

    /// Position of the block among the page's blocks
    pub index: usize,
}
