use crate::UrlError;
use url::Url;

/// Outcome of resolving a reference found on a page
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolved {
    /// An absolute http(s) URL that may be scheduled for fetching
    Fetchable(Url),

    /// A reference the crawler records but never fetches (`mailto:`, `tel:`, ...)
    ///
    /// Holds the reference exactly as it was written.
    NonFetchable(String),
}

impl Resolved {
    /// Returns the string recorded in a page's link list
    pub fn as_link(&self) -> &str {
        match self {
            Self::Fetchable(url) => url.as_str(),
            Self::NonFetchable(raw) => raw,
        }
    }
}

/// Resolves a raw reference against the page it was found on
///
/// # Resolution Rules
///
/// 1. `/path` is taken relative to the origin's host (port included)
/// 2. `//host/path` takes the origin's scheme
/// 3. Anything else is joined against the origin like a browser would, so
///    `b` found on `http://h/x/` becomes `http://h/x/b`
/// 4. Schemes other than http and https are returned as-is, non-fetchable
/// 5. The fragment is dropped from fetchable URLs
///
/// Without an origin (a seed URL) the reference must already be absolute.
///
/// # Arguments
///
/// * `reference` - The raw attribute value or seed string
/// * `origin` - The page the reference was discovered on, if any
///
/// # Returns
///
/// * `Ok(Resolved)` - Canonical URL or non-fetchable reference
/// * `Err(UrlError)` - The reference cannot be parsed
///
/// # Examples
///
/// ```
/// use url::Url;
/// use website_checker::url::{resolve, Resolved};
///
/// let origin = Url::parse("http://h/x").unwrap();
/// let resolved = resolve("/a", Some(&origin)).unwrap();
/// assert_eq!(resolved.as_link(), "http://h/a");
///
/// let mail = resolve("mailto:x@y.com", Some(&origin)).unwrap();
/// assert_eq!(mail, Resolved::NonFetchable("mailto:x@y.com".to_string()));
/// ```
pub fn resolve(reference: &str, origin: Option<&Url>) -> Result<Resolved, UrlError> {
    let reference = reference.trim();

    let parsed = match origin {
        Some(origin) => origin.join(reference),
        None => Url::parse(reference),
    };

    let mut url = parsed.map_err(|source| UrlError::Invalid {
        reference: reference.to_string(),
        source,
    })?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Ok(Resolved::NonFetchable(reference.to_string()));
    }

    url.set_fragment(None);
    Ok(Resolved::Fetchable(url))
}

/// Returns the trailing-slash counterpart of a URL string
///
/// `http://h/a` and `http://h/a/` name the same page for deduplication.
/// Query strings are left alone: only the bare path form is toggled.
pub fn slash_variant(url: &str) -> Option<String> {
    if url.contains('?') {
        return None;
    }
    match url.strip_suffix('/') {
        // "http://host/" has no slash-less form
        Some(stripped) if stripped.matches('/').count() > 2 && !stripped.ends_with('/') => {
            Some(stripped.to_string())
        }
        Some(_) => None,
        None => Some(format!("{}/", url)),
    }
}
