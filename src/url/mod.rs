//! URL handling module
//!
//! This module turns raw references found in pages into canonical absolute
//! URLs and decides which of them the crawler may fetch.

mod ignore;
mod resolve;

pub use ignore::IgnoreFilter;
pub use resolve::{resolve, slash_variant, Resolved};

use url::Url;

/// Returns true if `url` lives on a different scheme+host pair than `origin`
///
/// Seeds have no origin and are never external. The port is part of the host,
/// so `http://h:8080` and `http://h:9090` are different sites.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use website_checker::url::is_external;
///
/// let origin = Url::parse("https://example.com/index.html").unwrap();
/// let inside = Url::parse("https://example.com/about").unwrap();
/// let outside = Url::parse("https://other.org/").unwrap();
///
/// assert!(!is_external(&inside, Some(&origin)));
/// assert!(is_external(&outside, Some(&origin)));
/// assert!(!is_external(&outside, None));
/// ```
pub fn is_external(url: &Url, origin: Option<&Url>) -> bool {
    match origin {
        None => false,
        Some(origin) => url.origin() != origin.origin(),
    }
}
