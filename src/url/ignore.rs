use crate::ConfigError;
use regex::Regex;

/// A set of regular expressions naming URLs the crawler must not fetch
///
/// A URL matching any pattern is still recorded as a link on the page that
/// references it, but it never becomes a fetch task.
#[derive(Debug, Clone, Default)]
pub struct IgnoreFilter {
    patterns: Vec<Regex>,
}

impl IgnoreFilter {
    /// Compiles the given patterns
    ///
    /// # Arguments
    ///
    /// * `patterns` - Regular expressions in `regex` crate syntax
    ///
    /// # Returns
    ///
    /// * `Ok(IgnoreFilter)` - All patterns compiled
    /// * `Err(ConfigError::InvalidPattern)` - The first pattern that failed
    ///
    /// # Example
    ///
    /// ```
    /// use website_checker::url::IgnoreFilter;
    ///
    /// let filter = IgnoreFilter::new(&["\\.pdf$".to_string()]).unwrap();
    /// assert!(filter.is_ignored("https://example.com/manual.pdf"));
    /// assert!(!filter.is_ignored("https://example.com/manual.html"));
    /// ```
    pub fn new(patterns: &[String]) -> Result<Self, ConfigError> {
        let patterns = patterns
            .iter()
            .map(|pattern| {
                Regex::new(pattern).map_err(|source| ConfigError::InvalidPattern {
                    pattern: pattern.clone(),
                    source,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { patterns })
    }

    /// Returns true if any pattern matches somewhere in `url`
    pub fn is_ignored(&self, url: &str) -> bool {
        self.patterns.iter().any(|re| re.is_match(url))
    }

    /// Number of registered patterns
    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}
