//! Final crawl results
//!
//! These types are produced once the crawl has terminated. Their JSON shape
//! (field names and order) is what downstream tooling parses.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Outcome of a whole crawl, keyed by canonical URL
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CheckResult {
    pub checked: BTreeMap<String, PageResult>,
}

/// Outcome of crawling a single URL
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PageResult {
    /// HTTP status of the final response, or 0 when no response arrived
    pub status_code: u16,

    /// References found on the page, in the order they were encountered
    pub links: Vec<String>,

    /// JSON-LD blocks found on the page, in document order
    pub structured_data: Vec<StructuredDataReport>,

    /// Transport error message when the request itself failed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// One embedded structured data block and its validation report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructuredDataReport {
    /// Raw text of the block
    pub content: String,

    /// Validator response, absent when validation is disabled
    pub validation: Option<serde_json::Value>,
}

impl PageResult {
    /// Returns true for error statuses and failed requests
    pub fn is_broken(&self) -> bool {
        self.error.is_some() || self.status_code >= 400
    }
}

impl CheckResult {
    /// Number of distinct URLs checked
    pub fn len(&self) -> usize {
        self.checked.len()
    }

    pub fn is_empty(&self) -> bool {
        self.checked.is_empty()
    }

    /// Looks up the result for a URL
    pub fn get(&self, url: &str) -> Option<&PageResult> {
        self.checked.get(url)
    }

    /// Iterates over the broken URLs and their results, in URL order
    pub fn broken(&self) -> impl Iterator<Item = (&String, &PageResult)> {
        self.checked.iter().filter(|(_, page)| page.is_broken())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn page(status_code: u16) -> PageResult {
        PageResult {
            status_code,
            ..Default::default()
        }
    }

    #[test]
    fn test_is_broken() {
        assert!(!page(200).is_broken());
        assert!(!page(301).is_broken());
        assert!(page(404).is_broken());
        assert!(page(503).is_broken());

        let failed = PageResult {
            error: Some("connection refused".to_string()),
            ..Default::default()
        };
        assert!(failed.is_broken());
    }

    #[test]
    fn test_broken_filter() {
        let mut result = CheckResult::default();
        result.checked.insert("http://h/ok".to_string(), page(200));
        result.checked.insert("http://h/missing".to_string(), page(404));

        let broken: Vec<_> = result.broken().map(|(url, _)| url.as_str()).collect();
        assert_eq!(broken, vec!["http://h/missing"]);
    }

    #[test]
    fn test_json_shape() {
        let mut result = CheckResult::default();
        result.checked.insert(
            "http://h/".to_string(),
            PageResult {
                status_code: 200,
                links: vec!["http://h/a".to_string()],
                structured_data: vec![StructuredDataReport {
                    content: "{}".to_string(),
                    validation: None,
                }],
                error: None,
            },
        );

        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(
            value,
            json!({
                "checked": {
                    "http://h/": {
                        "status_code": 200,
                        "links": ["http://h/a"],
                        "structured_data": [{"content": "{}", "validation": null}]
                    }
                }
            })
        );
    }

    #[test]
    fn test_error_field_serialized_when_present() {
        let failed = PageResult {
            error: Some("timed out".to_string()),
            ..Default::default()
        };
        let value = serde_json::to_value(&failed).unwrap();
        assert_eq!(value["error"], "timed out");
        assert_eq!(value["status_code"], 0);
    }
}
