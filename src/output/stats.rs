//! Statistics over a finished check
//!
//! Summarizes a [`CheckResult`] and writes the summary to the log. Standard
//! output carries the JSON report, so statistics never go there.

use crate::state::CheckResult;
use std::collections::BTreeMap;

/// Crawl statistics summary
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrawlStatistics {
    /// Total number of URLs checked
    pub total_pages: u64,

    /// Count of pages by HTTP status; 0 stands for "no response"
    pub pages_by_status: BTreeMap<u16, u64>,

    /// Pages answering with an error status or not at all
    pub broken_pages: u64,

    /// Requests that got no response
    pub failed_requests: u64,

    /// Total number of references recorded across all pages
    pub total_links: u64,

    /// Number of structured data blocks found
    pub structured_data_blocks: u64,
}

impl CrawlStatistics {
    /// Percentage of checked URLs that are not broken
    pub fn success_rate(&self) -> f64 {
        if self.total_pages == 0 {
            return 0.0;
        }
        let healthy = self.total_pages - self.broken_pages;
        (healthy as f64 / self.total_pages as f64) * 100.0
    }
}

/// Computes statistics from a check result
pub fn collect_statistics(result: &CheckResult) -> CrawlStatistics {
    let mut stats = CrawlStatistics::default();

    for page in result.checked.values() {
        stats.total_pages += 1;
        *stats.pages_by_status.entry(page.status_code).or_insert(0) += 1;
        if page.is_broken() {
            stats.broken_pages += 1;
        }
        if page.error.is_some() {
            stats.failed_requests += 1;
        }
        stats.total_links += page.links.len() as u64;
        stats.structured_data_blocks += page.structured_data.len() as u64;
    }

    stats
}

/// Logs statistics and every broken URL
pub fn log_statistics(stats: &CrawlStatistics, result: &CheckResult) {
    tracing::info!(
        "Checked {} URLs, {} references, {} structured data blocks",
        stats.total_pages,
        stats.total_links,
        stats.structured_data_blocks
    );

    for (status, count) in &stats.pages_by_status {
        let label = match status {
            0 => "no response".to_string(),
            code => format!("HTTP {}", code),
        };
        tracing::info!("  {}: {}", label, count);
    }

    for (url, page) in result.broken() {
        match &page.error {
            Some(error) => tracing::warn!("Broken: {} ({})", url, error),
            None => tracing::warn!("Broken: {} (HTTP {})", url, page.status_code),
        }
    }

    tracing::info!(
        "Success Rate: {:.1}% ({} broken, {} without response)",
        stats.success_rate(),
        stats.broken_pages,
        stats.failed_requests
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{PageResult, StructuredDataReport};

    fn page(status_code: u16, links: usize, error: Option<&str>) -> PageResult {
        PageResult {
            status_code,
            links: (0..links).map(|i| format!("http://example.com/{}", i)).collect(),
            structured_data: Vec::new(),
            error: error.map(str::to_string),
        }
    }

    fn sample_result() -> CheckResult {
        let mut result = CheckResult::default();
        let mut home = page(200, 3, None);
        home.structured_data.push(StructuredDataReport {
            content: "{}".to_string(),
            validation: None,
        });
        result.checked.insert("http://example.com/".to_string(), home);
        result
            .checked
            .insert("http://example.com/a".to_string(), page(200, 1, None));
        result
            .checked
            .insert("http://example.com/gone".to_string(), page(404, 0, None));
        result.checked.insert(
            "http://down.example.org/".to_string(),
            page(0, 0, Some("connection refused")),
        );
        result
    }

    #[test]
    fn test_collect_statistics() {
        let stats = collect_statistics(&sample_result());

        assert_eq!(stats.total_pages, 4);
        assert_eq!(stats.broken_pages, 2);
        assert_eq!(stats.failed_requests, 1);
        assert_eq!(stats.total_links, 4);
        assert_eq!(stats.structured_data_blocks, 1);
        assert_eq!(stats.pages_by_status.get(&200), Some(&2));
        assert_eq!(stats.pages_by_status.get(&404), Some(&1));
        assert_eq!(stats.pages_by_status.get(&0), Some(&1));
    }

    #[test]
    fn test_success_rate() {
        let stats = collect_statistics(&sample_result());
        assert!((stats.success_rate() - 50.0).abs() < f64::EPSILON);

        assert_eq!(CrawlStatistics::default().success_rate(), 0.0);
    }
}
