//! Shared result store
//!
//! Every worker writes into one `ResultStore`. The store owns two locks:
//!
//! - the ledger lock, guarding the set of claimed URLs and the map of page
//!   entries; it is held only for map bookkeeping, never across a request
//! - one lock per page entry, guarding that page's link and report lists
//!
//! A URL is claimed the moment it is admitted for fetching, so two workers
//! that discover the same link concurrently can never both schedule it.

use crate::state::{CheckResult, PageResult, StructuredDataReport};
use crate::url::{slash_variant, IgnoreFilter};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard};

/// Decision taken by [`ResultStore::admit`] for a discovered URL
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    /// Claimed for fetching; the caller must enqueue a fetch task
    Scheduled,

    /// The URL (or its trailing-slash form) was claimed earlier
    AlreadySeen,

    /// The URL matches an ignore pattern
    Ignored,
}

#[derive(Debug, Default)]
struct Ledger {
    claimed: HashSet<String>,
    pages: HashMap<String, Arc<PageEntry>>,
}

impl Ledger {
    fn knows(&self, url: &str) -> bool {
        self.claimed.contains(url) || self.pages.contains_key(url)
    }
}

/// Result store shared by the dispatcher and all workers
#[derive(Debug, Default)]
pub struct ResultStore {
    ledger: Mutex<Ledger>,
}

impl ResultStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn ledger(&self) -> MutexGuard<'_, Ledger> {
        // A worker panicking mid-bookkeeping leaves the maps consistent
        self.ledger.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Decides whether a resolved URL becomes a new fetch task
    ///
    /// The seen check, the trailing-slash check, the ignore check and the claim
    /// all happen under the ledger lock.
    ///
    /// # Arguments
    ///
    /// * `url` - Canonical URL string
    /// * `ignore` - Patterns naming URLs that must never be fetched
    ///
    /// # Returns
    ///
    /// The admission decision; only `Admission::Scheduled` claims the URL
    pub fn admit(&self, url: &str, ignore: &IgnoreFilter) -> Admission {
        let mut ledger = self.ledger();

        if ledger.knows(url) {
            return Admission::AlreadySeen;
        }
        if let Some(variant) = slash_variant(url) {
            if ledger.knows(&variant) {
                return Admission::AlreadySeen;
            }
        }
        if ignore.is_ignored(url) {
            return Admission::Ignored;
        }

        ledger.claimed.insert(url.to_string());
        Admission::Scheduled
    }

    /// Returns true once a result has been recorded for `url`
    pub fn is_recorded(&self, url: &str) -> bool {
        self.ledger().pages.contains_key(url)
    }

    /// Records the response for `url`, creating its page entry
    ///
    /// Returns `None` if the URL already has an entry; the existing entry is
    /// left untouched.
    pub fn record(&self, url: &str, entry: PageEntry) -> Option<Arc<PageEntry>> {
        let mut ledger = self.ledger();
        if ledger.pages.contains_key(url) {
            return None;
        }

        let entry = Arc::new(entry);
        ledger.claimed.insert(url.to_string());
        ledger.pages.insert(url.to_string(), Arc::clone(&entry));
        Some(entry)
    }

    /// Looks up the entry recorded for `url`
    pub fn page(&self, url: &str) -> Option<Arc<PageEntry>> {
        self.ledger().pages.get(url).cloned()
    }

    /// Number of URLs with a recorded result
    pub fn len(&self) -> usize {
        self.ledger().pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Copies the current contents into an owned, serializable result
    pub fn snapshot(&self) -> CheckResult {
        let pages: Vec<(String, Arc<PageEntry>)> = self
            .ledger()
            .pages
            .iter()
            .map(|(url, entry)| (url.clone(), Arc::clone(entry)))
            .collect();

        // Page locks are taken after the ledger lock is released
        let checked: BTreeMap<String, PageResult> = pages
            .into_iter()
            .map(|(url, entry)| (url, entry.to_result()))
            .collect();

        CheckResult { checked }
    }
}

#[derive(Debug, Default)]
struct PageData {
    error: Option<String>,
    links: Vec<String>,
    structured_data: Vec<(usize, StructuredDataReport)>,
}

/// Live result for one crawled URL
///
/// The status is fixed at creation. Links, structured data reports and a
/// late transport error are written under the entry's own lock.
#[derive(Debug)]
pub struct PageEntry {
    status_code: u16,
    data: Mutex<PageData>,
}

impl PageEntry {
    /// Entry for a URL that answered with `status_code`
    pub fn new(status_code: u16) -> Self {
        Self {
            status_code,
            data: Mutex::new(PageData::default()),
        }
    }

    /// Entry for a URL whose request failed before any response arrived
    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            status_code: 0,
            data: Mutex::new(PageData {
                error: Some(error.into()),
                ..PageData::default()
            }),
        }
    }

    fn data(&self) -> MutexGuard<'_, PageData> {
        self.data.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn status_code(&self) -> u16 {
        self.status_code
    }

    /// Marks the page as broken after its response arrived
    ///
    /// Used when the body cannot be read; the status stays as received.
    pub fn set_error(&self, error: impl Into<String>) {
        self.data().error = Some(error.into());
    }

    /// Appends a discovered reference
    pub fn push_link(&self, link: impl Into<String>) {
        self.data().links.push(link.into());
    }

    /// Stores the report for the `index`-th structured data block of the page
    ///
    /// Reports may arrive in any order; they are kept sorted by block index.
    pub fn push_structured_data(&self, index: usize, report: StructuredDataReport) {
        let mut data = self.data();
        let position = data
            .structured_data
            .partition_point(|(existing, _)| *existing <= index);
        data.structured_data.insert(position, (index, report));
    }

    /// Copies the entry into its serializable form
    pub fn to_result(&self) -> PageResult {
        let data = self.data();
        PageResult {
            status_code: self.status_code,
            links: data.links.clone(),
            structured_data: data
                .structured_data
                .iter()
                .map(|(_, report)| report.clone())
                .collect(),
            error: data.error.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    fn no_ignores() -> IgnoreFilter {
        IgnoreFilter::default()
    }

    fn report(content: &str) -> StructuredDataReport {
        StructuredDataReport {
            content: content.to_string(),
            validation: None,
        }
    }

    #[test]
    fn test_admit_claims_once() {
        let store = ResultStore::new();
        assert_eq!(store.admit("http://h/a", &no_ignores()), Admission::Scheduled);
        assert_eq!(store.admit("http://h/a", &no_ignores()), Admission::AlreadySeen);
    }

    #[test]
    fn test_admit_treats_slash_variant_as_seen() {
        let store = ResultStore::new();
        assert_eq!(store.admit("http://h/a/", &no_ignores()), Admission::Scheduled);
        assert_eq!(store.admit("http://h/a", &no_ignores()), Admission::AlreadySeen);

        let store = ResultStore::new();
        assert_eq!(store.admit("http://h/b", &no_ignores()), Admission::Scheduled);
        assert_eq!(store.admit("http://h/b/", &no_ignores()), Admission::AlreadySeen);
    }

    #[test]
    fn test_admit_respects_ignore_patterns() {
        let store = ResultStore::new();
        let ignore = IgnoreFilter::new(&["/private".to_string()]).unwrap();

        assert_eq!(store.admit("http://h/private/x", &ignore), Admission::Ignored);
        // Ignored URLs are not claimed
        assert_eq!(
            store.admit("http://h/private/x", &no_ignores()),
            Admission::Scheduled
        );
    }

    #[test]
    fn test_recorded_url_is_seen() {
        let store = ResultStore::new();
        store.record("http://h/", PageEntry::new(200)).unwrap();

        assert!(store.is_recorded("http://h/"));
        assert_eq!(store.admit("http://h/", &no_ignores()), Admission::AlreadySeen);
    }

    #[test]
    fn test_record_is_create_once() {
        let store = ResultStore::new();
        assert!(store.record("http://h/", PageEntry::new(200)).is_some());
        assert!(store.record("http://h/", PageEntry::new(500)).is_none());
        assert_eq!(store.page("http://h/").unwrap().status_code(), 200);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_concurrent_admit_schedules_exactly_once() {
        let store = Arc::new(ResultStore::new());
        let ignore = Arc::new(no_ignores());

        let scheduled: usize = thread::scope(|scope| {
            let handles: Vec<_> = (0..16)
                .map(|_| {
                    let store = Arc::clone(&store);
                    let ignore = Arc::clone(&ignore);
                    scope.spawn(move || {
                        (0..100)
                            .filter(|i| {
                                let url = format!("http://h/page{}", i % 10);
                                store.admit(&url, &ignore) == Admission::Scheduled
                            })
                            .count()
                    })
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).sum()
        });

        assert_eq!(scheduled, 10);
    }

    #[test]
    fn test_links_keep_insertion_order() {
        let entry = PageEntry::new(200);
        entry.push_link("http://h/1");
        entry.push_link("mailto:a@b.c");
        entry.push_link("http://h/2");

        assert_eq!(
            entry.to_result().links,
            vec!["http://h/1", "mailto:a@b.c", "http://h/2"]
        );
    }

    #[test]
    fn test_structured_data_sorted_by_index() {
        let entry = PageEntry::new(200);
        entry.push_structured_data(2, report("third"));
        entry.push_structured_data(0, report("first"));
        entry.push_structured_data(1, report("second"));

        let contents: Vec<_> = entry
            .to_result()
            .structured_data
            .into_iter()
            .map(|r| r.content)
            .collect();
        assert_eq!(contents, vec!["first", "second", "third"]);
    }

    #[test]
    fn test_failed_entry() {
        let result = PageEntry::failed("connection refused").to_result();
        assert_eq!(result.status_code, 0);
        assert_eq!(result.error.as_deref(), Some("connection refused"));
        assert!(result.is_broken());
    }

    #[test]
    fn test_error_set_after_response() {
        let entry = PageEntry::new(200);
        entry.set_error("error decoding response body");

        let result = entry.to_result();
        assert_eq!(result.status_code, 200);
        assert_eq!(result.error.as_deref(), Some("error decoding response body"));
        assert!(result.is_broken());
    }

    #[test]
    fn test_snapshot() {
        let store = ResultStore::new();
        let home = store.record("http://h/", PageEntry::new(200)).unwrap();
        home.push_link("http://h/missing");
        store.record("http://h/missing", PageEntry::new(404)).unwrap();

        let result = store.snapshot();
        assert_eq!(result.len(), 2);
        assert_eq!(result.get("http://h/").unwrap().links, vec!["http://h/missing"]);
        assert_eq!(result.broken().count(), 1);
    }
}
