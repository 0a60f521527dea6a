//! Crawl state management
//!
//! This module contains the shared result store that workers write into while
//! a crawl runs, and the frozen result types handed back once it finishes.

mod check_result;
mod store;

pub use check_result::{CheckResult, PageResult, StructuredDataReport};
pub use store::{Admission, PageEntry, ResultStore};
