//! Crawler module for fetching and checking pages
//!
//! This module contains the core crawling logic, including:
//! - The task queue and the units of work it carries
//! - HTTP fetching and HTML reference extraction
//! - Structured data validation
//! - The worker pool and dispatch loop

mod coordinator;
mod fetcher;
mod parser;
mod queue;
mod task;
mod validator;
mod worker;

pub use coordinator::{check, Checker};
pub use fetcher::{build_http_client, fetch_page, FetchedPage};
pub use parser::{parse_html, ParsedPage, Reference, ReferenceKind};
pub use queue::{CompletionGuard, TaskQueue};
pub use task::{FetchTask, StructuredDataTask, Task};
pub use validator::{
    build_validator, wrap_json_ld, StructuredDataValidator, YandexValidator,
    YANDEX_VALIDATOR_ENDPOINT,
};
pub use worker::Worker;
