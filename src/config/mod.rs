//! Configuration module
//!
//! Options can come from a TOML file, from command-line flags, or both; the
//! binary reads the file first and layers flags on top before validating.
//!
//! # Example
//!
//! ```no_run
//! use website_checker::config::load_options;
//! use std::path::Path;
//!
//! let options = load_options(Path::new("checker.toml")).unwrap();
//! println!("Crawling with {} workers", options.workers);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    HttpConfig, Options, StructuredDataConfig, ValidatorProvider, DEFAULT_TIMEOUT_SECS,
    DEFAULT_WORKERS,
};

pub use parser::{load_options, read_options};
pub use validation::{validate, MAX_WORKERS};
