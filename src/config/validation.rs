use crate::config::types::{HttpConfig, Options, StructuredDataConfig};
use crate::url::IgnoreFilter;
use crate::ConfigError;

/// Upper bound on concurrent workers
pub const MAX_WORKERS: usize = 1000;

/// Validates the entire configuration
pub fn validate(options: &Options) -> Result<(), ConfigError> {
    validate_workers(options.workers)?;
    validate_urls(&options.urls)?;
    IgnoreFilter::new(&options.ignore_urls)?;
    validate_http_config(&options.http)?;
    if let Some(structured_data) = &options.structured_data {
        validate_structured_data(structured_data)?;
    }
    Ok(())
}

fn validate_workers(workers: usize) -> Result<(), ConfigError> {
    if workers < 1 || workers > MAX_WORKERS {
        return Err(ConfigError::Validation(format!(
            "workers must be between 1 and {}, got {}",
            MAX_WORKERS, workers
        )));
    }
    Ok(())
}

/// Seed URLs are resolved when the crawl starts; a bad seed is a crawl
/// error, not a configuration error. Only their presence is checked here.
fn validate_urls(urls: &[String]) -> Result<(), ConfigError> {
    if urls.is_empty() {
        return Err(ConfigError::Validation(
            "at least one URL to check is required".to_string(),
        ));
    }
    if urls.iter().any(|url| url.trim().is_empty()) {
        return Err(ConfigError::Validation(
            "URLs to check cannot be empty".to_string(),
        ));
    }
    Ok(())
}

fn validate_http_config(config: &HttpConfig) -> Result<(), ConfigError> {
    if config.timeout_secs == 0 {
        return Err(ConfigError::Validation(
            "timeout-secs must be at least 1".to_string(),
        ));
    }
    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user-agent cannot be empty".to_string(),
        ));
    }
    Ok(())
}

fn validate_structured_data(config: &StructuredDataConfig) -> Result<(), ConfigError> {
    if config.api_key.trim().is_empty() {
        return Err(ConfigError::Validation(format!(
            "missing API key for structured data provider {:?}",
            config.provider
        )));
    }
    Ok(())
}
