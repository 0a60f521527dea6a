use crate::config::types::Options;
use crate::config::validation::validate;
use crate::ConfigError;
use std::path::Path;

/// Reads options from a TOML file without validating them
///
/// Command-line flags are usually layered on top before validation, so a
/// file that only sets HTTP options is acceptable here.
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(Options)` - Parsed options, defaults filled in
/// * `Err(ConfigError)` - Failed to read or parse the file
pub fn read_options(path: &Path) -> Result<Options, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let options: Options = toml::from_str(&content)?;
    Ok(options)
}

/// Loads and validates options from a TOML file
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use website_checker::config::load_options;
///
/// let options = load_options(Path::new("checker.toml")).unwrap();
/// println!("Workers: {}", options.workers);
/// ```
pub fn load_options(path: &Path) -> Result<Options, ConfigError> {
    let options = read_options(path)?;
    validate(&options)?;
    Ok(options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ValidatorProvider;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_load_valid_config() {
        let config_content = r#"
workers = 4
urls = ["https://example.com/"]
ignore-urls = ["\\.pdf$"]
inspect-external = false

[http]
user-agent = "TestChecker/1.0"
timeout-secs = 5
accept-invalid-certs = true

[structured-data]
provider = "yandex"
api-key = "secret"
"#;

        let file = create_temp_config(config_content);
        let options = load_options(file.path()).unwrap();

        assert_eq!(options.workers, 4);
        assert_eq!(options.urls, vec!["https://example.com/"]);
        assert_eq!(options.ignore_urls, vec!["\\.pdf$"]);
        assert!(!options.inspect_external);
        assert!(!options.fail_fast);
        assert_eq!(options.http.user_agent, "TestChecker/1.0");
        assert_eq!(options.http.timeout_secs, 5);
        assert!(options.http.accept_invalid_certs);

        let structured = options.structured_data.unwrap();
        assert_eq!(structured.provider, ValidatorProvider::Yandex);
        assert_eq!(structured.api_key, "secret");
    }

    #[test]
    fn test_defaults_filled_in() {
        let file = create_temp_config(r#"urls = ["https://example.com/"]"#);
        let options = load_options(file.path()).unwrap();

        assert_eq!(options.workers, 10);
        assert!(options.inspect_external);
        assert_eq!(options.http.timeout_secs, 30);
        assert!(options.structured_data.is_none());
    }

    #[test]
    fn test_read_without_urls_is_allowed() {
        let file = create_temp_config("workers = 2");
        let options = read_options(file.path()).unwrap();
        assert!(options.urls.is_empty());

        assert!(matches!(
            load_options(file.path()),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn test_load_config_with_invalid_path() {
        let result = load_options(Path::new("/nonexistent/checker.toml"));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[test]
    fn test_load_config_with_invalid_toml() {
        let file = create_temp_config("this is not valid TOML {{{");
        let result = load_options(file.path());
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_unknown_provider_rejected() {
        let file = create_temp_config(
            r#"
urls = ["https://example.com/"]

[structured-data]
provider = "google"
"#,
        );
        assert!(matches!(read_options(file.path()), Err(ConfigError::Parse(_))));
    }
}
