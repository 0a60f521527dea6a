use serde::Deserialize;

/// Default number of concurrent workers
pub const DEFAULT_WORKERS: usize = 10;

/// Default per-request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Main configuration structure for a crawl
#[derive(Debug, Clone, Deserialize)]
pub struct Options {
    /// Number of concurrent workers
    #[serde(default = "default_workers")]
    pub workers: usize,

    /// Seed URLs the crawl starts from
    #[serde(default)]
    pub urls: Vec<String>,

    /// Regular expressions naming URLs that must not be fetched
    #[serde(default, rename = "ignore-urls")]
    pub ignore_urls: Vec<String>,

    /// Whether pages on other sites are parsed for further references
    #[serde(default = "default_true", rename = "inspect-external")]
    pub inspect_external: bool,

    /// Abort the whole crawl on the first request that gets no response
    #[serde(default, rename = "fail-fast")]
    pub fail_fast: bool,

    #[serde(default)]
    pub http: HttpConfig,

    /// Structured data validation; disabled when absent
    #[serde(default, rename = "structured-data")]
    pub structured_data: Option<StructuredDataConfig>,
}

/// HTTP client configuration
#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    #[serde(default = "default_user_agent", rename = "user-agent")]
    pub user_agent: String,

    /// Per-request timeout (seconds)
    #[serde(default = "default_timeout", rename = "timeout-secs")]
    pub timeout_secs: u64,

    /// Skip TLS certificate verification
    #[serde(default, rename = "accept-invalid-certs")]
    pub accept_invalid_certs: bool,
}

/// Structured data validation configuration
#[derive(Debug, Clone, Deserialize)]
pub struct StructuredDataConfig {
    pub provider: ValidatorProvider,

    #[serde(default, rename = "api-key")]
    pub api_key: String,

    /// Overrides the provider's API endpoint
    #[serde(default)]
    pub endpoint: Option<String>,
}

/// Supported structured data validation services
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ValidatorProvider {
    Yandex,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            workers: DEFAULT_WORKERS,
            urls: Vec::new(),
            ignore_urls: Vec::new(),
            inspect_external: true,
            fail_fast: false,
            http: HttpConfig::default(),
            structured_data: None,
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            accept_invalid_certs: false,
        }
    }
}

fn default_workers() -> usize {
    DEFAULT_WORKERS
}

fn default_true() -> bool {
    true
}

fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_user_agent() -> String {
    format!("{}/{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))
}
