//! website-checker main entry point
//!
//! This is the command-line interface for the website-checker broken-link
//! crawler. The JSON report goes to stdout; logs go to stderr.

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use website_checker::config::{
    read_options, validate, Options, StructuredDataConfig, ValidatorProvider,
};
use website_checker::crawler::check;
use website_checker::output::{collect_statistics, log_statistics, render_json};

/// website-checker: find broken links on a website
///
/// Crawls every page reachable from the given URLs, checks each link, image,
/// script and stylesheet reference, and prints the HTTP status and references
/// of every URL as JSON.
#[derive(Parser, Debug)]
#[command(name = "website-checker")]
#[command(version)]
#[command(about = "Crawls a website and reports the status of every reference", long_about = None)]
struct Cli {
    /// URLs to start checking from
    #[arg(long = "urls", value_name = "URL", num_args = 1..)]
    urls: Vec<String>,

    /// Number of concurrent workers [default: 10]
    #[arg(long, value_name = "N")]
    workers: Option<usize>,

    /// Regular expressions for URLs that should not be fetched
    #[arg(long = "ignore-urls", value_name = "REGEX", num_args = 1..)]
    ignore_urls: Vec<String>,

    /// Do not parse pages hosted on other sites
    #[arg(long)]
    no_external_inspection: bool,

    /// Validate embedded JSON-LD with the given provider
    #[arg(long, value_enum, value_name = "PROVIDER")]
    check_structured_data: Option<ValidatorProvider>,

    /// API key for the Yandex structured data validator
    #[arg(long, value_name = "KEY")]
    yandex_api_key: Option<String>,

    /// Path to a TOML configuration file; flags override its values
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Abort on the first request that gets no response
    #[arg(long)]
    fail_fast: bool,

    /// Accept invalid TLS certificates
    #[arg(long)]
    insecure: bool,

    /// Per-request timeout in seconds [default: 30]
    #[arg(long, value_name = "SECS")]
    timeout: Option<u64>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    if let Err(e) = run(cli).await {
        exit(e);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let options = build_options(&cli)?;
    tracing::info!(
        "Checking {} URL(s) with {} workers, {} ignore pattern(s)",
        options.urls.len(),
        options.workers,
        options.ignore_urls.len()
    );

    let result = check(options).await.context("Check failed")?;

    let stats = collect_statistics(&result);
    log_statistics(&stats, &result);

    let json = render_json(&result).context("Failed to render report")?;
    println!("{}", json);

    Ok(())
}

/// Logs the error chain and exits with status 1
///
/// The subscriber writes to stderr and keeps error level even with `-q`.
fn exit(error: anyhow::Error) -> ! {
    tracing::error!("{:#}", error);
    std::process::exit(1);
}

/// Layers command-line flags over the configuration file, if any
fn build_options(cli: &Cli) -> anyhow::Result<Options> {
    let mut options = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            read_options(path)
                .with_context(|| format!("Failed to load configuration from {}", path.display()))?
        }
        None => Options::default(),
    };

    if let Some(workers) = cli.workers {
        options.workers = workers;
    }
    options.urls.extend(cli.urls.iter().cloned());
    options.ignore_urls.extend(cli.ignore_urls.iter().cloned());
    if cli.no_external_inspection {
        options.inspect_external = false;
    }
    if cli.fail_fast {
        options.fail_fast = true;
    }
    if cli.insecure {
        options.http.accept_invalid_certs = true;
    }
    if let Some(timeout) = cli.timeout {
        options.http.timeout_secs = timeout;
    }

    let existing = options.structured_data.take();
    options.structured_data = match (cli.check_structured_data, existing) {
        (Some(provider), existing) => Some(StructuredDataConfig {
            provider,
            api_key: cli
                .yandex_api_key
                .clone()
                .or_else(|| existing.as_ref().map(|c| c.api_key.clone()))
                .unwrap_or_default(),
            endpoint: existing.and_then(|c| c.endpoint),
        }),
        (None, Some(mut existing)) => {
            if let Some(key) = &cli.yandex_api_key {
                existing.api_key = key.clone();
            }
            Some(existing)
        }
        (None, None) => None,
    };

    validate(&options).context("Invalid configuration")?;
    Ok(options)
}

/// Sets up the logging/tracing subscriber based on verbosity level
///
/// `DEBUG=1` in the environment raises the level to at least debug.
fn setup_logging(verbose: u8, quiet: bool) {
    let debug_env = std::env::var("DEBUG")
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
        .unwrap_or(false);
    let verbose = if debug_env { verbose.max(1) } else { verbose };

    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("website_checker=info,warn"),
            1 => EnvFilter::new("website_checker=debug,info"),
            2 => EnvFilter::new("website_checker=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}
