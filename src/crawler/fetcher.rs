//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests made by workers:
//! - Building the shared HTTP client from the configuration
//! - GET requests returning the final status code
//! - Reading the body only when the caller intends to parse it

use crate::config::HttpConfig;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Response};
use std::time::Duration;
use url::Url;

/// Response to a GET request
#[derive(Debug)]
pub struct FetchedPage {
    /// HTTP status code after following redirects
    pub status_code: u16,

    /// Content-Type header value, if the server sent one
    pub content_type: Option<String>,

    response: Response,
}

impl FetchedPage {
    /// Returns false when the server declared a non-HTML content type
    ///
    /// A missing header is treated as HTML.
    pub fn is_html(&self) -> bool {
        match &self.content_type {
            Some(content_type) => content_type.to_ascii_lowercase().contains("html"),
            None => true,
        }
    }

    /// Reads the full body as text
    pub async fn text(self) -> Result<String, reqwest::Error> {
        self.response.text().await
    }
}

/// Builds the HTTP client shared by all workers
///
/// # Arguments
///
/// * `config` - The HTTP configuration
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
///
/// # Example
///
/// ```
/// use website_checker::config::HttpConfig;
/// use website_checker::crawler::build_http_client;
///
/// let client = build_http_client(&HttpConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &HttpConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.as_str())
        .timeout(Duration::from_secs(config.timeout_secs))
        .connect_timeout(Duration::from_secs(config.timeout_secs.min(10)))
        .danger_accept_invalid_certs(config.accept_invalid_certs)
        .gzip(true)
        .brotli(true)
        .build()
}

/// Sends a GET request for `url`
///
/// Redirects are followed; the recorded status is the one of the final
/// response. Error statuses (4xx, 5xx) are successful fetches: only a failure
/// to obtain any response is an error.
///
/// # Arguments
///
/// * `client` - The HTTP client to use
/// * `url` - The URL to fetch
///
/// # Returns
///
/// * `Ok(FetchedPage)` - Status and headers; the body has not been read yet
/// * `Err(reqwest::Error)` - DNS, connection, TLS or timeout failure
pub async fn fetch_page(client: &Client, url: &Url) -> Result<FetchedPage, reqwest::Error> {
    let response = client.get(url.clone()).send().await?;

    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    Ok(FetchedPage {
        status_code: response.status().as_u16(),
        content_type,
        response,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_build_http_client() {
        let client = build_http_client(&HttpConfig::default());
        assert!(client.is_ok());
    }

    #[test]
    fn test_build_insecure_client() {
        let config = HttpConfig {
            accept_invalid_certs: true,
            ..HttpConfig::default()
        };
        assert!(build_http_client(&config).is_ok());
    }

    #[tokio::test]
    async fn test_fetch_html_page() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/"))
            .respond_with(ResponseTemplate::new(200).set_body_raw("<a href=\"/x\">x</a>", "text/html"))
            .mount(&mock_server)
            .await;

        let client = build_http_client(&HttpConfig::default()).unwrap();
        let url = Url::parse(&format!("{}/", mock_server.uri())).unwrap();
        let page = fetch_page(&client, &url).await.unwrap();

        assert_eq!(page.status_code, 200);
        assert!(page.is_html());
        assert_eq!(page.text().await.unwrap(), "<a href=\"/x\">x</a>");
    }

    #[tokio::test]
    async fn test_error_status_is_not_an_error() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&mock_server)
            .await;

        let client = build_http_client(&HttpConfig::default()).unwrap();
        let url = Url::parse(&format!("{}/missing", mock_server.uri())).unwrap();
        let page = fetch_page(&client, &url).await.unwrap();

        assert_eq!(page.status_code, 404);
    }

    #[tokio::test]
    async fn test_non_html_content_type() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(vec![0u8, 1, 2], "image/png"))
            .mount(&mock_server)
            .await;

        let client = build_http_client(&HttpConfig::default()).unwrap();
        let url = Url::parse(&format!("{}/logo.png", mock_server.uri())).unwrap();
        let page = fetch_page(&client, &url).await.unwrap();

        assert!(!page.is_html());
    }

    #[tokio::test]
    async fn test_connection_refused_is_an_error() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let client = build_http_client(&HttpConfig::default()).unwrap();
        let url = Url::parse(&format!("http://127.0.0.1:{}/", port)).unwrap();

        assert!(fetch_page(&client, &url).await.is_err());
    }
}
