//! Structured data validation
//!
//! Workers hand each JSON-LD block to a [`StructuredDataValidator`] and store
//! whatever report it returns next to the block.

use crate::config::{StructuredDataConfig, ValidatorProvider};
use crate::ValidationError;
use async_trait::async_trait;
use reqwest::Client;
use std::sync::Arc;

/// Default endpoint of the Yandex structured data validator API
pub const YANDEX_VALIDATOR_ENDPOINT: &str =
    "https://validator-api.semweb.yandex.ru/v1.1/document_parser";

/// A service that checks an HTML fragment for structured data errors
#[async_trait]
pub trait StructuredDataValidator: Send + Sync {
    /// Validates `document` and returns the service's report
    async fn validate(&self, document: &str) -> Result<serde_json::Value, ValidationError>;
}

/// Wraps raw JSON-LD text in the script element validators expect
pub fn wrap_json_ld(content: &str) -> String {
    format!(r#"<script type="application/ld+json">{}</script>"#, content)
}

/// Validator backed by the Yandex structured data validator API
#[derive(Debug, Clone)]
pub struct YandexValidator {
    client: Client,
    api_key: String,
    endpoint: String,
}

impl YandexValidator {
    pub fn new(client: Client, api_key: impl Into<String>) -> Self {
        Self::with_endpoint(client, api_key, YANDEX_VALIDATOR_ENDPOINT)
    }

    pub fn with_endpoint(
        client: Client,
        api_key: impl Into<String>,
        endpoint: impl Into<String>,
    ) -> Self {
        Self {
            client,
            api_key: api_key.into(),
            endpoint: endpoint.into(),
        }
    }
}

#[async_trait]
impl StructuredDataValidator for YandexValidator {
    async fn validate(&self, document: &str) -> Result<serde_json::Value, ValidationError> {
        let response = self
            .client
            .post(&self.endpoint)
            .query(&[
                ("apikey", self.api_key.as_str()),
                ("lang", "en"),
                ("pretty", "false"),
                ("only_errors", "false"),
            ])
            .form(&[("text", document)])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ValidationError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response.json().await?)
    }
}

/// Builds the validator selected by the configuration, if any
pub fn build_validator(
    client: &Client,
    config: Option<&StructuredDataConfig>,
) -> Option<Arc<dyn StructuredDataValidator>> {
    let config = config?;
    match config.provider {
        ValidatorProvider::Yandex => {
            let endpoint = config
                .endpoint
                .clone()
                .unwrap_or_else(|| YANDEX_VALIDATOR_ENDPOINT.to_string());
            Some(Arc::new(YandexValidator::with_endpoint(
                client.clone(),
                config.api_key.clone(),
                endpoint,
            )))
        }
    }
}
