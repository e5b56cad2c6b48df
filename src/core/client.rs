//! Async Youdao client with cooperative cancellation

use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::core::config::TranslatorConfig;
use crate::core::errors::{Result, TranslationError};
use crate::core::models::TranslationResult;
use crate::core::sign::SignedRequest;

/// Youdao translation client
#[derive(Debug, Clone)]
pub struct YoudaoClient {
    client: reqwest::Client,
    config: Arc<TranslatorConfig>,
}

impl YoudaoClient {
    /// Create a new client
    pub fn new(config: Arc<TranslatorConfig>) -> Result<Self> {
        config
            .validate()
            .map_err(|e| TranslationError::ConfigError {
                message: e.to_string(),
            })?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .pool_idle_timeout(Some(Duration::from_secs(30)))
            .pool_max_idle_per_host(2)
            .build()?;

        Ok(Self { client, config })
    }

    /// Configuration this client was built with
    pub fn config(&self) -> &TranslatorConfig {
        &self.config
    }

    /// Underlying HTTP client, shared with pronunciation downloads
    pub fn http(&self) -> &reqwest::Client {
        &self.client
    }

    /// Translate `text`, racing the request against `token`
    ///
    /// Blank text resolves to `Ok(None)` without any I/O. When `token` fires
    /// the in-flight request is dropped, which closes its connection, and
    /// `Err(TranslationError::Aborted)` is returned.
    pub async fn translate(
        &self,
        text: &str,
        token: &CancellationToken,
    ) -> Result<Option<TranslationResult>> {
        if text.trim().is_empty() {
            debug!("Nothing to translate, skipping request");
            return Ok(None);
        }

        tokio::select! {
            biased;
            _ = token.cancelled() => {
                debug!("Translation request cancelled");
                Err(TranslationError::Aborted)
            }
            result = self.send_request(text) => result.map(Some),
        }
    }

    /// Send actual HTTP request
    async fn send_request(&self, text: &str) -> Result<TranslationResult> {
        let signed = SignedRequest::new(text, &self.config.app_key, &self.config.app_secret);
        let params = signed.form_params(&self.config.from_language, &self.config.to_language);

        debug!(
            "Start to search |{}| ({} -> {}, salt {})",
            text, self.config.from_language, self.config.to_language, signed.salt
        );

        let response = self
            .client
            .post(&self.config.api_endpoint)
            .form(&params)
            .send()
            .await
            .map_err(TranslationError::from_transport)?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            warn!("Translation endpoint answered {}", status);
            return Err(TranslationError::ApiError {
                status: status.as_u16(),
                message: error_text,
            });
        }

        let body = response
            .text()
            .await
            .map_err(TranslationError::from_transport)?;

        parse_response(&body)
    }
}

/// Map a response body to a [`TranslationResult`]
///
/// Only `errorCode` is required. A non-`"0"` code still parses; callers
/// decide how to report it.
pub fn parse_response(body: &str) -> Result<TranslationResult> {
    serde_json::from_str(body).map_err(|e| TranslationError::InvalidResponseError {
        message: e.to_string(),
    })
}
