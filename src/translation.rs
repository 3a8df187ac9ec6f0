use crate::config::Config;
use crate::retry::{with_retry_if, RetryConfig};
use anyhow::Context;
use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

/// Why a remote translation attempt produced no usable text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TranslationError {
    #[error("Failed to send translation request: {0}")]
    Network(String),

    #[error("Translation request timed out after {0:?}")]
    Timeout(Duration),

    #[error("Translation API error ({status}): {body}")]
    Status { status: u16, body: String },

    #[error("Malformed translation response: {0}")]
    MalformedResponse(String),
}

impl TranslationError {
    /// 429 and 5xx responses, network errors and timeouts are transient.
    /// Other 4xx client errors and malformed bodies are not retried.
    pub fn is_retryable(&self) -> bool {
        match self {
            TranslationError::Network(_) | TranslationError::Timeout(_) => true,
            TranslationError::Status { status, .. } => *status == 429 || *status >= 500,
            TranslationError::MalformedResponse(_) => false,
        }
    }
}

/// Request body sent to the translation provider
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslateRequest<'a> {
    pub text: &'a str,
    pub source_language_code: &'a str,
    pub target_language_code: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TranslateResponse {
    translated_text: String,
}

/// The "remote translate" capability the resolver depends on.
///
/// Implementations report failures as `TranslationError`; deciding what to
/// show instead is the resolver's job.
pub trait RemoteTranslator: Send + Sync {
    fn translate<'a>(
        &'a self,
        request: TranslateRequest<'a>,
    ) -> BoxFuture<'a, Result<String, TranslationError>>;
}

/// JSON-over-HTTP translation provider client.
#[derive(Debug, Clone)]
pub struct HttpTranslator {
    client: reqwest::Client,
    api_url: String,
    api_key: Option<String>,
    timeout: Duration,
    retry: RetryConfig,
}

impl HttpTranslator {
    /// Build a client whose every attempt is bounded by `config.translate_timeout`.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.translate_timeout)
            .build()
            .context("Failed to build translation HTTP client")?;

        Ok(Self {
            client,
            api_url: config.translate_api_url.clone(),
            api_key: config.translate_api_key.clone(),
            timeout: config.translate_timeout,
            retry: RetryConfig::remote_translation(),
        })
    }

    /// Replace the retry policy (tests use `RetryConfig::single_attempt()`).
    pub fn with_retry_config(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    fn classify(&self, error: reqwest::Error) -> TranslationError {
        if error.is_timeout() {
            TranslationError::Timeout(self.timeout)
        } else {
            TranslationError::Network(error.to_string())
        }
    }

    async fn send_once(&self, request: &TranslateRequest<'_>) -> Result<String, TranslationError> {
        let mut builder = self.client.post(&self.api_url).json(request);
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key);
        }

        let response = builder.send().await.map_err(|e| self.classify(e))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response
                .text()
                .await
                .unwrap_or_else(|e| format!("<failed to read body: {}>", e));
            return Err(TranslationError::Status { status, body });
        }

        let payload: TranslateResponse = response.json().await.map_err(|e| {
            if e.is_timeout() {
                TranslationError::Timeout(self.timeout)
            } else {
                TranslationError::MalformedResponse(e.to_string())
            }
        })?;

        if payload.translated_text.trim().is_empty() {
            return Err(TranslationError::MalformedResponse(
                "translatedText is empty".to_string(),
            ));
        }

        debug!(
            "Remote translation {} -> {} succeeded",
            request.source_language_code, request.target_language_code
        );
        Ok(payload.translated_text)
    }
}

impl RemoteTranslator for HttpTranslator {
    fn translate<'a>(
        &'a self,
        request: TranslateRequest<'a>,
    ) -> BoxFuture<'a, Result<String, TranslationError>> {
        Box::pin(async move {
            with_retry_if(
                &self.retry,
                &format!("Translation to {}", request.target_language_code),
                || self.send_once(&request),
                TranslationError::is_retryable,
            )
            .await
        })
    }
}


/// Scripted `RemoteTranslator` for unit tests.
#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::collections::{HashMap, HashSet};
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Answers `"{target}:{text}"`, or fails with a 503 for scripted texts.
    #[derive(Debug, Default)]
    pub(crate) struct FakeTranslator {
        calls: AtomicUsize,
        fail_all: bool,
        failing: HashSet<String>,
        delays: HashMap<String, Duration>,
    }

    impl FakeTranslator {
        pub(crate) fn echo() -> Self {
            Self::default()
        }

        pub(crate) fn failing() -> Self {
            Self {
                fail_all: true,
                ..Self::default()
            }
        }

        pub(crate) fn failing_for(mut self, text: &str) -> Self {
            self.failing.insert(text.to_string());
            self
        }

        pub(crate) fn with_delay(mut self, text: &str, delay: Duration) -> Self {
            self.delays.insert(text.to_string(), delay);
            self
        }

        pub(crate) fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl RemoteTranslator for FakeTranslator {
        fn translate<'a>(
            &'a self,
            request: TranslateRequest<'a>,
        ) -> BoxFuture<'a, Result<String, TranslationError>> {
            Box::pin(async move {
                self.calls.fetch_add(1, Ordering::SeqCst);
                if let Some(delay) = self.delays.get(request.text) {
                    tokio::time::sleep(*delay).await;
                }
                if self.fail_all || self.failing.contains(request.text) {
                    return Err(TranslationError::Status {
                        status: 503,
                        body: "unavailable".to_string(),
                    });
                }
                Ok(format!("{}:{}", request.target_language_code, request.text))
            })
        }
    }
}
