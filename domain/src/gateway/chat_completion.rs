//! HTTP client for OpenAI-compatible chat-completion endpoints.
//!
//! One call to [`ChatCompletionClient::complete`] sends one logical request. Transport
//! failures are retried with a bounded backoff; HTTP answers never are.

use std::time::Duration;

use async_trait::async_trait;
use log::*;
use meeting_ai::{CompletionRequest, CompletionResult, Error as CompletionError};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::StatusCode;
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::RetryTransientMiddleware;
use service::config::Config;

use super::retry::{TransportFailuresOnly, TransportRetryPolicy};
use crate::error::{DomainErrorKind, Error, InternalErrorKind};
use crate::CompletionProvider;

/// Everything needed to reach a completion provider.
#[derive(Debug, Clone)]
pub struct CompletionSettings {
    pub url: String,
    pub api_key: String,
    pub model: String,
    pub session_id: Option<String>,
    pub chat_id: Option<String>,
    pub message_id: Option<String>,
    pub timeout: Duration,
    pub max_retries: u32,
}

fn missing_setting(name: &str) -> Error {
    warn!("Completion provider setting {name} is not configured");
    Error {
        source: None,
        error_kind: DomainErrorKind::Internal(InternalErrorKind::Config),
    }
}

impl CompletionSettings {
    /// Longest a single [`ChatCompletionClient::complete`] call can take: every attempt
    /// running into the timeout plus the backoff slept between them.
    pub fn worst_case_duration(&self) -> Duration {
        self.timeout
            .checked_mul(self.max_retries.saturating_add(1))
            .unwrap_or(Duration::MAX)
            .saturating_add(TransportRetryPolicy::new(self.max_retries).total_backoff())
    }
}

impl TryFrom<&Config> for CompletionSettings {
    type Error = Error;

    fn try_from(config: &Config) -> Result<Self, Self::Error> {
        let settings = Self {
            url: config
                .completion_url()
                .ok_or_else(|| missing_setting("COMPLETION_URL"))?,
            api_key: config
                .completion_api_key()
                .ok_or_else(|| missing_setting("COMPLETION_API_KEY"))?,
            model: config
                .completion_model()
                .ok_or_else(|| missing_setting("COMPLETION_MODEL"))?,
            session_id: config.completion_session_id(),
            chat_id: config.completion_chat_id(),
            message_id: config.completion_message_id(),
            timeout: config.completion_timeout(),
            max_retries: config.completion_max_retries,
        };

        // Inbound requests must outlive the provider call, or callers get a timeout
        // while the summary is still being produced.
        let worst_case = settings.worst_case_duration();
        if config.request_timeout() < worst_case {
            warn!(
                "REQUEST_TIMEOUT_SECS ({:?}) is shorter than the worst-case completion call ({:?})",
                config.request_timeout(),
                worst_case
            );
            return Err(Error::from_kind(DomainErrorKind::Internal(
                InternalErrorKind::Config,
            )));
        }

        Ok(settings)
    }
}

/// Stateless chat-completion client. Safe to share across requests.
pub struct ChatCompletionClient {
    client: ClientWithMiddleware,
    settings: CompletionSettings,
}

impl ChatCompletionClient {
    pub fn new(settings: CompletionSettings) -> Result<Self, Error> {
        Self::with_retry_policy(
            TransportRetryPolicy::new(settings.max_retries),
            settings,
        )
    }

    pub fn with_retry_policy(
        retry_policy: TransportRetryPolicy,
        settings: CompletionSettings,
    ) -> Result<Self, Error> {
        let mut headers = HeaderMap::new();

        let mut header_value = HeaderValue::from_str(&format!("Bearer {}", settings.api_key))
            .map_err(|e| {
                warn!("Failed to create authorization header: {:?}", e);
                Error {
                    source: Some(Box::new(e)),
                    error_kind: DomainErrorKind::Internal(InternalErrorKind::Other(
                        "Invalid API key format".to_string(),
                    )),
                }
            })?;
        header_value.set_sensitive(true);
        headers.insert(AUTHORIZATION, header_value);

        let client = reqwest::Client::builder()
            .use_rustls_tls()
            .default_headers(headers)
            .timeout(settings.timeout)
            .build()?;

        let client = ClientBuilder::new(client)
            .with(RetryTransientMiddleware::new_with_policy_and_strategy(
                retry_policy,
                TransportFailuresOnly,
            ))
            .build();

        Ok(Self { client, settings })
    }

    fn build_request(&self, prompt: &str) -> CompletionRequest {
        CompletionRequest::from_prompt(&self.settings.model, prompt)
            .with_session_id(self.settings.session_id.clone())
            .with_chat_id(self.settings.chat_id.clone())
            .with_id(self.settings.message_id.clone())
    }
}

#[async_trait]
impl CompletionProvider for ChatCompletionClient {
    async fn complete(&self, prompt: &str) -> Result<CompletionResult, CompletionError> {
        let body = serde_json::to_vec(&self.build_request(prompt))
            .map_err(|e| CompletionError::Configuration(e.to_string()))?;

        debug!(
            "Sending completion request to {} with model {}",
            self.settings.url, self.settings.model
        );

        let response = self
            .client
            .post(&self.settings.url)
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .map_err(|e| {
                warn!("Failed to reach completion provider: {:?}", e);
                CompletionError::Unavailable(Box::new(e))
            })?;

        let status = response.status();
        let bytes = response.bytes().await.map_err(|e| {
            warn!("Failed to read completion provider response: {:?}", e);
            CompletionError::Unavailable(Box::new(e))
        })?;

        if status != StatusCode::OK {
            let body = String::from_utf8_lossy(&bytes).into_owned();
            error!("Completion provider returned {}: {}", status, body);
            return Err(CompletionError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let result = CompletionResult::from_slice(&bytes).map_err(|e| {
            warn!("Failed to parse completion provider response: {:?}", e);
            CompletionError::MalformedResponse(Box::new(e))
        })?;

        info!(
            "Completion provider answered with id {}",
            result.id().unwrap_or("<none>")
        );
        Ok(result)
    }
}
