//! FCM HTTP v1 push provider.

use std::time::Duration;

use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

use crate::config::FirebaseConfig;
use crate::notification::{
    BatchOutcome, ProviderError, PushMessage, PushProvider, RecipientResult, MAX_BATCH_TOKENS,
};

use super::auth::TokenSource;
use super::credentials::ServiceAccountKey;
use super::FirebaseSetupError;

#[derive(Serialize)]
struct SendRequest<'a> {
    message: &'a PushMessage,
}

#[derive(Deserialize)]
struct SendResponse {
    /// `projects/{project}/messages/{id}`
    name: String,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
    status: Option<String>,
}

/// Sends push messages through Firebase Cloud Messaging
pub struct FcmProvider {
    http: reqwest::Client,
    tokens: TokenSource,
    send_url: String,
    max_concurrent_sends: usize,
}

impl FcmProvider {
    pub fn new(key: ServiceAccountKey, config: &FirebaseConfig) -> Result<Self, FirebaseSetupError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;
        let tokens = TokenSource::new(http.clone(), &key)?;

        let send_url = format!(
            "{}/v1/projects/{}/messages:send",
            config.endpoint.trim_end_matches('/'),
            key.project_id
        );

        Ok(Self {
            http,
            tokens,
            send_url,
            max_concurrent_sends: config.max_concurrent_sends.max(1),
        })
    }

    async fn post_message(&self, access_token: &str, message: &PushMessage) -> Result<String, ProviderError> {
        let response = self
            .http
            .post(&self.send_url)
            .bearer_auth(access_token)
            .json(&SendRequest { message })
            .send()
            .await
            .map_err(|e| ProviderError::Transport(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            let body: SendResponse = response
                .json()
                .await
                .map_err(|e| ProviderError::Decode(e.to_string()))?;
            Ok(body.name)
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(rejection(status, &body))
        }
    }
}

/// Map an FCM error response onto a provider error
fn rejection(status: StatusCode, body: &str) -> ProviderError {
    match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(envelope) => ProviderError::Rejected {
            status: envelope
                .error
                .status
                .unwrap_or_else(|| status.as_u16().to_string()),
            message: envelope.error.message,
        },
        Err(_) => ProviderError::Rejected {
            status: status.as_u16().to_string(),
            message: if body.is_empty() {
                status.canonical_reason().unwrap_or("unknown error").to_string()
            } else {
                body.to_string()
            },
        },
    }
}

#[async_trait]
impl PushProvider for FcmProvider {
    fn name(&self) -> &'static str {
        "fcm"
    }

    fn is_available(&self) -> bool {
        true
    }

    #[tracing::instrument(name = "fcm.send_to_single", skip(self, message))]
    async fn send_to_single(&self, message: &PushMessage) -> Result<String, ProviderError> {
        let access_token = self.tokens.access_token().await?;
        self.post_message(&access_token, message).await
    }

    #[tracing::instrument(name = "fcm.send_to_topic", skip(self, message))]
    async fn send_to_topic(&self, topic: &str, message: &PushMessage) -> Result<String, ProviderError> {
        let access_token = self.tokens.access_token().await?;
        self.post_message(&access_token, &message.with_topic(topic))
            .await
    }

    #[tracing::instrument(
        name = "fcm.send_to_batch",
        skip(self, tokens, message),
        fields(token_count = tokens.len())
    )]
    async fn send_to_batch(
        &self,
        tokens: &[String],
        message: &PushMessage,
    ) -> Result<BatchOutcome, ProviderError> {
        if tokens.len() > MAX_BATCH_TOKENS {
            return Err(ProviderError::InvalidBatch(format!(
                "{} tokens exceeds the limit of {}",
                tokens.len(),
                MAX_BATCH_TOKENS
            )));
        }

        // One token for the whole batch; failing here fails every recipient
        let access_token = self.tokens.access_token().await?;
        let access_token = access_token.as_str();

        // `buffered` keeps results in token order
        let responses: Vec<RecipientResult> = stream::iter(tokens.iter().cloned())
            .map(|token| async move {
                let addressed = message.with_token(token);
                match self.post_message(access_token, &addressed).await {
                    Ok(id) => RecipientResult::MessageId(id),
                    Err(e) => RecipientResult::Error(e.to_string()),
                }
            })
            .buffered(self.max_concurrent_sends)
            .collect()
            .await;

        Ok(BatchOutcome::from_results(responses))
    }
}
