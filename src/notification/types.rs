use chrono::{DateTime, Utc};
use serde::Serialize;

/// Summary text of a successful dispatch
pub const SUCCESS_MESSAGE: &str = "Push message sent successfully";

/// Summary text of a failed dispatch
pub const FAILURE_MESSAGE: &str = "Push send failed";

/// Outcome for one recipient of a batch send
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RecipientResult {
    /// Provider-assigned message id
    MessageId(String),
    /// Provider error description
    Error(String),
}

impl RecipientResult {
    pub fn is_success(&self) -> bool {
        matches!(self, RecipientResult::MessageId(_))
    }
}

/// Aggregate result of a provider batch send.
///
/// `responses[i]` belongs to the i-th token of the batch request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchOutcome {
    pub success_count: usize,
    pub failure_count: usize,
    pub responses: Vec<RecipientResult>,
}

impl BatchOutcome {
    /// Build an outcome from ordered per-recipient results
    pub fn from_results(responses: Vec<RecipientResult>) -> Self {
        let success_count = responses.iter().filter(|r| r.is_success()).count();
        Self {
            success_count,
            failure_count: responses.len() - success_count,
            responses,
        }
    }
}

/// Provider response carried by a successful dispatch
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ProviderResponse {
    /// Message id of a single-token or topic send
    MessageId(String),
    /// Batch send accounting
    Batch(BatchOutcome),
}

/// Normalized result of one dispatch call
#[derive(Debug, Clone, Serialize)]
pub struct DispatchResult {
    #[serde(rename = "success")]
    succeeded: bool,
    message: String,
    timestamp: DateTime<Utc>,
    /// Kept as `firebase_response` on the wire for existing clients
    #[serde(rename = "firebase_response", skip_serializing_if = "Option::is_none")]
    provider_response: Option<ProviderResponse>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl DispatchResult {
    /// Create a successful result
    pub fn success(response: ProviderResponse) -> Self {
        Self {
            succeeded: true,
            message: SUCCESS_MESSAGE.to_string(),
            timestamp: Utc::now(),
            provider_response: Some(response),
            error: None,
        }
    }

    /// Create a failed result
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            succeeded: false,
            message: FAILURE_MESSAGE.to_string(),
            timestamp: Utc::now(),
            provider_response: None,
            error: Some(error.into()),
        }
    }

    pub fn succeeded(&self) -> bool {
        self.succeeded
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn provider_response(&self) -> Option<&ProviderResponse> {
        self.provider_response.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}
