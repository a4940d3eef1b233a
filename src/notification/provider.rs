//! Push provider capability.
//!
//! The dispatcher talks to the delivery service only through [`PushProvider`].
//! Implementations own connection handling, authentication and any retry
//! policy; a single instance is shared across concurrent dispatches.

use async_trait::async_trait;
use thiserror::Error;

use super::message::PushMessage;
use super::types::BatchOutcome;

/// Largest token list accepted by one batch send
pub const MAX_BATCH_TOKENS: usize = 500;

/// Errors reported by a push provider.
#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    /// The provider was never initialized (missing credentials, etc.)
    #[error("provider unavailable: {0}")]
    Unavailable(String),

    /// Could not obtain provider credentials or an access token
    #[error("authentication failed: {0}")]
    Auth(String),

    /// The provider answered with an error status
    #[error("{status}: {message}")]
    Rejected { status: String, message: String },

    /// Network failure or timeout talking to the provider
    #[error("transport error: {0}")]
    Transport(String),

    /// The batch call itself was malformed
    #[error("invalid batch: {0}")]
    InvalidBatch(String),

    /// The provider response could not be understood
    #[error("unexpected provider response: {0}")]
    Decode(String),
}

/// Push delivery capability.
///
/// # Example Implementation
/// ```ignore
/// use async_trait::async_trait;
///
/// struct LoggingProvider;
///
/// #[async_trait]
/// impl PushProvider for LoggingProvider {
///     fn name(&self) -> &'static str { "logging" }
///     fn is_available(&self) -> bool { true }
///     async fn send_to_single(&self, message: &PushMessage) -> Result<String, ProviderError> {
///         tracing::info!(?message, "push (mock)");
///         Ok("mock-id".into())
///     }
///     // ...
/// }
/// ```
#[async_trait]
pub trait PushProvider: Send + Sync {
    /// Provider name for logs
    fn name(&self) -> &'static str;

    /// Whether the provider is initialized and able to send
    fn is_available(&self) -> bool;

    /// Send a message whose `token` field addresses one device.
    /// Returns the provider message id.
    async fn send_to_single(&self, message: &PushMessage) -> Result<String, ProviderError>;

    /// Send a message to every subscriber of `topic`.
    /// Returns the provider message id.
    async fn send_to_topic(&self, topic: &str, message: &PushMessage) -> Result<String, ProviderError>;

    /// Send one message to many device tokens in a single provider call.
    ///
    /// Per-recipient failures are reported inside the [`BatchOutcome`]; an
    /// `Err` means the batch as a whole could not be attempted.
    async fn send_to_batch(
        &self,
        tokens: &[String],
        message: &PushMessage,
    ) -> Result<BatchOutcome, ProviderError>;
}
