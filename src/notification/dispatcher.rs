use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Instant;

use futures::FutureExt;

use crate::metrics::DispatchMetrics;

use super::message::PushMessage;
use super::provider::{ProviderError, PushProvider};
use super::request::{NotificationRequest, Target};
use super::types::{DispatchResult, ProviderResponse};

/// Error text when the provider was never initialized
pub const PROVIDER_NOT_INITIALIZED: &str = "provider not initialized";

/// Error text when dispatch hits an unexpected fault
pub const INTERNAL_DISPATCH_ERROR: &str = "internal error during dispatch";

/// Routes validated push requests to the provider and normalizes the outcome.
///
/// Holds no per-request state; one instance serves concurrent dispatches.
pub struct PushDispatcher {
    provider: Arc<dyn PushProvider>,
}

impl PushDispatcher {
    pub fn new(provider: Arc<dyn PushProvider>) -> Self {
        Self { provider }
    }

    /// Whether the underlying provider can send
    pub fn provider_available(&self) -> bool {
        self.provider.is_available()
    }

    pub fn provider_name(&self) -> &'static str {
        self.provider.name()
    }

    /// Dispatch a validated request. Always returns a result, never an error.
    ///
    /// Exactly one provider call is made per invocation and nothing is retried.
    #[tracing::instrument(
        name = "dispatcher.dispatch",
        skip(self, request),
        fields(
            target_type = %request.target_type(),
            provider = self.provider.name()
        )
    )]
    pub async fn dispatch(&self, request: &NotificationRequest) -> DispatchResult {
        let target_type = request.target_type();

        if !self.provider.is_available() {
            tracing::warn!("Push provider not initialized, nothing sent");
            DispatchMetrics::record_unavailable(target_type);
            return DispatchResult::failure(PROVIDER_NOT_INITIALIZED);
        }

        let started = Instant::now();
        let outcome = AssertUnwindSafe(self.send(request)).catch_unwind().await;
        DispatchMetrics::observe_latency(target_type, started.elapsed());

        let result = match outcome {
            Ok(Ok(response)) => {
                match &response {
                    ProviderResponse::MessageId(id) => {
                        tracing::info!(message_id = %id, "Push dispatched");
                    }
                    ProviderResponse::Batch(batch) => {
                        DispatchMetrics::record_batch(batch.success_count, batch.failure_count);
                        tracing::info!(
                            success_count = batch.success_count,
                            failure_count = batch.failure_count,
                            "Batch push dispatched"
                        );
                    }
                }
                DispatchResult::success(response)
            }
            Ok(Err(e)) => {
                tracing::warn!(error = %e, "Push provider rejected dispatch");
                DispatchResult::failure(e.to_string())
            }
            Err(_) => {
                tracing::error!("Push dispatch panicked");
                DispatchResult::failure(INTERNAL_DISPATCH_ERROR)
            }
        };

        DispatchMetrics::record_dispatch(target_type, result.succeeded());
        result
    }

    async fn send(&self, request: &NotificationRequest) -> Result<ProviderResponse, ProviderError> {
        let message = PushMessage::from_request(request);

        match request.target() {
            Target::Single(_) => self
                .provider
                .send_to_single(&message)
                .await
                .map(ProviderResponse::MessageId),
            Target::Topic(topic) => self
                .provider
                .send_to_topic(topic, &message)
                .await
                .map(ProviderResponse::MessageId),
            Target::Batch(tokens) => self
                .provider
                .send_to_batch(tokens, &message)
                .await
                .map(ProviderResponse::Batch),
        }
    }
}
