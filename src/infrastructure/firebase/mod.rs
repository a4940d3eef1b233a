//! Firebase Cloud Messaging provider.
//!
//! [`create_provider`] builds the process-wide provider at startup. When the
//! service-account key cannot be loaded the service still starts, backed by
//! an [`UnavailableProvider`] that refuses every send.

mod auth;
mod client;
mod credentials;

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::config::FirebaseConfig;
use crate::notification::{BatchOutcome, ProviderError, PushMessage, PushProvider};

pub use auth::{TokenSource, FCM_SCOPE};
pub use client::FcmProvider;
pub use credentials::{load_service_account, KeySource, ServiceAccountKey};

/// Errors while setting up the Firebase provider
#[derive(Debug, Error)]
pub enum FirebaseSetupError {
    #[error(
        "service account key not found; set FIREBASE_SERVICE_ACCOUNT_BASE64 or FIREBASE_SERVICE_ACCOUNT_PATH"
    )]
    KeyNotFound,

    #[error("failed to decode base64 service account key: {0}")]
    KeyBase64(#[from] base64::DecodeError),

    #[error("failed to read service account key {}: {source}", .path.display())]
    KeyFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse service account key: {0}")]
    KeyJson(#[from] serde_json::Error),

    #[error("unsupported credential type '{0}', expected 'service_account'")]
    WrongKeyType(String),

    #[error("project id mismatch: {found} != {expected}")]
    ProjectMismatch { found: String, expected: String },

    #[error("invalid service account private key: {0}")]
    PrivateKey(#[from] jsonwebtoken::errors::Error),

    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
}

/// Provider used when Firebase could not be initialized
#[derive(Debug, Clone)]
pub struct UnavailableProvider {
    reason: String,
}

impl UnavailableProvider {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }

    fn refuse<T>(&self) -> Result<T, ProviderError> {
        Err(ProviderError::Unavailable(self.reason.clone()))
    }
}

#[async_trait]
impl PushProvider for UnavailableProvider {
    fn name(&self) -> &'static str {
        "unavailable"
    }

    fn is_available(&self) -> bool {
        false
    }

    async fn send_to_single(&self, _message: &PushMessage) -> Result<String, ProviderError> {
        self.refuse()
    }

    async fn send_to_topic(&self, _topic: &str, _message: &PushMessage) -> Result<String, ProviderError> {
        self.refuse()
    }

    async fn send_to_batch(
        &self,
        _tokens: &[String],
        _message: &PushMessage,
    ) -> Result<BatchOutcome, ProviderError> {
        self.refuse()
    }
}

/// Build the push provider from configuration.
///
/// Never fails: setup errors are logged and yield an [`UnavailableProvider`].
pub fn create_provider(config: &FirebaseConfig) -> Arc<dyn PushProvider> {
    match init_fcm(config) {
        Ok(provider) => {
            tracing::info!(provider = "fcm", "Firebase provider initialized");
            Arc::new(provider)
        }
        Err(e) => {
            tracing::error!(error = %e, "Firebase initialization failed, push sending disabled");
            Arc::new(UnavailableProvider::new(e.to_string()))
        }
    }
}

fn init_fcm(config: &FirebaseConfig) -> Result<FcmProvider, FirebaseSetupError> {
    let (key, source) = load_service_account(config)?;
    tracing::info!(
        source = %source,
        project_id = %key.project_id,
        client_email = %key.client_email,
        "Loaded service account key"
    );
    FcmProvider::new(key, config)
}
