//! OAuth2 access tokens for the FCM API.
//!
//! A signed JWT assertion (RS256, service-account key) is exchanged at the
//! key's `token_uri`. Tokens are cached and refreshed shortly before expiry.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::notification::ProviderError;

use super::credentials::ServiceAccountKey;
use super::FirebaseSetupError;

pub const FCM_SCOPE: &str = "https://www.googleapis.com/auth/firebase.messaging";

const GRANT_TYPE: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";

/// Lifetime requested for each assertion
const ASSERTION_LIFETIME_SECS: i64 = 3600;

/// Refresh this long before the token expires
const REFRESH_MARGIN_SECS: i64 = 60;

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct AssertionClaims {
    pub iss: String,
    pub scope: String,
    pub aud: String,
    pub iat: i64,
    pub exp: i64,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: i64,
}

#[derive(Debug, Clone)]
struct CachedToken {
    value: String,
    expires_at: DateTime<Utc>,
}

impl CachedToken {
    fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        now + Duration::seconds(REFRESH_MARGIN_SECS) < self.expires_at
    }
}

/// Mints and caches access tokens for one service account
pub struct TokenSource {
    http: reqwest::Client,
    client_email: String,
    private_key_id: String,
    token_uri: String,
    encoding_key: EncodingKey,
    cached: RwLock<Option<CachedToken>>,
}

impl TokenSource {
    pub fn new(http: reqwest::Client, key: &ServiceAccountKey) -> Result<Self, FirebaseSetupError> {
        let encoding_key = EncodingKey::from_rsa_pem(key.private_key.as_bytes())?;

        Ok(Self {
            http,
            client_email: key.client_email.clone(),
            private_key_id: key.private_key_id.clone(),
            token_uri: key.token_uri.clone(),
            encoding_key,
            cached: RwLock::new(None),
        })
    }

    /// Return a valid access token, fetching a new one when needed
    pub async fn access_token(&self) -> Result<String, ProviderError> {
        let now = Utc::now();

        if let Some(token) = self.cached.read().await.as_ref() {
            if token.is_fresh(now) {
                return Ok(token.value.clone());
            }
        }

        let mut cached = self.cached.write().await;
        // Another task may have refreshed while we waited for the lock
        if let Some(token) = cached.as_ref() {
            if token.is_fresh(now) {
                return Ok(token.value.clone());
            }
        }

        let token = self.fetch().await?;
        let value = token.value.clone();
        *cached = Some(token);
        Ok(value)
    }

    pub(crate) fn assertion(&self, now: DateTime<Utc>) -> Result<String, ProviderError> {
        let mut header = Header::new(Algorithm::RS256);
        header.kid = Some(self.private_key_id.clone());

        let claims = AssertionClaims {
            iss: self.client_email.clone(),
            scope: FCM_SCOPE.to_string(),
            aud: self.token_uri.clone(),
            iat: now.timestamp(),
            exp: now.timestamp() + ASSERTION_LIFETIME_SECS,
        };

        jsonwebtoken::encode(&header, &claims, &self.encoding_key)
            .map_err(|e| ProviderError::Auth(format!("failed to sign assertion: {e}")))
    }

    #[tracing::instrument(name = "firebase.fetch_token", skip(self))]
    async fn fetch(&self) -> Result<CachedToken, ProviderError> {
        let now = Utc::now();
        let assertion = self.assertion(now)?;

        let response = self
            .http
            .post(&self.token_uri)
            .form(&[("grant_type", GRANT_TYPE), ("assertion", assertion.as_str())])
            .send()
            .await
            .map_err(|e| ProviderError::Auth(format!("token request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Auth(format!(
                "token endpoint returned {}: {}",
                status.as_u16(),
                body
            )));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::Auth(format!("malformed token response: {e}")))?;

        tracing::debug!(expires_in = token.expires_in, "Fetched FCM access token");

        Ok(CachedToken {
            value: token.access_token,
            expires_at: now + Duration::seconds(token.expires_in),
        })
    }
}

#[cfg(test)]
mod tests {
    use jsonwebtoken::{DecodingKey, Validation};

    use super::*;

    const PRIVATE_KEY: &str = include_str!("../../../tests/fixtures/test_private_key.pem");
    const PUBLIC_KEY: &str = include_str!("../../../tests/fixtures/test_public_key.pem");

    fn key() -> ServiceAccountKey {
        ServiceAccountKey {
            account_type: "service_account".into(),
            project_id: "demo-project".into(),
            private_key_id: "key-1".into(),
            private_key: PRIVATE_KEY.into(),
            client_email: "push@demo-project.iam.gserviceaccount.com".into(),
            client_id: "1".into(),
            auth_uri: "https://accounts.google.com/o/oauth2/auth".into(),
            token_uri: "https://oauth2.googleapis.com/token".into(),
        }
    }

    #[test]
    fn test_assertion_is_signed_for_token_uri() {
        let source = TokenSource::new(reqwest::Client::new(), &key()).unwrap();
        let assertion = source.assertion(Utc::now()).unwrap();

        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_audience(&["https://oauth2.googleapis.com/token"]);
        let decoded = jsonwebtoken::decode::<AssertionClaims>(
            &assertion,
            &DecodingKey::from_rsa_pem(PUBLIC_KEY.as_bytes()).unwrap(),
            &validation,
        )
        .unwrap();

        assert_eq!(decoded.header.kid.as_deref(), Some("key-1"));
        assert_eq!(decoded.claims.iss, "push@demo-project.iam.gserviceaccount.com");
        assert_eq!(decoded.claims.scope, FCM_SCOPE);
        assert_eq!(decoded.claims.exp - decoded.claims.iat, ASSERTION_LIFETIME_SECS);
    }

    #[test]
    fn test_invalid_private_key_is_setup_error() {
        let mut bad = key();
        bad.private_key = "not a pem".into();
        assert!(matches!(
            TokenSource::new(reqwest::Client::new(), &bad),
            Err(FirebaseSetupError::PrivateKey(_))
        ));
    }

    #[test]
    fn test_cached_token_freshness() {
        let now = Utc::now();
        let token = CachedToken {
            value: "t".into(),
            expires_at: now + Duration::seconds(REFRESH_MARGIN_SECS + 5),
        };
        assert!(token.is_fresh(now));
        assert!(!token.is_fresh(now + Duration::seconds(10)));
    }
}
