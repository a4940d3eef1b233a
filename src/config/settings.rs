use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::env;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub firebase: FirebaseConfig,
    #[serde(default)]
    pub otel: OtelConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Maximum accepted request body size
    #[serde(default = "default_body_limit")]
    pub body_limit_bytes: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FirebaseConfig {
    /// Expected project id; a service-account key for another project is rejected
    pub project_id: Option<String>,
    /// Base64-encoded service-account JSON (`FIREBASE_SERVICE_ACCOUNT_BASE64`)
    pub service_account_base64: Option<String>,
    /// Path to the service-account JSON (`FIREBASE_SERVICE_ACCOUNT_PATH`)
    pub service_account_path: Option<String>,
    /// Fallback key location checked last
    #[serde(default = "default_key_path")]
    pub default_key_path: String,
    /// FCM API base URL
    #[serde(default = "default_fcm_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
    /// Concurrent per-token requests during a batch send
    #[serde(default = "default_max_concurrent_sends")]
    pub max_concurrent_sends: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OtelConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_otel_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_service_name")]
    pub service_name: String,
    #[serde(default = "default_sampling_ratio")]
    pub sampling_ratio: f64,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_body_limit() -> usize {
    1024 * 1024 // 1 MiB
}

fn default_key_path() -> String {
    "config/service_account_key.json".to_string()
}

fn default_fcm_endpoint() -> String {
    "https://fcm.googleapis.com".to_string()
}

fn default_request_timeout() -> u64 {
    10
}

fn default_max_concurrent_sends() -> usize {
    100
}

fn default_otel_endpoint() -> String {
    "http://localhost:4317".to_string()
}

fn default_service_name() -> String {
    "push-dispatch-service".to_string()
}

fn default_sampling_ratio() -> f64 {
    1.0
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        // Load .env file if exists
        let _ = dotenvy::dotenv();

        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let builder = Config::builder()
            .set_default("server.host", default_host())?
            .set_default("server.port", i64::from(default_port()))?
            // Load config file if exists
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // SERVER__PORT, FIREBASE__PROJECT_ID, OTEL__ENABLED, ...
            .add_source(
                Environment::default()
                    .separator("__")
                    .try_parsing(true),
            )
            // Variable names used by existing deployments
            .set_override_option(
                "firebase.service_account_base64",
                env::var("FIREBASE_SERVICE_ACCOUNT_BASE64").ok(),
            )?
            .set_override_option(
                "firebase.service_account_path",
                env::var("FIREBASE_SERVICE_ACCOUNT_PATH").ok(),
            )?
            .set_override_option("firebase.project_id", env::var("FIREBASE_PROJECT_ID").ok())?
            .set_override_option("otel.enabled", env::var("OTEL_ENABLED").ok())?
            .set_override_option("otel.endpoint", env::var("OTEL_ENDPOINT").ok())?
            .set_override_option("otel.service_name", env::var("OTEL_SERVICE_NAME").ok())?
            .set_override_option("otel.sampling_ratio", env::var("OTEL_SAMPLING_RATIO").ok())?;

        builder.build()?.try_deserialize()
    }

    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            body_limit_bytes: default_body_limit(),
        }
    }
}

impl Default for FirebaseConfig {
    fn default() -> Self {
        Self {
            project_id: None,
            service_account_base64: None,
            service_account_path: None,
            default_key_path: default_key_path(),
            endpoint: default_fcm_endpoint(),
            request_timeout_secs: default_request_timeout(),
            max_concurrent_sends: default_max_concurrent_sends(),
        }
    }
}

impl Default for OtelConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            endpoint: default_otel_endpoint(),
            service_name: default_service_name(),
            sampling_ratio: default_sampling_ratio(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        let server = ServerConfig::default();
        assert_eq!(server.host, "0.0.0.0");
        assert_eq!(server.port, 5000);

        let firebase = FirebaseConfig::default();
        assert_eq!(firebase.endpoint, "https://fcm.googleapis.com");
        assert_eq!(firebase.default_key_path, "config/service_account_key.json");
        assert_eq!(firebase.max_concurrent_sends, 100);
        assert!(firebase.project_id.is_none());
    }

    #[test]
    fn test_sections_default_when_missing() {
        let settings: Settings = Config::builder()
            .set_override("server.port", 8080)
            .unwrap()
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(settings.server_addr(), "0.0.0.0:8080");
        assert_eq!(settings.firebase.request_timeout_secs, 10);
        assert!(!settings.otel.enabled);
    }
}
