//! Outgoing push payload.
//!
//! The serialized form matches the FCM HTTP v1 `message` object, so the
//! Firebase client can post it without another mapping step.

use std::collections::BTreeMap;

use serde::Serialize;

use super::request::{NotificationRequest, Target};

/// Data keys the service fills from dedicated request fields.
pub const ACTION_KEY: &str = "action";
pub const CONTENT_URL_KEY: &str = "content_url";
pub const CONTENT_TYPE_KEY: &str = "content_type";

/// Title/body block shown by the device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PushNotification {
    pub title: String,
    pub body: String,
}

/// A provider-ready push message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PushMessage {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,
    pub notification: PushNotification,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub data: BTreeMap<String, String>,
}

impl PushMessage {
    /// Build the message for a validated request.
    ///
    /// Reserved data keys are written first; `custom_data` is merged after and
    /// overwrites them on collision. Single-token targets embed the token.
    pub fn from_request(request: &NotificationRequest) -> Self {
        let mut data = BTreeMap::new();

        if let Some(action) = request.action() {
            data.insert(ACTION_KEY.to_string(), action.to_string());
        }
        if let Some(url) = request.content_url() {
            data.insert(CONTENT_URL_KEY.to_string(), url.to_string());
        }
        if let Some(content_type) = request.content_type() {
            data.insert(CONTENT_TYPE_KEY.to_string(), content_type.to_string());
        }
        if let Some(custom) = request.custom_data() {
            data.extend(custom.iter().map(|(k, v)| (k.clone(), v.clone())));
        }

        let token = match request.target() {
            Target::Single(token) => Some(token.clone()),
            Target::Topic(_) | Target::Batch(_) => None,
        };

        Self {
            token,
            topic: None,
            notification: PushNotification {
                title: request.title().to_string(),
                body: request.body().to_string(),
            },
            data,
        }
    }

    /// Copy of this message addressed to one device token.
    pub fn with_token(&self, token: impl Into<String>) -> Self {
        Self {
            token: Some(token.into()),
            topic: None,
            ..self.clone()
        }
    }

    /// Copy of this message addressed to a topic.
    pub fn with_topic(&self, topic: impl Into<String>) -> Self {
        Self {
            token: None,
            topic: Some(topic.into()),
            ..self.clone()
        }
    }
}
