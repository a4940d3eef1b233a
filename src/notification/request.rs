//! Inbound push request parsing and validation.
//!
//! A request travels through two shapes:
//!
//! - [`PushRequest`]: the tolerant parse of the caller's JSON. Missing fields
//!   are represented as `None` rather than rejected.
//! - [`NotificationRequest`]: the validated, immutable value the dispatcher
//!   accepts. It can only be obtained through [`PushRequest::into_validated`].

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised when the raw input cannot be mapped onto a [`PushRequest`].
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("request body must be a JSON object")]
    NotAnObject,

    #[error("malformed request field: {0}")]
    InvalidField(#[from] serde_json::Error),
}

/// First rule a [`PushRequest`] violates, in checking order.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("title is required")]
    MissingTitle,

    #[error("body is required")]
    MissingBody,

    #[error("target_type is required")]
    MissingTargetType,

    #[error("target_type must be one of 'token', 'topic', 'tokens' (got '{0}')")]
    UnknownTargetType(String),

    #[error("target_value is required")]
    MissingTargetValue,

    #[error("target_value must be a list of tokens when target_type is 'tokens'")]
    ExpectedTokenList,

    #[error("target_value must be a string when target_type is '{0}'")]
    ExpectedScalar(TargetType),
}

/// Recipient addressing mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TargetType {
    /// One device registration token
    Single,
    /// Broadcast to every device subscribed to a topic
    Topic,
    /// Several device tokens in one provider call
    Batch,
}

impl TargetType {
    pub const ALLOWED: [&'static str; 3] = ["token", "topic", "tokens"];

    /// Wire literal accepted in `target_type`.
    pub fn as_str(&self) -> &'static str {
        match self {
            TargetType::Single => "token",
            TargetType::Topic => "topic",
            TargetType::Batch => "tokens",
        }
    }
}

impl fmt::Display for TargetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TargetType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "token" => Ok(TargetType::Single),
            "topic" => Ok(TargetType::Topic),
            "tokens" => Ok(TargetType::Batch),
            "" => Err(ValidationError::MissingTargetType),
            other => Err(ValidationError::UnknownTargetType(other.to_string())),
        }
    }
}

/// Raw `target_value` as supplied by the caller.
///
/// Anything that is neither a string nor a list of strings is kept verbatim
/// so validation can report a shape mismatch instead of a parse failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TargetValue {
    Scalar(String),
    List(Vec<String>),
    Other(serde_json::Value),
}

impl TargetValue {
    fn is_empty(&self) -> bool {
        match self {
            TargetValue::Scalar(s) => s.is_empty(),
            TargetValue::List(items) => items.is_empty(),
            TargetValue::Other(value) => value.is_null(),
        }
    }
}

fn default_target_type() -> Option<String> {
    // Older callers omit target_type entirely and expect single-token sends.
    Some(TargetType::Single.as_str().to_string())
}

/// Tolerant parse of an inbound push request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PushRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(default = "default_target_type", skip_serializing_if = "Option::is_none")]
    pub target_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_value: Option<TargetValue>,
    /// Opaque client-side routing hint (e.g. `open_url`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_data: Option<BTreeMap<String, String>>,
}

impl PushRequest {
    /// Parse a raw JSON mapping. Absent fields are kept absent.
    pub fn parse(raw: serde_json::Value) -> Result<Self, ParseError> {
        if !raw.is_object() {
            return Err(ParseError::NotAnObject);
        }
        Ok(serde_json::from_value(raw)?)
    }

    /// Check the request, returning the first violated rule.
    pub fn validate(&self) -> Option<ValidationError> {
        self.check().err()
    }

    /// Validate and convert into the immutable dispatchable form.
    pub fn into_validated(self) -> Result<NotificationRequest, ValidationError> {
        let target_type = self.check()?;

        let target = match (target_type, self.target_value) {
            (TargetType::Single, Some(TargetValue::Scalar(token))) => Target::Single(token),
            (TargetType::Topic, Some(TargetValue::Scalar(topic))) => Target::Topic(topic),
            (TargetType::Batch, Some(TargetValue::List(tokens))) => Target::Batch(tokens),
            // check() guarantees the shapes above
            (TargetType::Batch, _) => return Err(ValidationError::ExpectedTokenList),
            (other, _) => return Err(ValidationError::ExpectedScalar(other)),
        };

        Ok(NotificationRequest {
            title: self.title.unwrap_or_default(),
            body: self.body.unwrap_or_default(),
            target,
            action: self.action,
            content_url: self.content_url,
            content_type: self.content_type,
            custom_data: self.custom_data,
        })
    }

    fn check(&self) -> Result<TargetType, ValidationError> {
        if self.title.as_deref().map_or(true, str::is_empty) {
            return Err(ValidationError::MissingTitle);
        }

        if self.body.as_deref().map_or(true, str::is_empty) {
            return Err(ValidationError::MissingBody);
        }

        let target_type: TargetType = self
            .target_type
            .as_deref()
            .ok_or(ValidationError::MissingTargetType)?
            .parse()?;

        let value = match &self.target_value {
            Some(value) if !value.is_empty() => value,
            _ => return Err(ValidationError::MissingTargetValue),
        };

        match (target_type, value) {
            (TargetType::Batch, TargetValue::List(_)) => Ok(target_type),
            (TargetType::Batch, _) => Err(ValidationError::ExpectedTokenList),
            (_, TargetValue::Scalar(_)) => Ok(target_type),
            (_, _) => Err(ValidationError::ExpectedScalar(target_type)),
        }
    }
}

/// Validated recipient.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    Single(String),
    Topic(String),
    Batch(Vec<String>),
}

impl Target {
    pub fn target_type(&self) -> TargetType {
        match self {
            Target::Single(_) => TargetType::Single,
            Target::Topic(_) => TargetType::Topic,
            Target::Batch(_) => TargetType::Batch,
        }
    }
}

/// A push request that passed validation. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationRequest {
    title: String,
    body: String,
    target: Target,
    action: Option<String>,
    content_url: Option<String>,
    content_type: Option<String>,
    custom_data: Option<BTreeMap<String, String>>,
}

impl NotificationRequest {
    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn target(&self) -> &Target {
        &self.target
    }

    pub fn target_type(&self) -> TargetType {
        self.target.target_type()
    }

    pub fn action(&self) -> Option<&str> {
        self.action.as_deref()
    }

    pub fn content_url(&self) -> Option<&str> {
        self.content_url.as_deref()
    }

    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    pub fn custom_data(&self) -> Option<&BTreeMap<String, String>> {
        self.custom_data.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(value: serde_json::Value) -> PushRequest {
        PushRequest::parse(value).unwrap()
    }

    #[test]
    fn test_missing_target_type_defaults_to_token() {
        let request = parse(json!({"title": "T", "body": "B", "target_value": "abc"}));
        assert_eq!(request.target_type.as_deref(), Some("token"));
        assert!(request.validate().is_none());
    }

    #[test]
    fn test_absent_fields_are_not_rejected_at_parse_time() {
        let request = parse(json!({}));
        assert!(request.title.is_none());
        assert!(request.body.is_none());
        assert!(request.target_value.is_none());
        assert!(request.action.is_none());
        assert!(request.custom_data.is_none());
    }

    #[test]
    fn test_non_object_is_parse_error() {
        assert!(matches!(
            PushRequest::parse(json!(["title"])),
            Err(ParseError::NotAnObject)
        ));
    }

    #[test]
    fn test_wrongly_typed_field_is_parse_error() {
        let err = PushRequest::parse(json!({"title": 42})).unwrap_err();
        assert!(matches!(err, ParseError::InvalidField(_)));

        let err = PushRequest::parse(json!({"custom_data": {"k": 1}})).unwrap_err();
        assert!(matches!(err, ParseError::InvalidField(_)));
    }

    #[test]
    fn test_title_only_reports_body() {
        let request = parse(json!({"title": "T"}));
        assert_eq!(request.validate(), Some(ValidationError::MissingBody));
    }

    #[test]
    fn test_rules_report_first_violation() {
        let cases = [
            (json!({}), ValidationError::MissingTitle),
            (json!({"title": ""}), ValidationError::MissingTitle),
            (json!({"title": "T", "body": ""}), ValidationError::MissingBody),
            (
                json!({"title": "T", "body": "B", "target_type": null}),
                ValidationError::MissingTargetType,
            ),
            (
                json!({"title": "T", "body": "B", "target_type": ""}),
                ValidationError::MissingTargetType,
            ),
            (
                json!({"title": "T", "body": "B", "target_type": "bogus"}),
                ValidationError::UnknownTargetType("bogus".into()),
            ),
            (
                json!({"title": "T", "body": "B", "target_type": "topic"}),
                ValidationError::MissingTargetValue,
            ),
            (
                json!({"title": "T", "body": "B", "target_type": "tokens", "target_value": []}),
                ValidationError::MissingTargetValue,
            ),
            (
                json!({"title": "T", "body": "B", "target_value": ""}),
                ValidationError::MissingTargetValue,
            ),
        ];

        for (input, expected) in cases {
            assert_eq!(parse(input.clone()).validate(), Some(expected), "input: {input}");
        }
    }

    #[test]
    fn test_unknown_target_type_lists_allowed_values() {
        let request = parse(json!({
            "title": "T", "body": "B", "target_type": "bogus", "target_value": "x"
        }));
        let message = request.validate().unwrap().to_string();
        for allowed in TargetType::ALLOWED {
            assert!(message.contains(&format!("'{allowed}'")), "{message}");
        }
    }

    #[test]
    fn test_batch_requires_list() {
        let request = parse(json!({
            "title": "T", "body": "B", "target_type": "tokens", "target_value": "abc"
        }));
        assert_eq!(request.validate(), Some(ValidationError::ExpectedTokenList));

        let request = parse(json!({
            "title": "T", "body": "B", "target_type": "tokens", "target_value": {"a": 1}
        }));
        assert_eq!(request.validate(), Some(ValidationError::ExpectedTokenList));
    }

    #[test]
    fn test_single_and_topic_require_scalar() {
        for target_type in ["token", "topic"] {
            let request = parse(json!({
                "title": "T", "body": "B", "target_type": target_type, "target_value": ["a", "b"]
            }));
            let err = request.validate().unwrap();
            assert!(matches!(err, ValidationError::ExpectedScalar(_)));
            assert!(err.to_string().contains(target_type));
        }

        let request = parse(json!({
            "title": "T", "body": "B", "target_type": "token", "target_value": 7
        }));
        assert!(matches!(
            request.validate(),
            Some(ValidationError::ExpectedScalar(TargetType::Single))
        ));
    }

    #[test]
    fn test_into_validated_builds_target() {
        let validated = parse(json!({
            "title": "T", "body": "B", "target_type": "tokens", "target_value": ["a", "b"],
            "action": "open_url"
        }))
        .into_validated()
        .unwrap();

        assert_eq!(validated.title(), "T");
        assert_eq!(validated.target(), &Target::Batch(vec!["a".into(), "b".into()]));
        assert_eq!(validated.target_type(), TargetType::Batch);
        assert_eq!(validated.action(), Some("open_url"));
        assert_eq!(validated.content_url(), None);

        let validated = parse(json!({
            "title": "T", "body": "B", "target_type": "topic", "target_value": "news"
        }))
        .into_validated()
        .unwrap();
        assert_eq!(validated.target(), &Target::Topic("news".into()));
    }

    #[test]
    fn test_into_validated_propagates_error() {
        let err = parse(json!({"title": "T"})).into_validated().unwrap_err();
        assert_eq!(err, ValidationError::MissingBody);
    }

    #[test]
    fn test_reserialization_keeps_present_fields_only() {
        let input = json!({
            "title": "T",
            "body": "B",
            "target_type": "token",
            "target_value": "abc",
            "content_url": "https://example.com/page",
            "custom_data": {"campaign": "spring"}
        });
        let request = parse(input.clone());
        assert_eq!(serde_json::to_value(&request).unwrap(), input);

        let output = serde_json::to_value(parse(json!({"title": "T"}))).unwrap();
        assert!(output.get("action").is_none());
        assert!(output.get("body").is_none());
        assert!(output.get("custom_data").is_none());
    }
}
