//! Push request model, payload construction and dispatch.
//!
//! Control flow: raw JSON → [`PushRequest::parse`] → [`PushRequest::into_validated`]
//! → [`PushDispatcher::dispatch`] → [`DispatchResult`].

mod dispatcher;
mod message;
mod provider;
mod request;
mod types;

pub use dispatcher::{PushDispatcher, INTERNAL_DISPATCH_ERROR, PROVIDER_NOT_INITIALIZED};
pub use message::{PushMessage, PushNotification, ACTION_KEY, CONTENT_TYPE_KEY, CONTENT_URL_KEY};
pub use provider::{ProviderError, PushProvider, MAX_BATCH_TOKENS};
pub use request::{
    NotificationRequest, ParseError, PushRequest, Target, TargetType, TargetValue, ValidationError,
};
pub use types::{
    BatchOutcome, DispatchResult, ProviderResponse, RecipientResult, FAILURE_MESSAGE,
    SUCCESS_MESSAGE,
};
