//! Infrastructure layer modules
//!
//! - `firebase`: FCM push provider, credential loading and OAuth2 tokens

pub mod firebase;
