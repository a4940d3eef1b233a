use std::sync::Arc;

use crate::config::Settings;
use crate::notification::{PushDispatcher, PushProvider};

#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub dispatcher: Arc<PushDispatcher>,
}

impl AppState {
    /// Build state around an already-initialized provider
    pub fn new(settings: Settings, provider: Arc<dyn PushProvider>) -> Self {
        let dispatcher = Arc::new(PushDispatcher::new(provider));

        Self {
            settings: Arc::new(settings),
            dispatcher,
        }
    }
}
