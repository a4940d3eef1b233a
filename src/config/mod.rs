mod settings;

pub use settings::{FirebaseConfig, OtelConfig, ServerConfig, Settings};
