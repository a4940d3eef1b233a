// Infrastructure layer (provider implementations)
pub mod infrastructure;

// Domain layer (request model and dispatch)
pub mod notification;

// Application layer
pub mod api;
pub mod server;

// Supporting modules
pub mod config;
pub mod error;
pub mod metrics;
pub mod telemetry;
