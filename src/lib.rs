pub mod api;
pub mod config;
pub mod dataset;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod service;
pub mod types;

pub use error::NexusError;
pub use service::fallback::FallbackPolicy;
pub use service::model_client::ModelClient;
