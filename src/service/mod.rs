pub mod fallback;
pub mod model_client;
pub mod retry_hint;
