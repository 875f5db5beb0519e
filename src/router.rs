use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::dataset::Dataset;
use crate::handlers::ask::ask_handler;
use crate::handlers::datasets::{housing_handler, scholarships_handler};
use crate::service::fallback::FallbackPolicy;
use crate::service::model_client::ModelClient;

/// Shared, read-only request state.
#[derive(Clone)]
pub struct NexusState {
    pub scholarships: Arc<Dataset>,
    pub housing: Arc<Dataset>,
    pub model: Arc<dyn ModelClient>,
    pub policy: Arc<FallbackPolicy>,
}

impl NexusState {
    pub fn new(
        scholarships: Dataset,
        housing: Dataset,
        model: Arc<dyn ModelClient>,
        policy: FallbackPolicy,
    ) -> Self {
        Self {
            scholarships: Arc::new(scholarships),
            housing: Arc::new(housing),
            model,
            policy: Arc::new(policy),
        }
    }
}

pub fn nexus_router(state: NexusState) -> Router {
    Router::new()
        .route("/scholarships", get(scholarships_handler))
        .route("/housing", get(housing_handler))
        .route("/ask", post(ask_handler))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
