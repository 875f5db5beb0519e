use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Response},
};

use crate::dataset::Dataset;
use crate::router::NexusState;

fn dataset_response(dataset: &Dataset) -> Response {
    (
        [(header::CONTENT_TYPE, "application/json")],
        dataset.json_body(),
    )
        .into_response()
}

pub async fn scholarships_handler(State(state): State<NexusState>) -> Response {
    dataset_response(&state.scholarships)
}

pub async fn housing_handler(State(state): State<NexusState>) -> Response {
    dataset_response(&state.housing)
}
