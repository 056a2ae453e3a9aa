use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use extractor::TravelExtractor;

use super::handlers::{extract, health, index};

pub fn routes() -> Router<Arc<TravelExtractor>> {
    Router::new().route("/extract", post(extract))
}

pub fn page_routes() -> Router<Arc<TravelExtractor>> {
    Router::new()
        .route("/", get(index))
        .route("/health", get(health))
}
