use std::sync::Arc;

use axum::Router;
use extractor::TravelExtractor;
use tower_http::cors::CorsLayer;

use crate::features::extraction;

pub fn router(extractor: Arc<TravelExtractor>) -> Router {
    Router::new()
        .merge(extraction::routes::page_routes())
        .nest("/api", extraction::routes::routes())
        .layer(CorsLayer::permissive())
        .with_state(extractor)
}
