use std::sync::Arc;

use axum::{
    Json,
    extract::State,
    response::{Html, IntoResponse, Response},
};
use extractor::TravelExtractor;
use validator::Validate;

use super::dto::{ErrorResponse, ExtractRequest, ExtractResponse};
use crate::error::WebError;

const INDEX_HTML: &str = include_str!("../../../static/index.html");

pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

#[utoipa::path(
    post,
    path = "/api/extract",
    request_body = ExtractRequest,
    responses(
        (status = 200, description = "Lines extracted successfully", body = ExtractResponse),
        (status = 400, description = "Empty text", body = ErrorResponse),
        (status = 500, description = "API key not configured", body = ErrorResponse),
        (status = 502, description = "Credential rejected or extraction failed", body = ErrorResponse),
        (status = 503, description = "Model overloaded after retries", body = ErrorResponse)
    ),
    tag = "extraction"
)]
pub async fn extract(
    State(extractor): State<Arc<TravelExtractor>>,
    Json(req): Json<ExtractRequest>,
) -> Result<Response, WebError> {
    req.validate()?;

    tracing::info!("Extraction requested ({} chars)", req.text.len());
    let lines = extractor.extract(&req.text).await?;

    Ok(Json(ExtractResponse { lines }).into_response())
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is up")
    ),
    tag = "health"
)]
pub async fn health() -> Response {
    Json(serde_json::json!({ "status": "ok" })).into_response()
}
