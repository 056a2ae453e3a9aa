use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use extractor::ExtractionError;
use serde_json::json;
use std::fmt;
use validator::ValidationErrors;

/// Web layer errors
#[derive(Debug)]
pub enum WebError {
    Extraction(ExtractionError),
    Validation(ValidationErrors),
}

impl fmt::Display for WebError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Extraction(e) => write!(f, "Extraction error: {}", e),
            Self::Validation(e) => write!(f, "Validation error: {}", e),
        }
    }
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        let status_code = match &self {
            Self::Extraction(ExtractionError::Configuration) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Extraction(ExtractionError::Authentication) => StatusCode::BAD_GATEWAY,
            Self::Extraction(ExtractionError::Overloaded) => StatusCode::SERVICE_UNAVAILABLE,
            Self::Extraction(ExtractionError::Generic(_)) => StatusCode::BAD_GATEWAY,
            Self::Validation(_) => StatusCode::BAD_REQUEST,
        };

        let body = match &self {
            Self::Extraction(e) => {
                tracing::warn!("Extraction failed: {:?}", e);
                json!({
                    "error": e.to_string()
                })
            }
            Self::Validation(errors) => {
                let messages: Vec<String> = errors
                    .field_errors()
                    .values()
                    .flat_map(|errors| errors.iter())
                    .map(|e| {
                        e.message
                            .as_ref()
                            .map(|m| m.to_string())
                            .unwrap_or_else(|| e.code.to_string())
                    })
                    .collect();

                json!({
                    "error": messages.join("; ")
                })
            }
        };

        (status_code, Json(body)).into_response()
    }
}

impl From<ExtractionError> for WebError {
    fn from(error: ExtractionError) -> Self {
        Self::Extraction(error)
    }
}

impl From<ValidationErrors> for WebError {
    fn from(error: ValidationErrors) -> Self {
        Self::Validation(error)
    }
}
