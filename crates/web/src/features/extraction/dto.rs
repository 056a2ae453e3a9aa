use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

pub const EMPTY_TEXT_MESSAGE: &str = "Por favor, cole algum texto para extração.";

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct ExtractRequest {
    /// Raw administrative text describing one or more trips
    #[validate(custom(function = "validate_not_blank"))]
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ExtractResponse {
    /// One formatted line per trip, in the order returned by the model
    pub lines: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

fn validate_not_blank(text: &str) -> Result<(), validator::ValidationError> {
    if text.trim().is_empty() {
        let mut error = validator::ValidationError::new("blank");
        error.message = Some(EMPTY_TEXT_MESSAGE.into());
        Err(error)
    } else {
        Ok(())
    }
}
