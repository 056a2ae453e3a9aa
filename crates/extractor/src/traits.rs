use serde_json::Value;

use crate::error::ServiceError;

/// Everything one generation attempt needs besides the credential.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub text: String,
    pub system_instruction: String,
    pub temperature: f32,
    pub response_schema: Value,
}

/// A hosted model able to answer one structured-output request.
///
/// Implementations return the raw text produced by the model for a single
/// attempt; retrying is the caller's business.
#[async_trait::async_trait]
pub trait GenerationService: Send + Sync {
    async fn generate(
        &self,
        api_key: &str,
        request: &GenerationRequest,
    ) -> Result<String, ServiceError>;
}
