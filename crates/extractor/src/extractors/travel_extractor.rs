use std::sync::Arc;

use serde::Deserialize;

use crate::config::ExtractorConfig;
use crate::error::{ExtractionError, FailureKind, Result, ServiceError};
use crate::extractors::{gemini_client::GeminiClient, prompts::PromptBuilder};
use crate::traits::{GenerationRequest, GenerationService};

#[derive(Debug, Deserialize)]
struct ExtractedLines {
    #[serde(default)]
    extracted_lines: Option<Vec<String>>,
}

/// Extracts one formatted line per trip from free-form administrative text.
pub struct TravelExtractor {
    config: ExtractorConfig,
    service: Arc<dyn GenerationService>,
}

impl TravelExtractor {
    pub fn new(config: ExtractorConfig, service: Arc<dyn GenerationService>) -> Self {
        Self { config, service }
    }

    /// Builds an extractor backed by [`GeminiClient`].
    pub fn gemini(config: ExtractorConfig) -> std::result::Result<Self, ServiceError> {
        let client = GeminiClient::new(&config)?;
        Ok(Self::new(config, Arc::new(client)))
    }

    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    pub async fn extract(&self, text: &str) -> Result<Vec<String>> {
        let Some(api_key) = self.config.api_key() else {
            tracing::error!("No API key configured, refusing to call the generation service");
            return Err(ExtractionError::Configuration);
        };

        let request = GenerationRequest {
            text: text.to_string(),
            system_instruction: PromptBuilder::system_instruction(),
            temperature: self.config.temperature,
            response_schema: PromptBuilder::response_schema(),
        };

        let mut retry = self.config.retry.start();

        loop {
            tracing::debug!(
                "Extraction attempt {} of {} ({} chars)",
                retry.attempt() + 1,
                retry.max_attempts(),
                text.len()
            );

            let error = match self.service.generate(api_key, &request).await {
                Ok(output) => return parse_lines(&output),
                Err(error) => error,
            };

            match retry.record_failure(error) {
                Some(delay) => {
                    tracing::warn!(
                        "Service busy. Attempt {} of {} failed, retrying in {}ms",
                        retry.attempt(),
                        retry.max_attempts(),
                        delay.as_millis()
                    );
                    tokio::time::sleep(delay).await;
                }
                None => break,
            }
        }

        let Some(error) = retry.into_last_error() else {
            return Err(ExtractionError::generic(""));
        };

        tracing::error!("Extraction failed after retries: {}", error);

        Err(match error.kind() {
            FailureKind::Transient => ExtractionError::Overloaded,
            FailureKind::Authentication => ExtractionError::Authentication,
            FailureKind::Other => ExtractionError::generic(match error {
                ServiceError::Api { message, .. } => message,
                other => other.to_string(),
            }),
        })
    }
}

fn parse_lines(output: &str) -> Result<Vec<String>> {
    let parsed: ExtractedLines = serde_json::from_str(output).map_err(|e| {
        tracing::error!("Model returned invalid JSON: {}", e);
        ExtractionError::generic(format!("Resposta inválida do modelo: {e}"))
    })?;

    let lines = parsed.extracted_lines.unwrap_or_default();
    tracing::info!("Extraction complete: {} line(s)", lines.len());
    Ok(lines)
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::time::Duration;

    use async_trait::async_trait;
    use tokio::time::Instant;

    use super::*;

    /// Replays a fixed script of outcomes and records when each call happened.
    struct ScriptedService {
        script: Mutex<VecDeque<std::result::Result<String, ServiceError>>>,
        calls: Mutex<Vec<Instant>>,
    }

    impl ScriptedService {
        fn new(script: Vec<std::result::Result<String, ServiceError>>) -> Arc<Self> {
            Arc::new(Self {
                script: Mutex::new(script.into()),
                calls: Mutex::new(Vec::new()),
            })
        }

        fn call_times(&self) -> Vec<Instant> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl GenerationService for ScriptedService {
        async fn generate(
            &self,
            api_key: &str,
            request: &GenerationRequest,
        ) -> std::result::Result<String, ServiceError> {
            assert_eq!(api_key, "test-key");
            assert!((request.temperature - 0.1).abs() < f32::EPSILON);
            self.calls.lock().unwrap().push(Instant::now());
            self.script
                .lock()
                .unwrap()
                .pop_front()
                .expect("service called more times than scripted")
        }
    }

    /// Always answers with the same body.
    struct FixedService(&'static str);

    #[async_trait]
    impl GenerationService for FixedService {
        async fn generate(
            &self,
            _api_key: &str,
            _request: &GenerationRequest,
        ) -> std::result::Result<String, ServiceError> {
            Ok(self.0.to_string())
        }
    }

    fn overloaded() -> std::result::Result<String, ServiceError> {
        Err(ServiceError::Api {
            http_status: 503,
            status: Some("UNAVAILABLE".into()),
            reason: None,
            message: "The model is overloaded. Please try again later.".into(),
        })
    }

    fn rate_limited() -> std::result::Result<String, ServiceError> {
        Err(ServiceError::Api {
            http_status: 429,
            status: Some("RESOURCE_EXHAUSTED".into()),
            reason: None,
            message: "Resource has been exhausted (e.g. check quota).".into(),
        })
    }

    fn assert_close(actual: Duration, expected: Duration) {
        assert!(
            actual >= expected && actual < expected + Duration::from_millis(50),
            "expected ~{expected:?}, got {actual:?}"
        );
    }

    fn extractor(service: Arc<dyn GenerationService>) -> TravelExtractor {
        TravelExtractor::new(ExtractorConfig::new(Some("test-key".into())), service)
    }

    #[tokio::test]
    async fn test_missing_key_fails_before_any_call() {
        for key in [None, Some(String::new()), Some("  ".to_string())] {
            let service = ScriptedService::new(vec![]);
            let extractor = TravelExtractor::new(ExtractorConfig::new(key), service.clone());

            for text in ["", "Saí dia 20/05 às 08:00"] {
                assert_eq!(
                    extractor.extract(text).await,
                    Err(ExtractionError::Configuration)
                );
            }
            assert!(service.call_times().is_empty());
        }
    }

    #[tokio::test]
    async fn test_returns_lines_in_order() {
        let service = ScriptedService::new(vec![Ok(r#"{"extracted_lines":["a","b"]}"#.into())]);
        let lines = extractor(service.clone()).extract("texto").await.unwrap();

        assert_eq!(lines, vec!["a".to_string(), "b".to_string()]);
        assert_eq!(service.call_times().len(), 1);
    }

    #[tokio::test]
    async fn test_missing_field_yields_empty_result() {
        for body in ["{}", r#"{"extracted_lines": null}"#, r#"{"other": [1]}"#] {
            let service = ScriptedService::new(vec![Ok(body.into())]);
            assert_eq!(extractor(service).extract("texto").await, Ok(vec![]));
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_retries_overload_with_backoff_then_succeeds() {
        let service = ScriptedService::new(vec![
            overloaded(),
            rate_limited(),
            Ok(r#"{"extracted_lines":["20/05/2025, Campinas, saida: 08:00, retorno: 17:00"]}"#.into()),
        ]);

        let lines = extractor(service.clone()).extract("texto").await.unwrap();
        assert_eq!(lines.len(), 1);

        let calls = service.call_times();
        assert_eq!(calls.len(), 3);
        assert_close(calls[1] - calls[0], Duration::from_secs(1));
        assert_close(calls[2] - calls[1], Duration::from_secs(2));
    }

    #[tokio::test(start_paused = true)]
    async fn test_exhausted_retries_report_busy_service() {
        let service = ScriptedService::new(vec![overloaded(), overloaded(), overloaded()]);

        let started = Instant::now();
        let error = extractor(service.clone()).extract("texto").await.unwrap_err();

        assert_eq!(error, ExtractionError::Overloaded);
        assert!(error.to_string().contains("muito ocupado"));
        assert_eq!(service.call_times().len(), 3);
        // No sleep after the final attempt.
        assert_close(started.elapsed(), Duration::from_secs(3));
    }

    #[tokio::test(start_paused = true)]
    async fn test_exhausted_rate_limit_reports_busy_service() {
        let service = ScriptedService::new(vec![rate_limited(), rate_limited(), rate_limited()]);
        assert_eq!(
            extractor(service).extract("texto").await,
            Err(ExtractionError::Overloaded)
        );
    }

    #[tokio::test]
    async fn test_malformed_json_fails_without_retry() {
        let service = ScriptedService::new(vec![Ok("not json".into())]);
        let error = extractor(service.clone()).extract("texto").await.unwrap_err();

        assert!(matches!(error, ExtractionError::Generic(_)));
        assert!(error.to_string().starts_with("Resposta inválida do modelo"));
        assert_eq!(service.call_times().len(), 1);
    }

    #[tokio::test]
    async fn test_rejected_key_fails_without_retry() {
        let service = ScriptedService::new(vec![Err(ServiceError::Api {
            http_status: 400,
            status: Some("INVALID_ARGUMENT".into()),
            reason: Some("API_KEY_INVALID".into()),
            message: "API key not valid. Please pass a valid API key.".into(),
        })]);

        assert_eq!(
            extractor(service.clone()).extract("texto").await,
            Err(ExtractionError::Authentication)
        );
        assert_eq!(service.call_times().len(), 1);
    }

    #[tokio::test]
    async fn test_other_api_error_surfaces_message() {
        let service = ScriptedService::new(vec![Err(ServiceError::Api {
            http_status: 500,
            status: Some("INTERNAL".into()),
            reason: None,
            message: "An internal error has occurred.".into(),
        })]);

        assert_eq!(
            extractor(service.clone()).extract("texto").await,
            Err(ExtractionError::Generic(
                "An internal error has occurred.".into()
            ))
        );
        assert_eq!(service.call_times().len(), 1);
    }

    #[tokio::test]
    async fn test_blank_error_message_uses_fallback() {
        let service = ScriptedService::new(vec![Err(ServiceError::Api {
            http_status: 500,
            status: None,
            reason: None,
            message: String::new(),
        })]);

        assert_eq!(
            extractor(service).extract("texto").await,
            Err(ExtractionError::Generic(
                crate::error::GENERIC_FAILURE_MESSAGE.into()
            ))
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_non_transient_failure_after_retry_is_not_busy() {
        let service = ScriptedService::new(vec![
            overloaded(),
            Err(ServiceError::EmptyResponse(Some("SAFETY".into()))),
        ]);

        let error = extractor(service.clone()).extract("texto").await.unwrap_err();
        assert_eq!(
            error,
            ExtractionError::Generic("O modelo não retornou conteúdo (SAFETY)".into())
        );
        assert_eq!(service.call_times().len(), 2);
    }

    #[tokio::test]
    async fn test_identical_input_yields_identical_output() {
        let extractor = extractor(Arc::new(FixedService(
            r#"{"extracted_lines":["x - com solicitação de diarias","y - com solicitação de diarias"]}"#,
        )));

        let first = extractor.extract("mesmo texto").await.unwrap();
        let second = extractor.extract("mesmo texto").await.unwrap();
        assert_eq!(first, second);
        assert_eq!(first.len(), 2);
    }
}
