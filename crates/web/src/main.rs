use std::sync::Arc;

use anyhow::Context;
use extractor::{ExtractorConfig, TravelExtractor};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod config;
mod error;
mod features;
mod routes;

use config::Config;

#[derive(OpenApi)]
#[openapi(
    paths(
        features::extraction::handlers::extract,
        features::extraction::handlers::health,
    ),
    components(
        schemas(
            features::extraction::dto::ExtractRequest,
            features::extraction::dto::ExtractResponse,
            features::extraction::dto::ErrorResponse,
        )
    ),
    tags(
        (name = "extraction", description = "Travel allowance extraction"),
        (name = "health", description = "Liveness check"),
    )
)]
struct ApiDoc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .init();

    tracing::info!("Starting diárias extractor");

    let config = Config::from_env().context("Failed to load server configuration")?;
    let extractor_config =
        ExtractorConfig::from_env().context("Failed to load extractor configuration")?;

    let extractor =
        TravelExtractor::gemini(extractor_config).context("Failed to create HTTP client")?;

    let settings = extractor.config();
    if settings.api_key().is_none() {
        tracing::warn!("GEMINI_API_KEY / API_KEY is not set, every extraction will fail");
    }
    tracing::info!(
        "Using model {} ({} attempts, {}ms initial backoff)",
        settings.model,
        settings.retry.max_attempts,
        settings.retry.initial_delay.as_millis()
    );

    let app = routes::router(Arc::new(extractor))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()));

    let bind_address = config.bind_address();
    tracing::info!("Starting server at http://{}", bind_address);
    tracing::info!(
        "Swagger UI available at http://{}/swagger-ui/",
        bind_address
    );

    let listener = tokio::net::TcpListener::bind(&bind_address)
        .await
        .with_context(|| format!("Failed to bind {}", bind_address))?;
    axum::serve(listener, app).await?;

    Ok(())
}
