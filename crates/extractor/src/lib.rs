pub mod config;
pub mod error;
pub mod extractors;
pub mod traits;

pub use config::ExtractorConfig;
pub use error::{ExtractionError, FailureKind, Result, ServiceError};
pub use extractors::{GeminiClient, PromptBuilder, RetryPolicy, TravelExtractor};
pub use traits::{GenerationRequest, GenerationService};
