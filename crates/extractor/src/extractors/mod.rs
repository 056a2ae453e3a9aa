pub mod gemini_client;
pub mod prompts;
pub mod retry;
pub mod travel_extractor;

pub use gemini_client::GeminiClient;
pub use prompts::PromptBuilder;
pub use retry::{RetryPolicy, RetryState};
pub use travel_extractor::TravelExtractor;
