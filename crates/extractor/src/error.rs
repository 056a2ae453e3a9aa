use thiserror::Error;

pub type Result<T> = std::result::Result<T, ExtractionError>;

pub const GENERIC_FAILURE_MESSAGE: &str = "Falha ao processar o texto.";

/// Errors surfaced to callers of [`crate::TravelExtractor::extract`].
///
/// The `Display` text is meant to be shown to the user verbatim.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractionError {
    #[error(
        "API_KEY não encontrada. Defina a variável de ambiente GEMINI_API_KEY (ou API_KEY) e reinicie o serviço."
    )]
    Configuration,

    #[error("A chave de API foi rejeitada pelo serviço do Google. Verifique a API_KEY configurada.")]
    Authentication,

    #[error(
        "O servidor do Google está muito ocupado no momento. Por favor, aguarde um minuto e tente novamente."
    )]
    Overloaded,

    #[error("{0}")]
    Generic(String),
}

impl ExtractionError {
    /// Builds a [`ExtractionError::Generic`], falling back to the default
    /// message when `message` is blank.
    pub fn generic(message: impl Into<String>) -> Self {
        let message = message.into();
        if message.trim().is_empty() {
            Self::Generic(GENERIC_FAILURE_MESSAGE.to_string())
        } else {
            Self::Generic(message)
        }
    }
}

/// How a failed attempt against the generation service should be handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Transient,
    Authentication,
    Other,
}

/// Failure of a single call to the generation service.
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Gemini API error ({http_status}): {message}")]
    Api {
        http_status: u16,
        status: Option<String>,
        reason: Option<String>,
        message: String,
    },

    #[error("Falha na comunicação com o serviço: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("O modelo não retornou conteúdo{}", reason_suffix(.0))]
    EmptyResponse(Option<String>),
}

impl ServiceError {
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::Api {
                http_status,
                status,
                reason,
                message,
            } => {
                let status = status.as_deref().unwrap_or_default();
                let reason = reason.as_deref().unwrap_or_default();

                if matches!(*http_status, 429 | 503)
                    || matches!(status, "RESOURCE_EXHAUSTED" | "UNAVAILABLE")
                    || message.to_lowercase().contains("overloaded")
                {
                    FailureKind::Transient
                } else if matches!(*http_status, 401 | 403)
                    || matches!(status, "UNAUTHENTICATED" | "PERMISSION_DENIED")
                    || reason == "API_KEY_INVALID"
                {
                    FailureKind::Authentication
                } else {
                    FailureKind::Other
                }
            }
            Self::Transport(_) | Self::EmptyResponse(_) => FailureKind::Other,
        }
    }

    pub fn is_transient(&self) -> bool {
        self.kind() == FailureKind::Transient
    }
}

fn reason_suffix(reason: &Option<String>) -> String {
    reason
        .as_deref()
        .map(|r| format!(" ({r})"))
        .unwrap_or_default()
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{name} must be a number, got {value:?}")]
    InvalidNumber { name: &'static str, value: String },

    #[error("{name} must be at least 1")]
    Zero { name: &'static str },
}
