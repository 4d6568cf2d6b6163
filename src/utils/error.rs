use thiserror::Error;

/// 估價流程中所有可能的錯誤
///
/// 內部保留錯誤種類，但 `Session` 只取其訊息顯示，不依種類分流。
#[derive(Error, Debug)]
pub enum ValuationError {
    #[error("{message}")]
    Validation { message: String },

    #[error("Network request failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("The valuation service did not respond within {seconds} seconds")]
    Timeout { seconds: u64 },

    #[error("Valuation service error ({status}): {message}")]
    Upstream { status: u16, message: String },

    #[error("Could not read the valuation response: {message}")]
    Parse { message: String },

    #[error("Configuration error in '{field}': {message}")]
    Config { field: String, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for ValuationError {
    fn from(e: serde_json::Error) -> Self {
        ValuationError::Parse {
            message: e.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Network,
    Upstream,
    Parse,
    Configuration,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl ValuationError {
    pub fn validation(message: impl Into<String>) -> Self {
        ValuationError::Validation {
            message: message.into(),
        }
    }

    pub fn parse(message: impl Into<String>) -> Self {
        ValuationError::Parse {
            message: message.into(),
        }
    }

    pub fn config(field: impl Into<String>, message: impl Into<String>) -> Self {
        ValuationError::Config {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            ValuationError::Validation { .. } => ErrorCategory::Validation,
            ValuationError::Network(_) | ValuationError::Timeout { .. } => ErrorCategory::Network,
            ValuationError::Upstream { .. } => ErrorCategory::Upstream,
            ValuationError::Parse { .. } => ErrorCategory::Parse,
            ValuationError::Config { .. } => ErrorCategory::Configuration,
            ValuationError::Io(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Validation => ErrorSeverity::Medium,
            ErrorCategory::Network | ErrorCategory::Upstream | ErrorCategory::Parse => {
                ErrorSeverity::High
            }
            ErrorCategory::Configuration | ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    /// 給使用者看的訊息；空訊息時退回通用提示
    pub fn user_friendly_message(&self) -> String {
        let message = self.to_string();
        if message.trim().is_empty() {
            crate::core::session::UNEXPECTED_ERROR_MESSAGE.to_string()
        } else {
            message
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            ValuationError::Validation { .. } => "Fill in the artist's name and submit again",
            ValuationError::Network(_) => "Check your network connection and try again",
            ValuationError::Timeout { .. } => {
                "Try again, or raise service.request_timeout_secs in the config file"
            }
            ValuationError::Upstream { status: 401 | 403, .. } => {
                "Check that GEMINI_API_KEY (or service.api_key) is a valid key"
            }
            ValuationError::Upstream { status: 429, .. } => {
                "The API quota is exhausted; wait a moment before submitting again"
            }
            ValuationError::Upstream { .. } => "The valuation service failed; try again later",
            ValuationError::Parse { .. } => {
                "The model returned an unexpected reply; submitting again usually helps"
            }
            ValuationError::Config { .. } => "Fix the configuration value and run again",
            ValuationError::Io(_) => "Check that the file exists and is readable",
        }
    }
}

pub type Result<T> = std::result::Result<T, ValuationError>;
