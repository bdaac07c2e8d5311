use http::StatusCode;
use thiserror::Error;

/// 回應 500 時若錯誤沒有訊息，改用這個通用訊息
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal Error";

#[derive(Error, Debug)]
pub enum IntakeError {
    #[error("{message}")]
    ValidationError { field: String, message: String },

    #[error("Method Not Allowed")]
    MethodNotAllowed,

    #[error("{name} is missing")]
    MissingCredential { name: String },

    #[error("{0}")]
    ApiError(#[from] reqwest::Error),

    #[error("{message}")]
    ProviderError { status: u16, message: String },

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for {field} ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

impl IntakeError {
    pub fn validation(field: &str, message: &str) -> Self {
        Self::ValidationError {
            field: field.to_string(),
            message: message.to_string(),
        }
    }

    /// 對應到回給瀏覽器的 HTTP 狀態碼
    pub fn status_code(&self) -> StatusCode {
        match self {
            IntakeError::ValidationError { .. } => StatusCode::BAD_REQUEST,
            IntakeError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// `{"error": ...}` 裡面放的文字
    pub fn client_message(&self) -> String {
        let message = self.to_string();
        if message.trim().is_empty() {
            INTERNAL_ERROR_MESSAGE.to_string()
        } else {
            message
        }
    }
}

pub type Result<T> = std::result::Result<T, IntakeError>;
