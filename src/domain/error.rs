use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Serialize, Deserialize)]
pub enum AppError {
    Internal(String),
    ValidationError(String),
    DatabaseError(String),
    ConfigError(String),
    /// Upload rejected before reading content (wrong extension).
    UnsupportedFile(String),
    /// Upload bytes are not valid UTF-8.
    DecodeError(String),
    /// No line in the file looks like a tabular header.
    NoHeaderFound,
}

impl AppError {
    /// Whole-file conditions the uploader can fix by resubmitting a corrected file.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            AppError::UnsupportedFile(_)
                | AppError::DecodeError(_)
                | AppError::NoHeaderFound
                | AppError::ValidationError(_)
        )
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Internal(msg) => write!(f, "Internal error: {}", msg),
            AppError::ValidationError(msg) => write!(f, "Validation error: {}", msg),
            AppError::DatabaseError(msg) => write!(f, "Database error: {}", msg),
            AppError::ConfigError(msg) => write!(f, "Config error: {}", msg),
            AppError::UnsupportedFile(msg) => write!(f, "Unsupported file: {}", msg),
            AppError::DecodeError(msg) => write!(f, "Could not decode file: {}", msg),
            AppError::NoHeaderFound => write!(
                f,
                "Could not parse file: no header row with recognizable contact columns was found"
            ),
        }
    }
}

impl std::error::Error for AppError {}

impl From<figment::Error> for AppError {
    fn from(err: figment::Error) -> Self {
        AppError::ConfigError(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
