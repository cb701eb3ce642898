use thiserror::Error;

pub type AppResult<T> = Result<T, AppError>;

/// Distinguishes between retryable and permanent errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Retryable,
    Permanent,
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("forbidden")]
    Forbidden,

    #[error("not found")]
    NotFound,

    #[error("message already deleted")]
    AlreadyDeleted,

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

impl AppError {
    pub fn kind(&self) -> ErrorKind {
        if self.is_retryable() {
            ErrorKind::Retryable
        } else {
            ErrorKind::Permanent
        }
    }

    /// Returns whether the caller may retry the operation as-is.
    /// Authorization and invalid-state failures are permanent; only a
    /// transient store outage is worth resubmitting.
    pub fn is_retryable(&self) -> bool {
        matches!(self, AppError::Unavailable(_))
    }

    /// Returns HTTP status code
    pub fn status_code(&self) -> u16 {
        match self {
            AppError::BadRequest(_) => 400,
            AppError::Forbidden => 403,
            AppError::NotFound => 404,
            AppError::AlreadyDeleted => 410, // 410 Gone
            AppError::Unavailable(_) => 503,
            AppError::Config(_) => 500,
        }
    }
}
