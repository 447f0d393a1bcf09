use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use uuid::Uuid;

/// Application-level errors
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    /// Nothing matched a keyword, or nothing resolved into a usable corpus
    #[error("{0}")]
    EmptyResult(String),

    /// Transport failure, timeout or malformed response from the metadata source
    #[error("Metadata source unavailable: {0}")]
    SourceUnavailable(String),

    /// Invalid API key or exhausted quota
    #[error("Metadata source rejected credentials: {0}")]
    Unauthorized(String),

    #[error("No movies available. Fetch movies first with a keyword or year.")]
    NoData,

    #[error("Session not found: {0}")]
    SessionNotFound(Uuid),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    /// Errors that must abort a corpus build instead of skipping one title
    pub fn is_fatal(&self) -> bool {
        matches!(self, AppError::Unauthorized(_))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::EmptyResult(_) | AppError::SessionNotFound(_) => StatusCode::NOT_FOUND,
            AppError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            AppError::NoData => StatusCode::CONFLICT,
            AppError::HttpClient(_) | AppError::SourceUnavailable(_) | AppError::Unauthorized(_) => {
                StatusCode::BAD_GATEWAY
            }
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_unauthorized_is_fatal() {
        assert!(AppError::Unauthorized("Invalid API key!".to_string()).is_fatal());
        assert!(!AppError::SourceUnavailable("timeout".to_string()).is_fatal());
        assert!(!AppError::EmptyResult("none".to_string()).is_fatal());
    }

    #[test]
    fn test_status_mapping() {
        let cases = [
            (AppError::EmptyResult("x".to_string()), StatusCode::NOT_FOUND),
            (AppError::NoData, StatusCode::CONFLICT),
            (AppError::SourceUnavailable("x".to_string()), StatusCode::BAD_GATEWAY),
            (AppError::Unauthorized("x".to_string()), StatusCode::BAD_GATEWAY),
            (AppError::InvalidInput("x".to_string()), StatusCode::BAD_REQUEST),
            (AppError::SessionNotFound(Uuid::nil()), StatusCode::NOT_FOUND),
        ];

        for (error, expected) in cases {
            assert_eq!(error.into_response().status(), expected);
        }
    }
}
