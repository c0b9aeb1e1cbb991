use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// Domain errors surfaced by the handlers. Every variant maps to a client
/// error status — nothing here is ever fatal to the process.
#[derive(Debug, Error, PartialEq)]
pub enum AppError {
    #[error("no such short link")]
    NotFound,

    #[error("you need to be logged in to do that")]
    Unauthorized,

    #[error("that link belongs to another user")]
    Forbidden,

    #[error("{0}")]
    InvalidInput(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match self {
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::InvalidInput(_) => StatusCode::BAD_REQUEST,
        };
        (status, self.to_string()).into_response()
    }
}
