//! Error types for the relief backend.
//!
//! The engine returns [`EngineError`]; the HTTP layer wraps it in [`ApiError`],
//! which knows how to render itself as a JSON body with a machine-readable code.

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use common::model::need_key::NeedKeyError;
use serde::Serialize;
use thiserror::Error;

/// Failures produced by the engine and its stores.
#[derive(Debug, Error)]
pub enum EngineError {
    /// A referenced category, venue, function, response or status record does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// A category was created under a parent that does not exist
    #[error("Invalid parent: {0}")]
    InvalidParent(String),

    /// The target function cannot accept this kind of record
    #[error("Invalid target: {0}")]
    InvalidTarget(String),

    /// Malformed or incomplete input
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Reserved for uniqueness violations
    #[error("Conflict: {0}")]
    Conflict(String),

    /// The category parent graph has a cycle or a dangling parent
    #[error("Corrupt catalog: {0}")]
    CorruptCatalog(String),

    /// Backend failure (SQLite error, poisoned lock)
    #[error("Storage error: {0}")]
    Storage(String),
}

impl EngineError {
    pub fn not_found(what: &str, id: impl std::fmt::Display) -> Self {
        EngineError::NotFound(format!("{what} '{id}'"))
    }

    pub fn code(&self) -> &'static str {
        match self {
            EngineError::NotFound(_) => "NOT_FOUND",
            EngineError::InvalidParent(_) => "INVALID_PARENT",
            EngineError::InvalidTarget(_) => "INVALID_TARGET",
            EngineError::InvalidRequest(_) => "INVALID_REQUEST",
            EngineError::Conflict(_) => "CONFLICT",
            EngineError::CorruptCatalog(_) => "CORRUPT_CATALOG",
            EngineError::Storage(_) => "STORAGE_ERROR",
        }
    }
}

impl From<NeedKeyError> for EngineError {
    fn from(err: NeedKeyError) -> Self {
        EngineError::InvalidRequest(err.to_string())
    }
}

impl From<rusqlite::Error> for EngineError {
    fn from(err: rusqlite::Error) -> Self {
        EngineError::Storage(err.to_string())
    }
}

pub type EngineResult<T> = Result<T, EngineError>;

/// Errors surfaced by HTTP handlers.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Engine(#[from] EngineError),

    /// The request body or query string could not be parsed
    #[error("Invalid request: {0}")]
    Malformed(String),
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

impl ApiError {
    pub fn code(&self) -> &'static str {
        match self {
            ApiError::Engine(err) => err.code(),
            ApiError::Malformed(_) => "INVALID_REQUEST",
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Malformed(_) => StatusCode::BAD_REQUEST,
            ApiError::Engine(err) => match err {
                EngineError::NotFound(_) => StatusCode::NOT_FOUND,
                EngineError::InvalidParent(_)
                | EngineError::InvalidTarget(_)
                | EngineError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
                EngineError::Conflict(_) => StatusCode::CONFLICT,
                EngineError::CorruptCatalog(_) | EngineError::Storage(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorResponse {
            error: self.to_string(),
            code: self.code().to_string(),
        })
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
