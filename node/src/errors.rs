// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use sentinel_persistence::PersistenceError;
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    /// Source unreachable or answered with a non-success status.
    #[error("Transport error: {0}")]
    Transport(String),
    /// Fatal before any company is processed.
    #[error("Configuration error: {0}")]
    Configuration(String),
    #[error("Persistence error: {0}")]
    Persistence(PersistenceError),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Internal server error: {0}")]
    Internal(String),
}

impl EngineError {
    pub fn is_fatal(&self) -> bool {
        matches!(self, EngineError::Configuration(_))
    }
}

impl From<PersistenceError> for EngineError {
    fn from(e: PersistenceError) -> Self {
        if e.is_configuration() {
            return EngineError::Configuration(e.to_string());
        }
        match e {
            PersistenceError::UnknownCompany(id) => EngineError::NotFound(format!("company {id}")),
            PersistenceError::UnknownFilterColumn(col) => {
                EngineError::InvalidInput(format!("unknown filter column {col:?}"))
            }
            other => EngineError::Persistence(other),
        }
    }
}

impl From<reqwest::Error> for EngineError {
    fn from(e: reqwest::Error) -> Self {
        EngineError::Transport(e.to_string())
    }
}

impl From<tokio::task::JoinError> for EngineError {
    fn from(e: tokio::task::JoinError) -> Self {
        EngineError::Internal(format!("blocking task failed: {e}"))
    }
}

impl IntoResponse for EngineError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            EngineError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            EngineError::InvalidInput(msg) => (StatusCode::BAD_REQUEST, msg),
            EngineError::Transport(msg) => (StatusCode::BAD_GATEWAY, msg),
            EngineError::Configuration(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
            EngineError::Persistence(e) => {
                tracing::error!("persistence failure: {e}");
                (StatusCode::INTERNAL_SERVER_ERROR, "Storage failure".to_string())
            }
            EngineError::Internal(msg) => {
                tracing::error!("internal failure: {msg}");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
            }
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}
