//! Error types shared across the crate.

use crate::domain::multipart::MultipartError;
use crate::domain::registration::ValidationError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Missing or unusable environment configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} env var required")]
    Missing(&'static str),
    #[error("{var} has an invalid value: {value:?}")]
    Invalid { var: &'static str, value: String },
}

/// Why a submission was not accepted.
#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("Invalid form data: {0}")]
    InvalidForm(#[from] MultipartError),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("Failed to upload payment proof")]
    Upload(#[source] BoxError),
    #[error("Failed to save registration")]
    Persist(#[source] BoxError),
}

impl SubmitError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            SubmitError::InvalidForm(_) | SubmitError::Validation(_) => StatusCode::BAD_REQUEST,
            SubmitError::Upload(_) | SubmitError::Persist(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for SubmitError {
    fn into_response(self) -> Response {
        // Upload and persistence causes are logged where they happen; only
        // the fixed message goes to the client.
        (self.status_code(), Json(json!({ "error": self.to_string() }))).into_response()
    }
}
