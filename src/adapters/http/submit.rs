use crate::application::registration::RegistrationService;
use crate::error::SubmitError;
use crate::ports::{clock::Clock, repository::RegistrationRepository, storage::StoragePort};
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{header::CONTENT_TYPE, HeaderMap, StatusCode};
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;

const SUCCESS_MESSAGE: &str = "Registration submitted successfully";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionResponse {
    pub success: bool,
    pub registration_id: String,
    pub message: String,
}

pub(super) async fn submit<S, R, C>(
    State(service): State<Arc<RegistrationService<S, R, C>>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<SubmissionResponse>, SubmitError>
where
    S: StoragePort + 'static,
    R: RegistrationRepository + 'static,
    C: Clock + 'static,
{
    let content_type = headers.get(CONTENT_TYPE).and_then(|v| v.to_str().ok());
    let receipt = service.submit(content_type, body).await?;

    Ok(Json(SubmissionResponse {
        success: true,
        registration_id: receipt.registration_id.to_string(),
        message: SUCCESS_MESSAGE.to_string(),
    }))
}

pub(super) async fn preflight() -> StatusCode {
    StatusCode::OK
}

pub(super) async fn method_not_allowed() -> (StatusCode, Json<Value>) {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(json!({ "error": "Method not allowed" })),
    )
}
