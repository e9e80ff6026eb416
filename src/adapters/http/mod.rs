//! HTTP inbound adapter.
//!
//! Exposes the submission endpoint with permissive CORS headers on every
//! response, plus a health probe.

mod submit;

pub use submit::SubmissionResponse;

use crate::application::registration::RegistrationService;
use crate::config::HttpConfig;
use crate::ports::{clock::Clock, repository::RegistrationRepository, storage::StoragePort};
use axum::extract::DefaultBodyLimit;
use axum::http::header::{
    ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN,
};
use axum::http::HeaderValue;
use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

pub fn router<S, R, C>(config: &HttpConfig, service: Arc<RegistrationService<S, R, C>>) -> Router
where
    S: StoragePort + 'static,
    R: RegistrationRepository + 'static,
    C: Clock + 'static,
{
    let submission = post(submit::submit::<S, R, C>)
        .options(submit::preflight)
        .fallback(submit::method_not_allowed);

    Router::new()
        .route(&config.submit_path, submission)
        .route("/health", get(health))
        .layer(DefaultBodyLimit::max(config.max_body_bytes))
        .layer(SetResponseHeaderLayer::overriding(
            ACCESS_CONTROL_ALLOW_ORIGIN,
            HeaderValue::from_static("*"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static("POST, OPTIONS"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static("Content-Type"),
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(service)
}

pub async fn serve(config: &HttpConfig, app: Router) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(config.bind_address()).await?;
    tracing::info!(
        address = %config.bind_address(),
        path = %config.submit_path,
        "Listening"
    );
    axum::serve(listener, app).await
}

async fn health() -> &'static str {
    "ok"
}
