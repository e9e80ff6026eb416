//! Monolith Binary - Local deployment
//!
//! Wires up:
//! - Filesystem storage for payment proofs, served back under `/files`
//! - Redis for registration records
//! - HTTP submission endpoint

use registrar::adapters::http;
use registrar::adapters::local::{FsAdapter, RedisPool};
use registrar::{telemetry, HttpConfig, LocalConfig, RegistrationService};
use std::sync::Arc;
use tower_http::services::ServeDir;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = HttpConfig::from_env()?;
    let local = LocalConfig::from_env();

    telemetry::init(config.json_logs);

    // 1. Adapters (Local implementations)
    tokio::fs::create_dir_all(&local.upload_dir).await?;
    let storage = FsAdapter::new(&local.upload_dir, &local.public_base_url);
    let repo = RedisPool::new(&local.redis_url)?;

    // 2. Application Service
    let service = Arc::new(RegistrationService::new(
        storage,
        repo,
        config.id_prefix.clone(),
    ));

    // 3. HTTP Layer
    let app = http::router(&config, service).nest_service("/files", ServeDir::new(&local.upload_dir));

    tracing::info!(
        upload_dir = %local.upload_dir,
        redis_url = %local.redis_url,
        "Starting monolith"
    );
    http::serve(&config, app).await?;
    Ok(())
}
