//! AWS Binary
//!
//! Stores payment proofs in S3 and registrations in DynamoDB.
//!
//! Environment Variables:
//! - AWS_REGION: AWS region
//! - S3_BUCKET: S3 bucket for payment proofs
//! - DYNAMODB_TABLE: DynamoDB table for registrations
//! - PUBLIC_BASE_URL: optional base URL for proof links (CDN, custom domain)

use registrar::adapters::aws::{dynamodb::DynamoAdapter, s3::S3Adapter};
use registrar::adapters::http;
use registrar::{telemetry, AwsConfig, HttpConfig, RegistrationService};
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = HttpConfig::from_env()?;
    telemetry::init(config.json_logs);

    let aws = AwsConfig::from_env()?;

    // Load AWS config
    let sdk_config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
    let region = sdk_config
        .region()
        .map(|r| r.to_string())
        .unwrap_or_else(|| "us-east-1".to_string());
    let public_base_url = aws
        .public_base_url
        .clone()
        .unwrap_or_else(|| S3Adapter::bucket_url(&aws.s3_bucket, &region));

    // Create adapters
    let storage = S3Adapter::new(
        aws_sdk_s3::Client::new(&sdk_config),
        aws.s3_bucket.clone(),
        public_base_url,
    );
    let repo = DynamoAdapter::new(
        aws_sdk_dynamodb::Client::new(&sdk_config),
        aws.dynamodb_table.clone(),
    );
    let service = Arc::new(RegistrationService::new(
        storage,
        repo,
        config.id_prefix.clone(),
    ));

    tracing::info!(
        bucket = %aws.s3_bucket,
        table = %aws.dynamodb_table,
        region = %region,
        "Using AWS backend"
    );
    http::serve(&config, http::router(&config, service)).await?;
    Ok(())
}
