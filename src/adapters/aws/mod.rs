//! AWS adapters: S3 for payment proofs, DynamoDB for registrations.

pub mod dynamodb;
pub mod s3;
