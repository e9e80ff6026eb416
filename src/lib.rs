//! Registrar - Event registration intake service
//!
//! Hexagonal Architecture:
//! - domain/: Pure business logic (multipart parsing, registration rules)
//! - ports/: Trait definitions (storage, repository, clock)
//! - adapters/: Concrete implementations and the HTTP inbound adapter
//! - application/: Submission service generic over its ports
//! - config: Environment configuration
//!
//! # Features
//! - `local`: Monolith deployment (filesystem storage, Redis)
//! - `supabase`: Supabase Storage + PostgREST
//! - `aws`: S3 + DynamoDB
//! - `full`: All features

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod ports;
pub mod telemetry;

// Re-exports for convenience
pub use application::registration::{RegistrationService, SubmissionReceipt};
pub use config::HttpConfig;
pub use error::{ConfigError, SubmitError};

#[cfg(feature = "aws")]
pub use config::AwsConfig;

#[cfg(feature = "local")]
pub use config::LocalConfig;

#[cfg(feature = "supabase")]
pub use config::SupabaseConfig;
