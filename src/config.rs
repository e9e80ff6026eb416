//! Configuration for different deployment environments.
//!
//! Every struct reads from the process environment (after loading `.env`)
//! through `from_env`, and from an arbitrary lookup through `from_vars`.

use crate::domain::registration::DEFAULT_ID_PREFIX;
use crate::error::ConfigError;
use std::env;

pub const DEFAULT_SUBMIT_PATH: &str = "/api/submit-registration";
pub const DEFAULT_MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

fn var_or(lookup: &impl Fn(&str) -> Option<String>, name: &str, default: &str) -> String {
    lookup(name)
        .filter(|value| !value.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn required(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &'static str,
) -> Result<String, ConfigError> {
    lookup(name)
        .filter(|value| !value.trim().is_empty())
        .ok_or(ConfigError::Missing(name))
}

fn process_env(name: &str) -> Option<String> {
    env::var(name).ok()
}

/// HTTP server settings shared by every deployment.
#[derive(Clone, Debug)]
pub struct HttpConfig {
    /// HTTP server bind address
    pub addr: String,
    /// HTTP server port
    pub port: String,
    /// Route accepting submissions
    pub submit_path: String,
    /// Largest accepted request body
    pub max_body_bytes: usize,
    /// Prefix of generated registration IDs
    pub id_prefix: String,
    /// Emit JSON log lines (`LOG_FORMAT=json`)
    pub json_logs: bool,
}

impl HttpConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        Self::from_vars(process_env)
    }

    pub fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let max_body_bytes = match lookup("MAX_BODY_BYTES") {
            Some(value) => value.trim().parse::<usize>().map_err(|_| ConfigError::Invalid {
                var: "MAX_BODY_BYTES",
                value,
            })?,
            None => DEFAULT_MAX_BODY_BYTES,
        };

        Ok(Self {
            addr: var_or(&lookup, "ADDR", "127.0.0.1"),
            port: var_or(&lookup, "PORT", "3000"),
            submit_path: var_or(&lookup, "SUBMIT_PATH", DEFAULT_SUBMIT_PATH),
            max_body_bytes,
            id_prefix: var_or(&lookup, "REGISTRATION_ID_PREFIX", DEFAULT_ID_PREFIX),
            json_logs: var_or(&lookup, "LOG_FORMAT", "text").eq_ignore_ascii_case("json"),
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.addr, self.port)
    }
}

/// Configuration for the Supabase deployment.
#[cfg(feature = "supabase")]
#[derive(Clone, Debug)]
pub struct SupabaseConfig {
    /// Project URL, e.g. `https://xyz.supabase.co`
    pub url: String,
    /// Anon (or service) API key
    pub api_key: String,
    /// Storage bucket for payment proofs
    pub bucket: String,
    /// Table receiving registrations
    pub table: String,
}

#[cfg(feature = "supabase")]
impl SupabaseConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        Self::from_vars(process_env)
    }

    pub fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        Ok(Self {
            url: required(&lookup, "SUPABASE_URL")?
                .trim_end_matches('/')
                .to_string(),
            api_key: required(&lookup, "SUPABASE_ANON_KEY")?,
            bucket: var_or(&lookup, "SUPABASE_BUCKET", "registration-files"),
            table: var_or(&lookup, "SUPABASE_TABLE", "registrations"),
        })
    }
}

/// Configuration for AWS deployment.
#[cfg(feature = "aws")]
#[derive(Clone, Debug)]
pub struct AwsConfig {
    /// S3 bucket for payment proofs
    pub s3_bucket: String,
    /// DynamoDB table name for registrations
    pub dynamodb_table: String,
    /// Base URL objects are served from; defaults to the bucket endpoint
    pub public_base_url: Option<String>,
}

#[cfg(feature = "aws")]
impl AwsConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        Self::from_vars(process_env)
    }

    pub fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        Ok(Self {
            s3_bucket: required(&lookup, "S3_BUCKET")?,
            dynamodb_table: required(&lookup, "DYNAMODB_TABLE")?,
            public_base_url: lookup("PUBLIC_BASE_URL").filter(|url| !url.trim().is_empty()),
        })
    }
}

/// Configuration for local/monolith deployment.
#[cfg(feature = "local")]
#[derive(Clone, Debug)]
pub struct LocalConfig {
    /// Redis connection URL
    pub redis_url: String,
    /// Directory payment proofs are written under
    pub upload_dir: String,
    /// Base URL the upload directory is served from
    pub public_base_url: String,
}

#[cfg(feature = "local")]
impl LocalConfig {
    pub fn from_env() -> Self {
        dotenv::dotenv().ok();
        Self::from_vars(process_env)
    }

    pub fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            redis_url: var_or(&lookup, "REDIS_URL", "redis://127.0.0.1/"),
            upload_dir: var_or(&lookup, "UPLOAD_DIR", "./uploads"),
            public_base_url: var_or(&lookup, "PUBLIC_BASE_URL", "http://127.0.0.1:3000/files"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| map.get(name).cloned()
    }

    #[test]
    fn test_http_defaults() {
        let config = HttpConfig::from_vars(vars(&[])).unwrap();
        assert_eq!(config.bind_address(), "127.0.0.1:3000");
        assert_eq!(config.submit_path, "/api/submit-registration");
        assert_eq!(config.max_body_bytes, 10 * 1024 * 1024);
        assert_eq!(config.id_prefix, "NRYLI2025");
        assert!(!config.json_logs);
    }

    #[test]
    fn test_http_overrides() {
        let config = HttpConfig::from_vars(vars(&[
            ("ADDR", "0.0.0.0"),
            ("PORT", "8080"),
            ("MAX_BODY_BYTES", "1048576"),
            ("REGISTRATION_ID_PREFIX", "SUMMIT2026"),
            ("LOG_FORMAT", "JSON"),
        ]))
        .unwrap();
        assert_eq!(config.bind_address(), "0.0.0.0:8080");
        assert_eq!(config.max_body_bytes, 1_048_576);
        assert_eq!(config.id_prefix, "SUMMIT2026");
        assert!(config.json_logs);
    }

    #[test]
    fn test_http_invalid_body_limit() {
        let err = HttpConfig::from_vars(vars(&[("MAX_BODY_BYTES", "ten megs")])).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                var: "MAX_BODY_BYTES",
                ..
            }
        ));
    }

    #[cfg(feature = "supabase")]
    #[test]
    fn test_supabase_requires_credentials() {
        let err = SupabaseConfig::from_vars(vars(&[("SUPABASE_URL", "https://x.supabase.co")]))
            .unwrap_err();
        assert_eq!(err.to_string(), "SUPABASE_ANON_KEY env var required");

        let config = SupabaseConfig::from_vars(vars(&[
            ("SUPABASE_URL", "https://x.supabase.co/"),
            ("SUPABASE_ANON_KEY", "anon"),
        ]))
        .unwrap();
        assert_eq!(config.url, "https://x.supabase.co");
        assert_eq!(config.bucket, "registration-files");
        assert_eq!(config.table, "registrations");
    }

    #[cfg(feature = "aws")]
    #[test]
    fn test_aws_requires_bucket_and_table() {
        let err = AwsConfig::from_vars(vars(&[("DYNAMODB_TABLE", "registrations")])).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("S3_BUCKET")));
    }

    #[cfg(feature = "local")]
    #[test]
    fn test_local_defaults() {
        let config = LocalConfig::from_vars(vars(&[("UPLOAD_DIR", "/srv/registrar")]));
        assert_eq!(config.redis_url, "redis://127.0.0.1/");
        assert_eq!(config.upload_dir, "/srv/registrar");
        assert_eq!(config.public_base_url, "http://127.0.0.1:3000/files");
    }
}
