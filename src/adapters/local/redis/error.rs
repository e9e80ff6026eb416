//! Errors raised by the Redis registration store.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Redis command failed: {0}")]
    Redis(#[from] deadpool_redis::redis::RedisError),
    #[error("no Redis connection available: {0}")]
    Pool(#[from] deadpool_redis::PoolError),
    #[error("could not create Redis pool: {0}")]
    CreatePool(#[from] deadpool_redis::CreatePoolError),
    #[error("could not encode registration: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Registration {0} already exists")]
    AlreadyExists(String),
}
