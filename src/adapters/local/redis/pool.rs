use super::error::RepositoryError;
use deadpool_redis::{Config, Pool, Runtime};

/// Pooled Redis connections backing the local registration table.
#[derive(Clone)]
pub struct RedisPool {
    pub(super) pool: Pool,
}

impl RedisPool {
    /// Connections are opened lazily, so an unreachable server only surfaces
    /// on the first insert.
    pub fn new(redis_url: &str) -> Result<Self, RepositoryError> {
        let pool = Config::from_url(redis_url).create_pool(Some(Runtime::Tokio1))?;
        Ok(Self { pool })
    }
}
