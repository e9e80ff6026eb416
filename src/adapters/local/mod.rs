//! Local adapters for monolith deployment.

pub mod fs;
pub mod redis;

pub use fs::FsAdapter;
pub use redis::{RedisPool, RepositoryError};
