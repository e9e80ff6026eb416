//! Redis adapter for local deployment.
//!
//! Provides a Redis-backed `RegistrationRepository`: each registration is
//! stored as JSON under its own key, and IDs are appended to an index list in
//! submission order.

mod error;
mod pool;
mod repository;

pub use error::RepositoryError;
pub use pool::RedisPool;

/// Redis key constants
const REGISTRATION_PREFIX: &str = "registrar:registration:";
const REGISTRATION_INDEX: &str = "registrar:registrations";

fn registration_key(registration_id: &str) -> String {
    format!("{}{}", REGISTRATION_PREFIX, registration_id)
}
