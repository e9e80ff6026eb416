//! Redis RegistrationRepository implementation.

use super::error::RepositoryError;
use super::pool::RedisPool;
use super::{registration_key, REGISTRATION_INDEX};
use crate::domain::registration::Registration;
use crate::ports::repository::RegistrationRepository;
use async_trait::async_trait;
use deadpool_redis::redis;

/// Store the row and append its ID to the index in one atomic step.
/// Returns 1 when stored, 0 when the key was already taken.
const INSERT_SCRIPT: &str = r#"
if redis.call('SET', KEYS[1], ARGV[1], 'NX') then
  redis.call('RPUSH', KEYS[2], ARGV[2])
  return 1
end
return 0
"#;

fn insert_outcome(inserted: i64, registration_id: &str) -> Result<(), RepositoryError> {
    if inserted == 1 {
        Ok(())
    } else {
        Err(RepositoryError::AlreadyExists(registration_id.to_string()))
    }
}

#[async_trait]
impl RegistrationRepository for RedisPool {
    async fn insert_registration(
        &self,
        registration: &Registration,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let id = registration.registration_id.as_str();
        let json = serde_json::to_string(registration).map_err(RepositoryError::from)?;
        let mut conn = self.pool.get().await.map_err(RepositoryError::from)?;

        let inserted: i64 = redis::cmd("EVAL")
            .arg(INSERT_SCRIPT)
            .arg(2)
            .arg(registration_key(id))
            .arg(REGISTRATION_INDEX)
            .arg(json)
            .arg(id)
            .query_async(&mut conn)
            .await
            .map_err(RepositoryError::from)?;

        Ok(insert_outcome(inserted, id)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_outcome() {
        assert!(insert_outcome(1, "NRYLI2025-89600123").is_ok());

        let err = insert_outcome(0, "NRYLI2025-89600123").unwrap_err();
        assert!(matches!(err, RepositoryError::AlreadyExists(ref id) if id == "NRYLI2025-89600123"));
    }
}
