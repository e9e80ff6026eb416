use crate::domain::registration::Registration;
use async_trait::async_trait;
use std::error::Error;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RegistrationRepository: Send + Sync {
    /// Persist a new registration row
    async fn insert_registration(
        &self,
        registration: &Registration,
    ) -> Result<(), Box<dyn Error + Send + Sync>>;
}
