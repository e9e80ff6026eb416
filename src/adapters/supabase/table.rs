use super::client::{ensure_success, SupabaseClient};
use crate::domain::registration::Registration;
use crate::ports::repository::RegistrationRepository;
use async_trait::async_trait;
use std::error::Error;

/// SupabaseTable implements RegistrationRepository through PostgREST.
#[derive(Clone, Debug)]
pub struct SupabaseTable {
    client: SupabaseClient,
    table: String,
}

impl SupabaseTable {
    pub fn new(client: SupabaseClient, table: impl Into<String>) -> Self {
        Self {
            client,
            table: table.into(),
        }
    }
}

#[async_trait]
impl RegistrationRepository for SupabaseTable {
    async fn insert_registration(
        &self,
        registration: &Registration,
    ) -> Result<(), Box<dyn Error + Send + Sync>> {
        let url = self.client.endpoint(["rest", "v1", self.table.as_str()])?;

        let response = self
            .client
            .post(url)
            .header("Prefer", "return=minimal")
            .json(&[registration])
            .send()
            .await?;
        ensure_success(response).await?;
        Ok(())
    }
}
