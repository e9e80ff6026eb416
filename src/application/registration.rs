use crate::domain::multipart;
use crate::domain::registration::{PaymentProof, RegistrationDraft, RegistrationId};
use crate::error::SubmitError;
use crate::ports::clock::{Clock, SystemClock};
use crate::ports::repository::RegistrationRepository;
use crate::ports::storage::StoragePort;
use bytes::Bytes;

/// Outcome of an accepted submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionReceipt {
    pub registration_id: RegistrationId,
}

pub struct RegistrationService<S, R, C = SystemClock> {
    storage: S,
    repo: R,
    clock: C,
    id_prefix: String,
}

impl<S, R> RegistrationService<S, R, SystemClock>
where
    S: StoragePort,
    R: RegistrationRepository,
{
    pub fn new(storage: S, repo: R, id_prefix: impl Into<String>) -> Self {
        Self::with_clock(storage, repo, SystemClock, id_prefix)
    }
}

impl<S, R, C> RegistrationService<S, R, C>
where
    S: StoragePort,
    R: RegistrationRepository,
    C: Clock,
{
    pub fn with_clock(storage: S, repo: R, clock: C, id_prefix: impl Into<String>) -> Self {
        Self {
            storage,
            repo,
            clock,
            id_prefix: id_prefix.into(),
        }
    }

    /// Parse, validate and store one submission.
    ///
    /// Everything the client sent is validated before any I/O, so a rejected
    /// submission never leaves an object behind in storage.
    pub async fn submit(
        &self,
        content_type: Option<&str>,
        body: Bytes,
    ) -> Result<SubmissionReceipt, SubmitError> {
        // 1. Parse body
        let boundary = multipart::boundary_from_content_type(content_type.unwrap_or_default())?;
        let form = multipart::parse(&body, &boundary)?;

        // 2. Validate
        let now = self.clock.now_millis();
        let registration_id = RegistrationId::from_millis(&self.id_prefix, now);
        let payment_proof = PaymentProof::from_form(&form, &registration_id, now)?;
        let draft = RegistrationDraft::from_form(&form)?;

        // 3. Store payment proof
        let payment_proof_url = match payment_proof {
            Some(proof) => Some(self.store_payment_proof(&registration_id, proof).await?),
            None => None,
        };

        // 4. Persist record
        let registration = draft.into_registration(registration_id.clone(), payment_proof_url);
        if let Err(e) = self.repo.insert_registration(&registration).await {
            tracing::error!(
                registration_id = %registration_id,
                error = %e,
                "Failed to save registration"
            );
            return Err(SubmitError::Persist(e));
        }

        tracing::info!(
            registration_id = %registration_id,
            has_payment_proof = registration.payment_proof_url.is_some(),
            "Registration submitted"
        );

        Ok(SubmissionReceipt { registration_id })
    }

    async fn store_payment_proof(
        &self,
        registration_id: &RegistrationId,
        proof: PaymentProof,
    ) -> Result<String, SubmitError> {
        let size = proof.data.len();
        if let Err(e) = self
            .storage
            .upload(&proof.key, proof.data, &proof.content_type)
            .await
        {
            tracing::error!(
                registration_id = %registration_id,
                key = %proof.key,
                error = %e,
                "Failed to upload payment proof"
            );
            return Err(SubmitError::Upload(e));
        }
        tracing::debug!(key = %proof.key, size, "Uploaded payment proof");
        Ok(self.storage.public_url(&proof.key))
    }
}
