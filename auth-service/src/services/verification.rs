use std::sync::Arc;

use chrono::{Duration, Utc};
use rand::Rng;
use uuid::Uuid;

use crate::models::{VerificationKind, VerificationRecord};
use crate::services::ServiceError;
use crate::stores::VerificationStore;

/// Number of digits in a generated verification code.
const CODE_LENGTH: usize = 6;

/// What a successful confirmation hands to the calling flow. Issuing a
/// session, activating a user, or rotating a password is the caller's
/// job; the engine only proves the code.
#[derive(Debug, Clone)]
pub struct ConfirmedVerification {
    pub verification_id: Uuid,
    pub user_id: Option<Uuid>,
    pub target: String,
    pub kind: VerificationKind,
}

/// Issues and confirms time-boxed, single-use verification codes.
#[derive(Clone)]
pub struct VerificationService {
    store: Arc<dyn VerificationStore>,
    code_expiry_minutes: i64,
}

impl VerificationService {
    pub fn new(store: Arc<dyn VerificationStore>, code_expiry_minutes: i64) -> Self {
        Self {
            store,
            code_expiry_minutes,
        }
    }

    /// Issue a new code for a target.
    ///
    /// Always inserts a fresh record. Prior unexpired codes for the same
    /// target and kind stay valid; superseding them is the caller's
    /// concern. Delivery belongs to the notification service.
    pub async fn issue(
        &self,
        target: &str,
        kind: VerificationKind,
        user_id: Option<Uuid>,
    ) -> Result<VerificationRecord, ServiceError> {
        if target.trim().is_empty() {
            return Err(ServiceError::Validation(
                "Verification target must not be empty".to_string(),
            ));
        }

        let record = VerificationRecord::new(
            user_id,
            target.to_string(),
            kind,
            generate_code(CODE_LENGTH),
            Utc::now() + Duration::minutes(self.code_expiry_minutes),
        );

        self.store.insert(&record).await?;

        tracing::info!(
            verification_id = %record.verification_id,
            kind = kind.as_str(),
            "Verification code issued"
        );

        Ok(record)
    }

    /// Confirm a code against its record.
    ///
    /// Checks run in order and stop at the first failure: existence,
    /// code equality (case-sensitive exact match), expiry, used flag.
    /// Each failure is a distinct error so callers can report it.
    pub async fn confirm(
        &self,
        verification_id: Uuid,
        code: &str,
    ) -> Result<ConfirmedVerification, ServiceError> {
        let record = self
            .store
            .find_by_id(verification_id)
            .await?
            .ok_or(ServiceError::VerificationNotFound)?;

        if record.code != code {
            return Err(ServiceError::VerificationCodeMismatch);
        }

        if record.is_expired() {
            return Err(ServiceError::VerificationExpired);
        }

        if record.is_used {
            return Err(ServiceError::VerificationAlreadyUsed);
        }

        // The flip is a compare-and-set in the store; losing a
        // concurrent race is the same as finding the flag already set.
        if !self.store.mark_used(verification_id, Utc::now()).await? {
            return Err(ServiceError::VerificationAlreadyUsed);
        }

        tracing::info!(
            verification_id = %verification_id,
            kind = record.kind.as_str(),
            "Verification code confirmed"
        );

        Ok(ConfirmedVerification {
            verification_id,
            user_id: record.user_id,
            target: record.target,
            kind: record.kind,
        })
    }
}

/// Generate a random numeric code.
fn generate_code(length: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..length)
        .map(|_| rng.gen_range(0..10).to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_code_is_numeric() {
        let code = generate_code(CODE_LENGTH);
        assert_eq!(code.len(), CODE_LENGTH);
        assert!(code.chars().all(|c| c.is_ascii_digit()));
    }
}
