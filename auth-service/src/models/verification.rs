//! Verification record model - time-boxed, single-use codes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Flow a verification code belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerificationKind {
    Authentication,
    Registration,
    ResetPassword,
}

impl VerificationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            VerificationKind::Authentication => "authentication",
            VerificationKind::Registration => "registration",
            VerificationKind::ResetPassword => "reset_password",
        }
    }
}

/// Single-use code proving control of a target (email/phone/handle).
///
/// `user_id` is nullable: registration codes are issued before the user
/// exists.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationRecord {
    pub verification_id: Uuid,
    pub user_id: Option<Uuid>,
    pub target: String,
    pub kind: VerificationKind,
    pub code: String,
    pub expires_utc: DateTime<Utc>,
    pub is_used: bool,
    pub created_utc: DateTime<Utc>,
    pub confirmed_utc: Option<DateTime<Utc>>,
}

impl VerificationRecord {
    pub fn new(
        user_id: Option<Uuid>,
        target: String,
        kind: VerificationKind,
        code: String,
        expires_utc: DateTime<Utc>,
    ) -> Self {
        Self {
            verification_id: Uuid::new_v4(),
            user_id,
            target,
            kind,
            code,
            expires_utc,
            is_used: false,
            created_utc: Utc::now(),
            confirmed_utc: None,
        }
    }

    pub fn is_expired(&self) -> bool {
        Utc::now() > self.expires_utc
    }

    /// Pending is the only confirmable state: unconfirmed and unexpired.
    pub fn is_confirmable(&self) -> bool {
        !self.is_used && !self.is_expired()
    }
}
