use service_core::error::AppError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Store error: {0}")]
    Store(anyhow::Error),

    #[error("Cache error: {0}")]
    Cache(anyhow::Error),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Credential already exists for user")]
    CredentialAlreadyExists,

    #[error("Credential not found")]
    CredentialNotFound,

    #[error("Verification record not found")]
    VerificationNotFound,

    #[error("Verification code mismatch")]
    VerificationCodeMismatch,

    #[error("Verification code expired")]
    VerificationExpired,

    #[error("Verification code already used")]
    VerificationAlreadyUsed,

    #[error("Token error: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Store(e) => AppError::DatabaseError(e),
            ServiceError::Cache(e) => AppError::CacheError(e),
            ServiceError::Internal(e) => AppError::InternalError(e),
            ServiceError::Validation(e) => AppError::ValidationError(e),
            ServiceError::InvalidCredentials => {
                AppError::AuthError(anyhow::anyhow!("Invalid credentials"))
            }
            ServiceError::CredentialAlreadyExists => {
                AppError::Conflict(anyhow::anyhow!("Credential already exists for user"))
            }
            ServiceError::CredentialNotFound => {
                AppError::NotFound(anyhow::anyhow!("Credential not found"))
            }
            ServiceError::VerificationNotFound => {
                AppError::NotFound(anyhow::anyhow!("Verification record not found"))
            }
            ServiceError::VerificationCodeMismatch => {
                AppError::BadRequest(anyhow::anyhow!("Verification code mismatch"))
            }
            ServiceError::VerificationExpired => {
                AppError::BadRequest(anyhow::anyhow!("Verification code expired"))
            }
            ServiceError::VerificationAlreadyUsed => {
                AppError::BadRequest(anyhow::anyhow!("Verification code already used"))
            }
            ServiceError::Token(e) => AppError::AuthError(anyhow::Error::new(e)),
        }
    }
}
