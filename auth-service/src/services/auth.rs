use std::sync::Arc;

use uuid::Uuid;

use crate::models::{Credential, VerificationKind, VerificationRecord};
use crate::services::{JwtService, ServiceError, TokenResponse, VerificationService};
use crate::stores::CredentialStore;
use crate::utils::password;

/// Account flows: credential lifecycle, password login, password reset,
/// and code-based login. Wires the hasher, token service, and
/// verification engine together; user records themselves belong to the
/// user service.
#[derive(Clone)]
pub struct AuthService {
    credentials: Arc<dyn CredentialStore>,
    jwt: JwtService,
    verification: VerificationService,
}

impl AuthService {
    pub fn new(
        credentials: Arc<dyn CredentialStore>,
        jwt: JwtService,
        verification: VerificationService,
    ) -> Self {
        Self {
            credentials,
            jwt,
            verification,
        }
    }

    /// Create the password credential for a user. Rejects a second
    /// active credential for the same user.
    pub async fn create_credential(
        &self,
        user_id: Uuid,
        login: &str,
        password_input: &str,
    ) -> Result<Credential, ServiceError> {
        if login.trim().is_empty() {
            return Err(ServiceError::Validation(
                "Login must not be empty".to_string(),
            ));
        }
        if password_input.is_empty() {
            return Err(ServiceError::Validation(
                "Password must not be empty".to_string(),
            ));
        }

        if self.credentials.find_by_user_id(user_id).await?.is_some() {
            return Err(ServiceError::CredentialAlreadyExists);
        }

        let salt = password::generate_salt();
        let hash = password::hash_password(password_input, &salt)?;
        let credential = Credential::new(user_id, login.to_string(), hash, salt);

        self.credentials.insert(&credential).await?;

        tracing::info!(user_id = %user_id, "Credential created");

        Ok(credential)
    }

    /// Password login. Every failure collapses to InvalidCredentials so
    /// a caller cannot probe which logins exist.
    pub async fn login_with_password(
        &self,
        login: &str,
        password_input: &str,
    ) -> Result<TokenResponse, ServiceError> {
        let credential = self
            .credentials
            .find_by_login(login)
            .await?
            .ok_or(ServiceError::InvalidCredentials)?;

        if !password::verify_password(
            &credential.password_hash,
            password_input,
            &credential.password_salt,
        ) {
            return Err(ServiceError::InvalidCredentials);
        }

        self.issue_token(credential.user_id, Some(&credential.login))
    }

    /// Code-based login: confirm an Authentication code, then issue a
    /// session for the record's owning user.
    pub async fn login_with_verification_code(
        &self,
        verification_id: Uuid,
        code: &str,
    ) -> Result<TokenResponse, ServiceError> {
        let confirmed = self.verification.confirm(verification_id, code).await?;

        if confirmed.kind != VerificationKind::Authentication {
            return Err(ServiceError::Validation(
                "Verification code is not a login code".to_string(),
            ));
        }

        let user_id = confirmed.user_id.ok_or(ServiceError::InvalidCredentials)?;
        self.issue_token(user_id, Some(&confirmed.target))
    }

    /// Change a password, verifying the current one first. The change
    /// is logged to the credential history.
    pub async fn change_password(
        &self,
        user_id: Uuid,
        current_password: &str,
        new_password: &str,
        reason: Option<String>,
    ) -> Result<(), ServiceError> {
        let mut credential = self
            .credentials
            .find_by_user_id(user_id)
            .await?
            .ok_or(ServiceError::CredentialNotFound)?;

        if !password::verify_password(
            &credential.password_hash,
            current_password,
            &credential.password_salt,
        ) {
            return Err(ServiceError::InvalidCredentials);
        }

        self.rotate(&mut credential, new_password, user_id, reason)
            .await
    }

    /// Issue a ResetPassword verification code for a login target.
    ///
    /// A record is issued whether or not the login exists, so the
    /// response does not reveal which accounts are registered; delivery
    /// belongs to the notification service.
    pub async fn request_password_reset(
        &self,
        target: &str,
    ) -> Result<VerificationRecord, ServiceError> {
        let user_id = self
            .credentials
            .find_by_login(target)
            .await?
            .map(|c| c.user_id);

        self.verification
            .issue(target, VerificationKind::ResetPassword, user_id)
            .await
    }

    /// Redeem a ResetPassword code and rotate the credential found by
    /// the record's target.
    pub async fn confirm_password_reset(
        &self,
        verification_id: Uuid,
        code: &str,
        new_password: &str,
    ) -> Result<(), ServiceError> {
        let confirmed = self.verification.confirm(verification_id, code).await?;

        if confirmed.kind != VerificationKind::ResetPassword {
            return Err(ServiceError::Validation(
                "Verification code is not a password reset code".to_string(),
            ));
        }

        let mut credential = self
            .credentials
            .find_by_login(&confirmed.target)
            .await?
            .ok_or(ServiceError::CredentialNotFound)?;

        let actor = credential.user_id;
        self.rotate(
            &mut credential,
            new_password,
            actor,
            Some("password reset".to_string()),
        )
        .await
    }

    fn issue_token(
        &self,
        user_id: Uuid,
        email: Option<&str>,
    ) -> Result<TokenResponse, ServiceError> {
        let access_token = self.jwt.generate_token(user_id, email)?;
        Ok(TokenResponse {
            access_token,
            token_type: "Bearer".to_string(),
            expires_in: self.jwt.token_expiry_seconds(),
        })
    }

    async fn rotate(
        &self,
        credential: &mut Credential,
        new_password: &str,
        changed_by: Uuid,
        reason: Option<String>,
    ) -> Result<(), ServiceError> {
        if new_password.is_empty() {
            return Err(ServiceError::Validation(
                "Password must not be empty".to_string(),
            ));
        }

        let salt = password::generate_salt();
        let hash = password::hash_password(new_password, &salt)?;
        let history = credential.rotate_password(hash, salt, changed_by, reason);

        self.credentials.update(credential).await?;
        self.credentials.insert_history(&history).await?;

        tracing::info!(user_id = %credential.user_id, "Password changed");

        Ok(())
    }
}
