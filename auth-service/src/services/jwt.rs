use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::JwtConfig;
use crate::services::ServiceError;

/// JWT service for session token generation and validation.
///
/// Tokens are HS256-signed with a shared secret, bound to a fixed
/// issuer and audience, and expire after the configured lifetime. There
/// is no revocation; the short lifetime is the mitigation.
#[derive(Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    issuer: String,
    audience: String,
    token_expiry_minutes: i64,
}

/// Claims carried by a session token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessTokenClaims {
    /// Subject (user ID)
    pub sub: String,
    /// Email, when the identity has one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Duplicate of `sub` so hosts can read the user id without walking
    /// the full claim set
    #[serde(rename = "userId")]
    pub user_id: String,
    /// Issuer
    pub iss: String,
    /// Audience
    pub aud: String,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issued at (Unix timestamp)
    pub iat: i64,
}

/// Token response returned to the host layer.
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: i64,
}

impl JwtService {
    pub fn new(config: &JwtConfig) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.secret.as_bytes()),
            issuer: config.issuer.clone(),
            audience: config.audience.clone(),
            token_expiry_minutes: config.token_expiry_minutes,
        }
    }

    /// Generate a session token for a user identity.
    pub fn generate_token(
        &self,
        user_id: Uuid,
        email: Option<&str>,
    ) -> Result<String, ServiceError> {
        let now = Utc::now();
        let exp = now + Duration::minutes(self.token_expiry_minutes);

        let claims = AccessTokenClaims {
            sub: user_id.to_string(),
            email: email.map(|e| e.to_string()),
            user_id: user_id.to_string(),
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
            exp: exp.timestamp(),
            iat: now.timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(ServiceError::Token)
    }

    /// Validate a token and extract its claims.
    ///
    /// Signature, issuer, audience, and expiry must all pass. Anything
    /// malformed or tampered yields `None`; no identity is extracted
    /// from a rejected token.
    pub fn validate_token(&self, token: &str) -> Option<AccessTokenClaims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&self.issuer]);
        validation.set_audience(&[&self.audience]);
        validation.validate_exp = true;
        // No clock leeway: the configured lifetime is exact.
        validation.leeway = 0;

        match decode::<AccessTokenClaims>(token, &self.decoding_key, &validation) {
            Ok(data) => Some(data.claims),
            Err(e) => {
                tracing::debug!("Token validation failed: {}", e);
                None
            }
        }
    }

    /// Token lifetime in seconds, for client info.
    pub fn token_expiry_seconds(&self) -> i64 {
        self.token_expiry_minutes * 60
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> JwtConfig {
        JwtConfig {
            secret: "test-secret-key-with-enough-bytes".to_string(),
            issuer: "taskboard-auth".to_string(),
            audience: "taskboard-api".to_string(),
            token_expiry_minutes: 60,
        }
    }

    #[test]
    fn test_token_generation_and_validation() {
        let service = JwtService::new(&test_config());
        let user_id = Uuid::new_v4();

        let token = service
            .generate_token(user_id, Some("user@example.com"))
            .unwrap();
        let claims = service.validate_token(&token).expect("token should be valid");

        assert_eq!(claims.sub, user_id.to_string());
        assert_eq!(claims.user_id, user_id.to_string());
        assert_eq!(claims.email.as_deref(), Some("user@example.com"));
        assert_eq!(claims.iss, "taskboard-auth");
        assert_eq!(claims.aud, "taskboard-api");
    }

    #[test]
    fn test_token_without_email() {
        let service = JwtService::new(&test_config());
        let token = service.generate_token(Uuid::new_v4(), None).unwrap();
        let claims = service.validate_token(&token).unwrap();
        assert!(claims.email.is_none());
    }

    #[test]
    fn test_expired_token_is_invalid() {
        let mut config = test_config();
        config.token_expiry_minutes = -5;
        let service = JwtService::new(&config);

        let token = service.generate_token(Uuid::new_v4(), None).unwrap();
        assert!(service.validate_token(&token).is_none());
    }

    #[test]
    fn test_tampered_signature_is_invalid() {
        let service = JwtService::new(&test_config());
        let token = service.generate_token(Uuid::new_v4(), None).unwrap();

        let mut parts: Vec<String> = token.split('.').map(|s| s.to_string()).collect();
        assert_eq!(parts.len(), 3);
        let signature = parts[2].clone();
        let flipped = if signature.starts_with('A') { "B" } else { "A" };
        parts[2] = format!("{}{}", flipped, &signature[1..]);
        let tampered = parts.join(".");

        assert!(service.validate_token(&tampered).is_none());
    }

    #[test]
    fn test_wrong_audience_is_invalid() {
        let service = JwtService::new(&test_config());
        let token = service.generate_token(Uuid::new_v4(), None).unwrap();

        let mut other = test_config();
        other.audience = "other-api".to_string();
        assert!(JwtService::new(&other).validate_token(&token).is_none());
    }

    #[test]
    fn test_wrong_secret_is_invalid() {
        let service = JwtService::new(&test_config());
        let token = service.generate_token(Uuid::new_v4(), None).unwrap();

        let mut other = test_config();
        other.secret = "a-completely-different-signing-secret".to_string();
        assert!(JwtService::new(&other).validate_token(&token).is_none());
    }

    #[test]
    fn test_garbage_token_is_invalid() {
        let service = JwtService::new(&test_config());
        assert!(service.validate_token("not-a-token").is_none());
        assert!(service.validate_token("").is_none());
    }
}
