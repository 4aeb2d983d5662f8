use std::env;

use service_core::config::{get_env, Environment};
use service_core::error::AppError;

/// Immutable service configuration, built once at process start.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub environment: Environment,
    pub service_name: String,
    pub log_level: String,
    pub jwt: JwtConfig,
    pub identity: IdentityConfig,
    pub verification: VerificationConfig,
    pub cache: CacheConfig,
}

#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub token_expiry_minutes: i64,
}

/// Shared secret for the third-party login widget.
#[derive(Debug, Clone)]
pub struct IdentityConfig {
    pub widget_secret: String,
}

#[derive(Debug, Clone)]
pub struct VerificationConfig {
    pub code_expiry_minutes: i64,
}

#[derive(Debug, Clone)]
pub struct CacheConfig {
    pub redis_url: String,
    pub permission_ttl_seconds: u64,
}

impl AuthConfig {
    pub fn from_env() -> Result<Self, AppError> {
        let env_str = env::var("ENVIRONMENT").unwrap_or_else(|_| "dev".to_string());
        let environment: Environment = env_str
            .parse()
            .map_err(|e: String| AppError::ConfigError(anyhow::anyhow!(e)))?;

        let is_prod = environment == Environment::Prod;

        let config = AuthConfig {
            environment,
            service_name: get_env("SERVICE_NAME", Some("auth-service"), is_prod)?,
            log_level: get_env("LOG_LEVEL", Some("info"), is_prod)?,
            jwt: JwtConfig {
                secret: get_env("JWT_SECRET", Some("dev-secret-do-not-use-in-prod"), is_prod)?,
                issuer: get_env("JWT_ISSUER", Some("taskboard-auth"), is_prod)?,
                audience: get_env("JWT_AUDIENCE", Some("taskboard-api"), is_prod)?,
                token_expiry_minutes: get_env("JWT_TOKEN_EXPIRY_MINUTES", Some("60"), is_prod)?
                    .parse()
                    .map_err(|e: std::num::ParseIntError| {
                        AppError::ConfigError(anyhow::anyhow!(e.to_string()))
                    })?,
            },
            identity: IdentityConfig {
                widget_secret: get_env("IDENTITY_WIDGET_SECRET", Some(""), is_prod)?,
            },
            verification: VerificationConfig {
                code_expiry_minutes: get_env(
                    "VERIFICATION_CODE_EXPIRY_MINUTES",
                    Some("15"),
                    is_prod,
                )?
                .parse()
                .map_err(|e: std::num::ParseIntError| {
                    AppError::ConfigError(anyhow::anyhow!(e.to_string()))
                })?,
            },
            cache: CacheConfig {
                redis_url: get_env("REDIS_URL", Some("redis://127.0.0.1:6379"), is_prod)?,
                permission_ttl_seconds: get_env(
                    "PERMISSION_CACHE_TTL_SECONDS",
                    Some("300"),
                    is_prod,
                )?
                .parse()
                .map_err(|e: std::num::ParseIntError| {
                    AppError::ConfigError(anyhow::anyhow!(e.to_string()))
                })?,
            },
        };

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), AppError> {
        if self.jwt.token_expiry_minutes <= 0 {
            return Err(AppError::ConfigError(anyhow::anyhow!(
                "JWT_TOKEN_EXPIRY_MINUTES must be positive"
            )));
        }

        if self.verification.code_expiry_minutes <= 0 {
            return Err(AppError::ConfigError(anyhow::anyhow!(
                "VERIFICATION_CODE_EXPIRY_MINUTES must be positive"
            )));
        }

        if self.cache.permission_ttl_seconds == 0 {
            return Err(AppError::ConfigError(anyhow::anyhow!(
                "PERMISSION_CACHE_TTL_SECONDS must be positive"
            )));
        }

        if self.environment == Environment::Prod && self.jwt.secret.len() < 32 {
            return Err(AppError::ConfigError(anyhow::anyhow!(
                "JWT_SECRET must be at least 32 bytes in production"
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dev_config() -> AuthConfig {
        AuthConfig {
            environment: Environment::Dev,
            service_name: "auth-service".to_string(),
            log_level: "info".to_string(),
            jwt: JwtConfig {
                secret: "dev-secret".to_string(),
                issuer: "taskboard-auth".to_string(),
                audience: "taskboard-api".to_string(),
                token_expiry_minutes: 60,
            },
            identity: IdentityConfig {
                widget_secret: String::new(),
            },
            verification: VerificationConfig {
                code_expiry_minutes: 15,
            },
            cache: CacheConfig {
                redis_url: "redis://127.0.0.1:6379".to_string(),
                permission_ttl_seconds: 300,
            },
        }
    }

    #[test]
    fn test_valid_dev_config_passes_validation() {
        assert!(dev_config().validate().is_ok());
    }

    #[test]
    fn test_non_positive_token_expiry_is_rejected() {
        let mut config = dev_config();
        config.jwt.token_expiry_minutes = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_non_positive_code_expiry_is_rejected() {
        let mut config = dev_config();
        config.verification.code_expiry_minutes = -1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_cache_ttl_is_rejected() {
        let mut config = dev_config();
        config.cache.permission_ttl_seconds = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_prod_requires_a_real_secret() {
        let mut config = dev_config();
        config.environment = Environment::Prod;
        assert!(config.validate().is_err());

        config.jwt.secret = "a-secret-that-is-long-enough-for-prod".to_string();
        assert!(config.validate().is_ok());
    }
}
