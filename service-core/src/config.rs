use std::env;

use crate::error::AppError;

/// Deployment environment. Prod refuses to fall back to defaults for
/// required settings.
#[derive(Debug, Clone, PartialEq)]
pub enum Environment {
    Dev,
    Prod,
}

impl std::str::FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "dev" => Ok(Environment::Dev),
            "prod" => Ok(Environment::Prod),
            _ => Err(format!("Invalid environment: {}", s)),
        }
    }
}

/// Read an environment variable with an optional dev-only default.
///
/// In production every key must be set explicitly; in dev a missing key
/// falls back to `default` when one is provided.
pub fn get_env(key: &str, default: Option<&str>, is_prod: bool) -> Result<String, AppError> {
    match env::var(key) {
        Ok(val) => Ok(val),
        Err(_) => {
            if is_prod {
                Err(AppError::ConfigError(anyhow::anyhow!(format!(
                    "{} is required in production but not set",
                    key
                ))))
            } else if let Some(def) = default {
                Ok(def.to_string())
            } else {
                Err(AppError::ConfigError(anyhow::anyhow!(format!(
                    "{} is required but not set",
                    key
                ))))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_env_default_in_dev() {
        let value = get_env("SERVICE_CORE_TEST_MISSING_KEY", Some("fallback"), false).unwrap();
        assert_eq!(value, "fallback");
    }

    #[test]
    fn test_get_env_required_in_prod() {
        let result = get_env("SERVICE_CORE_TEST_MISSING_KEY", Some("fallback"), true);
        assert!(result.is_err());
    }

    #[test]
    fn test_environment_parse() {
        assert_eq!("dev".parse::<Environment>().unwrap(), Environment::Dev);
        assert_eq!("PROD".parse::<Environment>().unwrap(), Environment::Prod);
        assert!("staging".parse::<Environment>().is_err());
    }
}
