//! Services layer for the auth core.
//!
//! Business logic for tokens, verification codes, permission
//! resolution, and account flows. Stores are injected as trait objects.

mod auth;
pub mod error;
mod jwt;
mod permissions;
mod verification;

pub use auth::AuthService;
pub use error::ServiceError;
pub use jwt::{AccessTokenClaims, JwtService, TokenResponse};
pub use permissions::PermissionService;
pub use verification::{ConfirmedVerification, VerificationService};
