//! Access-control and identity verification core for the taskboard
//! platform.
//!
//! The HTTP host, relational persistence, and notification fan-out live
//! in sibling services; this crate owns permission resolution, session
//! tokens, credential hashing, login-widget signature checks, and the
//! verification-code state machine. Persistence and caching are reached
//! only through the store contracts in [`stores`].

pub mod config;
pub mod models;
pub mod services;
pub mod stores;
pub mod utils;

pub use config::AuthConfig;
pub use services::{
    AuthService, JwtService, PermissionService, ServiceError, VerificationService,
};
