//! FOLIO Auth — Argon2id credential handling and the identity
//! service (registration, login, deactivation).

pub mod config;
pub mod error;
pub mod password;
pub mod service;

pub use config::AuthConfig;
pub use error::AuthError;
pub use service::{AuthService, RegisterInput};
