//! Authentication error types.

use folio_core::error::FolioError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("email is already registered")]
    EmailTaken,

    #[error("password must be at least {0} characters")]
    PasswordTooShort(usize),

    #[error("cryptography error: {0}")]
    Crypto(String),
}

impl From<AuthError> for FolioError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials => FolioError::AuthenticationFailed {
                reason: err.to_string(),
            },
            AuthError::EmailTaken => FolioError::Conflict {
                message: err.to_string(),
            },
            AuthError::PasswordTooShort(_) => FolioError::Conflict {
                message: err.to_string(),
            },
            AuthError::Crypto(msg) => FolioError::Crypto(msg),
        }
    }
}
