//! Authentication configuration.

/// Configuration for the identity service.
///
/// Token issuance lives outside this core; only credential policy is
/// configured here.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Optional pepper prepended to passwords before Argon2id
    /// hashing and verification.
    pub pepper: Option<String>,
    /// Minimum password length for policy enforcement.
    pub min_password_length: usize,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            pepper: None,
            min_password_length: 12,
        }
    }
}
