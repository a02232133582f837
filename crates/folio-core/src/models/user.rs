//! User domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Platform-wide role carried on the user record itself.
///
/// This axis is evaluated by document visibility and is independent of
/// any per-organization membership role. The two are deliberately kept
/// as separate checks.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum GlobalRole {
    Admin,
    Editor,
    Viewer,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password_hash: String,
    pub role: GlobalRole,
    pub avatar: Option<String>,
    /// Direct organization reference. Distinct from the many-to-many
    /// membership relation; document visibility reads this field only.
    pub organization_id: Option<Uuid>,
    /// Soft-delete flag. Inactive users are invisible to all default
    /// lookups; the row is retained.
    pub is_active: bool,
    pub last_login_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUser {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    /// Argon2id PHC-format hash, produced by the auth crate before the
    /// record reaches the repository.
    pub password_hash: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UpdateUser {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub role: Option<GlobalRole>,
    pub avatar: Option<Option<String>>,
    pub organization_id: Option<Option<Uuid>>,
}
