//! Organization membership domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Role a user holds inside one organization.
///
/// There is no total order over these roles: each membership operation
/// declares its own explicit allowed set.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum MemberRole {
    Owner,
    Admin,
    Editor,
    Viewer,
}

/// Join row between a user and an organization.
///
/// Invariant: at most one active membership exists per
/// (user, organization) pair. Removal is a soft delete.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrganizationMember {
    pub id: Uuid,
    pub user_id: Uuid,
    pub organization_id: Uuid,
    pub role: MemberRole,
    pub is_active: bool,
    pub joined_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateMember {
    pub user_id: Uuid,
    pub organization_id: Uuid,
    pub role: MemberRole,
}
