//! Organization domain model.
//!
//! Organizations are the tenants of the platform. Each one is
//! addressed externally by a globally unique subdomain and owns a
//! collection of documents and members.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Organization {
    pub id: Uuid,
    pub name: String,
    /// Lowercase, globally unique, 3-63 chars. Validated against
    /// [`crate::subdomain::is_valid_subdomain`] on create and update.
    pub subdomain: String,
    pub custom_domain: Option<String>,
    pub description: Option<String>,
    pub website: Option<String>,
    pub logo: Option<String>,
    /// Gates the public subdomain site as a whole. Independent of the
    /// per-document `is_public` flag.
    pub is_public: bool,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateOrganization {
    pub name: String,
    pub subdomain: String,
    pub description: Option<String>,
    pub website: Option<String>,
    /// Defaults to `true` when omitted.
    pub is_public: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UpdateOrganization {
    pub name: Option<String>,
    pub subdomain: Option<String>,
    pub custom_domain: Option<Option<String>>,
    pub description: Option<Option<String>>,
    pub website: Option<Option<String>>,
    pub logo: Option<Option<String>>,
    pub is_public: Option<bool>,
}

/// Reduced shape exposed on the public subdomain site. Internal flags
/// never leave the backend through this projection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublicOrganization {
    pub name: String,
    pub subdomain: String,
    pub description: Option<String>,
    pub website: Option<String>,
    pub logo: Option<String>,
}

impl From<&Organization> for PublicOrganization {
    fn from(org: &Organization) -> Self {
        Self {
            name: org.name.clone(),
            subdomain: org.subdomain.clone(),
            description: org.description.clone(),
            website: org.website.clone(),
            logo: org.logo.clone(),
        }
    }
}
