//! Document domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum DocumentStatus {
    Draft,
    Published,
    Archived,
}

/// A documentation page. Owned by exactly one author; optionally
/// attached to one organization. The document's lifetime is bound to
/// the author record, not the organization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub content: String,
    pub status: DocumentStatus,
    /// Derived from the title. Not guaranteed unique.
    pub slug: Option<String>,
    pub is_public: bool,
    pub views: u64,
    /// Set on every transition into `Published`. Never cleared by a
    /// later transition away from it.
    pub published_at: Option<DateTime<Utc>>,
    pub author_id: Uuid,
    pub organization_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Document {
    pub fn is_published(&self) -> bool {
        self.status == DocumentStatus::Published
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateDocument {
    pub title: String,
    pub description: Option<String>,
    pub content: String,
    /// Defaults to `Draft` when omitted.
    pub status: Option<DocumentStatus>,
    /// Defaults to `false` when omitted.
    pub is_public: Option<bool>,
}

/// Fully resolved record handed to the repository by the document
/// service: slug derived, defaults applied, authorship attached.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewDocument {
    pub title: String,
    pub description: Option<String>,
    pub content: String,
    pub status: DocumentStatus,
    pub slug: Option<String>,
    pub is_public: bool,
    pub author_id: Uuid,
    pub organization_id: Option<Uuid>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UpdateDocument {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub content: Option<String>,
    pub status: Option<DocumentStatus>,
    pub is_public: Option<bool>,
}

/// Reduced shape exposed on the public subdomain site. Excludes the
/// author and every internal-only field.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublicDocument {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub slug: Option<String>,
    pub content: String,
    pub views: u64,
    pub published_at: Option<DateTime<Utc>>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Document> for PublicDocument {
    fn from(doc: &Document) -> Self {
        Self {
            id: doc.id,
            title: doc.title.clone(),
            description: doc.description.clone(),
            slug: doc.slug.clone(),
            content: doc.content.clone(),
            views: doc.views,
            published_at: doc.published_at,
            updated_at: doc.updated_at,
        }
    }
}
