//! Repository trait definitions for data access abstraction.
//!
//! All repository operations are async. Entities that support soft
//! deletion are filtered to `is_active = true` by every default
//! lookup; rows are never physically removed through these paths
//! (documents are the one exception, matching their delete
//! operation).

use uuid::Uuid;

use crate::error::FolioResult;
use crate::models::{
    document::{Document, NewDocument},
    member::{CreateMember, MemberRole, OrganizationMember},
    organization::{CreateOrganization, Organization, UpdateOrganization},
    user::{CreateUser, UpdateUser, User},
};

/// Pagination parameters for list queries.
#[derive(Debug, Clone)]
pub struct Pagination {
    pub offset: u64,
    pub limit: u64,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            offset: 0,
            limit: 50,
        }
    }
}

/// A paginated result set.
#[derive(Debug, Clone)]
pub struct PaginatedResult<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub offset: u64,
    pub limit: u64,
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

pub trait UserRepository: Send + Sync {
    fn create(&self, input: CreateUser) -> impl Future<Output = FolioResult<User>> + Send;
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = FolioResult<User>> + Send;
    fn get_by_email(&self, email: &str) -> impl Future<Output = FolioResult<User>> + Send;
    fn update(
        &self,
        id: Uuid,
        input: UpdateUser,
    ) -> impl Future<Output = FolioResult<User>> + Send;
    /// Stamp `last_login_at` with the current time.
    fn touch_last_login(&self, id: Uuid) -> impl Future<Output = FolioResult<()>> + Send;
    /// Soft-delete: sets `is_active` to false.
    fn deactivate(&self, id: Uuid) -> impl Future<Output = FolioResult<()>> + Send;
    fn list(
        &self,
        pagination: Pagination,
    ) -> impl Future<Output = FolioResult<PaginatedResult<User>>> + Send;
}

// ---------------------------------------------------------------------------
// Organizations
// ---------------------------------------------------------------------------

pub trait OrganizationRepository: Send + Sync {
    fn create(
        &self,
        input: CreateOrganization,
    ) -> impl Future<Output = FolioResult<Organization>> + Send;
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = FolioResult<Organization>> + Send;
    /// Active organizations only; `subdomain` is matched lowercased.
    fn get_by_subdomain(
        &self,
        subdomain: &str,
    ) -> impl Future<Output = FolioResult<Organization>> + Send;
    /// True if any organization row, active or not, already holds the
    /// subdomain. Backed additionally by a unique index so concurrent
    /// creates cannot both slip past this check.
    fn subdomain_exists(&self, subdomain: &str) -> impl Future<Output = FolioResult<bool>> + Send;
    fn update(
        &self,
        id: Uuid,
        input: UpdateOrganization,
    ) -> impl Future<Output = FolioResult<Organization>> + Send;
    /// Soft-delete: sets `is_active` to false.
    fn deactivate(&self, id: Uuid) -> impl Future<Output = FolioResult<()>> + Send;
    /// Hard delete, releasing the subdomain. Exists so a creation
    /// whose owner membership insert failed can be rolled back; soft
    /// deletion is the normal removal path.
    fn delete(&self, id: Uuid) -> impl Future<Output = FolioResult<()>> + Send;
    fn list(
        &self,
        pagination: Pagination,
    ) -> impl Future<Output = FolioResult<PaginatedResult<Organization>>> + Send;
}

// ---------------------------------------------------------------------------
// Organization members
// ---------------------------------------------------------------------------

pub trait MemberRepository: Send + Sync {
    fn create(
        &self,
        input: CreateMember,
    ) -> impl Future<Output = FolioResult<OrganizationMember>> + Send;
    fn get_by_id(
        &self,
        organization_id: Uuid,
        member_id: Uuid,
    ) -> impl Future<Output = FolioResult<OrganizationMember>> + Send;
    /// The single active membership for (user, organization), or
    /// NotFound. Uniqueness of that row is an application-level
    /// invariant enforced by the membership service before insert.
    fn get_active(
        &self,
        organization_id: Uuid,
        user_id: Uuid,
    ) -> impl Future<Output = FolioResult<OrganizationMember>> + Send;
    fn update_role(
        &self,
        organization_id: Uuid,
        member_id: Uuid,
        role: MemberRole,
    ) -> impl Future<Output = FolioResult<OrganizationMember>> + Send;
    /// Soft-delete: sets `is_active` to false.
    fn deactivate(
        &self,
        organization_id: Uuid,
        member_id: Uuid,
    ) -> impl Future<Output = FolioResult<()>> + Send;
    fn list_by_organization(
        &self,
        organization_id: Uuid,
        pagination: Pagination,
    ) -> impl Future<Output = FolioResult<PaginatedResult<OrganizationMember>>> + Send;
}

// ---------------------------------------------------------------------------
// Documents
// ---------------------------------------------------------------------------

/// Listing restriction for non-admin callers: only documents they
/// authored or that are public and published.
#[derive(Debug, Clone, Default)]
pub struct DocumentFilter {
    pub visible_to: Option<Uuid>,
}

pub trait DocumentRepository: Send + Sync {
    fn create(&self, input: NewDocument) -> impl Future<Output = FolioResult<Document>> + Send;
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = FolioResult<Document>> + Send;
    fn get_by_slug(&self, slug: &str) -> impl Future<Output = FolioResult<Document>> + Send;
    /// Persist every mutable field of the document as-is.
    fn save(&self, document: &Document) -> impl Future<Output = FolioResult<()>> + Send;
    /// Hard delete. Documents are the one entity removed physically.
    fn delete(&self, id: Uuid) -> impl Future<Output = FolioResult<()>> + Send;
    /// Atomic `views += 1`; a single UPDATE round trip so concurrent
    /// readers cannot lose increments.
    fn record_view(&self, id: Uuid) -> impl Future<Output = FolioResult<()>> + Send;
    fn list(
        &self,
        filter: DocumentFilter,
        pagination: Pagination,
    ) -> impl Future<Output = FolioResult<PaginatedResult<Document>>> + Send;
    fn list_by_author(
        &self,
        author_id: Uuid,
        pagination: Pagination,
    ) -> impl Future<Output = FolioResult<PaginatedResult<Document>>> + Send;
    /// Every document attached to the organization, unfiltered; the
    /// public projector applies its own visibility filter on top.
    fn list_by_organization(
        &self,
        organization_id: Uuid,
    ) -> impl Future<Output = FolioResult<Vec<Document>>> + Send;
}
