//! Organization and membership management.
//!
//! Membership roles carry no total order; every operation names its
//! own allowed-role set explicitly. This axis is independent of the
//! platform-wide `GlobalRole` evaluated by document visibility.

use folio_core::error::{FolioError, FolioResult};
use folio_core::models::member::{CreateMember, MemberRole, OrganizationMember};
use folio_core::models::organization::{CreateOrganization, Organization, UpdateOrganization};
use folio_core::repository::{
    MemberRepository, OrganizationRepository, PaginatedResult, Pagination,
};
use folio_core::subdomain;
use tracing::{error, info};
use uuid::Uuid;

/// Roles allowed to manage members and organization settings.
pub const MANAGE_ROLES: &[MemberRole] = &[MemberRole::Owner, MemberRole::Admin];

/// Roles allowed to read membership data: any active member.
pub const READ_ROLES: &[MemberRole] = &[
    MemberRole::Owner,
    MemberRole::Admin,
    MemberRole::Editor,
    MemberRole::Viewer,
];

/// Membership service.
///
/// Generic over repository implementations so the decision logic has
/// no dependency on the database crate.
pub struct MembershipService<O: OrganizationRepository, M: MemberRepository> {
    org_repo: O,
    member_repo: M,
}

impl<O: OrganizationRepository, M: MemberRepository> MembershipService<O, M> {
    pub fn new(org_repo: O, member_repo: M) -> Self {
        Self {
            org_repo,
            member_repo,
        }
    }

    /// Look up the caller's single active membership and require its
    /// role to be in `allowed`. Missing membership and wrong role both
    /// fail Forbidden; the caller learns nothing about which. Store
    /// faults propagate unchanged.
    pub async fn check_permission(
        &self,
        organization_id: Uuid,
        user_id: Uuid,
        allowed: &[MemberRole],
    ) -> FolioResult<OrganizationMember> {
        let member = match self.member_repo.get_active(organization_id, user_id).await {
            Ok(member) => member,
            Err(FolioError::NotFound { .. }) => {
                return Err(FolioError::forbidden(
                    "not an active member of this organization",
                ));
            }
            Err(e) => return Err(e),
        };

        if !allowed.contains(&member.role) {
            return Err(FolioError::forbidden(
                "membership role does not permit this operation",
            ));
        }

        Ok(member)
    }

    /// Create an organization and its owner membership for the
    /// creator. This is the only path that produces an owner row;
    /// ownership is never transferable afterwards. If the owner insert
    /// fails, the organization row is removed again so the pair either
    /// exists whole or not at all.
    pub async fn create_organization(
        &self,
        creator_id: Uuid,
        input: CreateOrganization,
    ) -> FolioResult<(Organization, OrganizationMember)> {
        self.ensure_subdomain_free(&input.subdomain).await?;

        let organization = self.org_repo.create(input).await?;
        let owner = match self
            .member_repo
            .create(CreateMember {
                user_id: creator_id,
                organization_id: organization.id,
                role: MemberRole::Owner,
            })
            .await
        {
            Ok(owner) => owner,
            Err(e) => {
                // Roll back the organization row; otherwise an
                // owner-less tenant nobody can manage keeps the
                // subdomain claimed forever.
                if let Err(rollback) = self.org_repo.delete(organization.id).await {
                    error!(
                        organization_id = %organization.id,
                        error = %rollback,
                        "Failed to roll back organization after owner insert failure"
                    );
                }
                return Err(e);
            }
        };

        info!(
            organization_id = %organization.id,
            subdomain = %organization.subdomain,
            owner_id = %creator_id,
            "Created organization"
        );
        Ok((organization, owner))
    }

    /// Update an organization. A subdomain change re-runs the full
    /// format and uniqueness validation.
    pub async fn update_organization(
        &self,
        organization_id: Uuid,
        input: UpdateOrganization,
    ) -> FolioResult<Organization> {
        if let Some(new_subdomain) = &input.subdomain {
            let current = self.org_repo.get_by_id(organization_id).await?;
            if current.subdomain != new_subdomain.to_lowercase() {
                self.ensure_subdomain_free(new_subdomain).await?;
            }
        }

        self.org_repo.update(organization_id, input).await
    }

    /// Soft-delete an organization. The subdomain stays claimed.
    pub async fn delete_organization(&self, organization_id: Uuid) -> FolioResult<()> {
        // Surface NotFound for unknown or already-deleted orgs.
        self.org_repo.get_by_id(organization_id).await?;
        self.org_repo.deactivate(organization_id).await?;

        info!(organization_id = %organization_id, "Deactivated organization");
        Ok(())
    }

    /// Add a user to an organization.
    ///
    /// Caller must hold owner or admin. Fails Conflict when the target
    /// already has an active membership. The uniqueness check is
    /// application-level only; two racing calls for the same pair can
    /// still both insert.
    pub async fn add_member(
        &self,
        organization_id: Uuid,
        caller_id: Uuid,
        target_user_id: Uuid,
        role: Option<MemberRole>,
    ) -> FolioResult<OrganizationMember> {
        self.check_permission(organization_id, caller_id, MANAGE_ROLES)
            .await?;

        match self
            .member_repo
            .get_active(organization_id, target_user_id)
            .await
        {
            Ok(_) => {
                return Err(FolioError::conflict(
                    "user is already a member of this organization",
                ));
            }
            Err(FolioError::NotFound { .. }) => {}
            Err(e) => return Err(e),
        }

        let member = self
            .member_repo
            .create(CreateMember {
                user_id: target_user_id,
                organization_id,
                role: role.unwrap_or(MemberRole::Viewer),
            })
            .await?;

        info!(
            organization_id = %organization_id,
            user_id = %target_user_id,
            "Added organization member"
        );
        Ok(member)
    }

    /// Change a member's role. Caller must hold owner or admin; fails
    /// NotFound when no active membership row matches.
    pub async fn update_member_role(
        &self,
        organization_id: Uuid,
        caller_id: Uuid,
        member_id: Uuid,
        role: MemberRole,
    ) -> FolioResult<OrganizationMember> {
        self.check_permission(organization_id, caller_id, MANAGE_ROLES)
            .await?;

        self.member_repo
            .update_role(organization_id, member_id, role)
            .await
    }

    /// Remove (soft-delete) a member. Caller must hold owner or
    /// admin. The owner membership can never be removed through this
    /// path, by anyone.
    pub async fn remove_member(
        &self,
        organization_id: Uuid,
        caller_id: Uuid,
        member_id: Uuid,
    ) -> FolioResult<()> {
        self.check_permission(organization_id, caller_id, MANAGE_ROLES)
            .await?;

        let target = self.member_repo.get_by_id(organization_id, member_id).await?;
        if target.role == MemberRole::Owner {
            return Err(FolioError::forbidden(
                "the organization owner cannot be removed",
            ));
        }

        self.member_repo
            .deactivate(organization_id, member_id)
            .await?;

        info!(
            organization_id = %organization_id,
            member_id = %member_id,
            "Removed organization member"
        );
        Ok(())
    }

    /// List active members. Any active member may read.
    pub async fn list_members(
        &self,
        organization_id: Uuid,
        caller_id: Uuid,
        pagination: Pagination,
    ) -> FolioResult<PaginatedResult<OrganizationMember>> {
        self.check_permission(organization_id, caller_id, READ_ROLES)
            .await?;

        self.member_repo
            .list_by_organization(organization_id, pagination)
            .await
    }

    /// Reject invalid or taken subdomains with Conflict, matching the
    /// registration rules (not the looser routing rules).
    async fn ensure_subdomain_free(&self, subdomain: &str) -> FolioResult<()> {
        if !subdomain::is_valid_subdomain(subdomain) {
            return Err(FolioError::conflict("invalid subdomain format"));
        }
        if self.org_repo.subdomain_exists(subdomain).await? {
            return Err(FolioError::conflict("subdomain already exists"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};

    use chrono::Utc;

    use super::*;

    fn store_down<T>() -> FolioResult<T> {
        Err(FolioError::Database("connection reset".into()))
    }

    fn sample_org(id: Uuid) -> Organization {
        Organization {
            id,
            name: "Acme".into(),
            subdomain: "acme".into(),
            custom_domain: None,
            description: None,
            website: None,
            logo: None,
            is_public: true,
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    /// Member store whose every call fails like a lost connection.
    struct DownMemberRepo;

    impl MemberRepository for DownMemberRepo {
        async fn create(&self, _input: CreateMember) -> FolioResult<OrganizationMember> {
            store_down()
        }
        async fn get_by_id(&self, _org: Uuid, _member: Uuid) -> FolioResult<OrganizationMember> {
            store_down()
        }
        async fn get_active(&self, _org: Uuid, _user: Uuid) -> FolioResult<OrganizationMember> {
            store_down()
        }
        async fn update_role(
            &self,
            _org: Uuid,
            _member: Uuid,
            _role: MemberRole,
        ) -> FolioResult<OrganizationMember> {
            store_down()
        }
        async fn deactivate(&self, _org: Uuid, _member: Uuid) -> FolioResult<()> {
            store_down()
        }
        async fn list_by_organization(
            &self,
            _org: Uuid,
            _pagination: Pagination,
        ) -> FolioResult<PaginatedResult<OrganizationMember>> {
            store_down()
        }
    }

    /// Member store with no rows at all.
    struct EmptyMemberRepo;

    impl MemberRepository for EmptyMemberRepo {
        async fn create(&self, _input: CreateMember) -> FolioResult<OrganizationMember> {
            store_down()
        }
        async fn get_by_id(&self, org: Uuid, member: Uuid) -> FolioResult<OrganizationMember> {
            Err(FolioError::not_found(
                "organization_member",
                format!("org={org} member={member}"),
            ))
        }
        async fn get_active(&self, org: Uuid, user: Uuid) -> FolioResult<OrganizationMember> {
            Err(FolioError::not_found(
                "organization_member",
                format!("org={org} user={user}"),
            ))
        }
        async fn update_role(
            &self,
            _org: Uuid,
            _member: Uuid,
            _role: MemberRole,
        ) -> FolioResult<OrganizationMember> {
            store_down()
        }
        async fn deactivate(&self, _org: Uuid, _member: Uuid) -> FolioResult<()> {
            store_down()
        }
        async fn list_by_organization(
            &self,
            _org: Uuid,
            _pagination: Pagination,
        ) -> FolioResult<PaginatedResult<OrganizationMember>> {
            store_down()
        }
    }

    /// Organization store that accepts creates and records whether the
    /// row was hard-deleted again.
    struct RecordingOrgRepo {
        deleted: Arc<AtomicBool>,
    }

    impl OrganizationRepository for RecordingOrgRepo {
        async fn create(&self, _input: CreateOrganization) -> FolioResult<Organization> {
            Ok(sample_org(Uuid::new_v4()))
        }
        async fn get_by_id(&self, id: Uuid) -> FolioResult<Organization> {
            Ok(sample_org(id))
        }
        async fn get_by_subdomain(&self, _subdomain: &str) -> FolioResult<Organization> {
            store_down()
        }
        async fn subdomain_exists(&self, _subdomain: &str) -> FolioResult<bool> {
            Ok(false)
        }
        async fn update(&self, id: Uuid, _input: UpdateOrganization) -> FolioResult<Organization> {
            Ok(sample_org(id))
        }
        async fn deactivate(&self, _id: Uuid) -> FolioResult<()> {
            Ok(())
        }
        async fn delete(&self, _id: Uuid) -> FolioResult<()> {
            self.deleted.store(true, Ordering::SeqCst);
            Ok(())
        }
        async fn list(
            &self,
            _pagination: Pagination,
        ) -> FolioResult<PaginatedResult<Organization>> {
            store_down()
        }
    }

    fn service_with<M: MemberRepository>(
        member_repo: M,
    ) -> (MembershipService<RecordingOrgRepo, M>, Arc<AtomicBool>) {
        let deleted = Arc::new(AtomicBool::new(false));
        let org_repo = RecordingOrgRepo {
            deleted: Arc::clone(&deleted),
        };
        (MembershipService::new(org_repo, member_repo), deleted)
    }

    #[tokio::test]
    async fn store_faults_in_permission_checks_propagate_unchanged() {
        let (service, _) = service_with(DownMemberRepo);

        let result = service
            .check_permission(Uuid::new_v4(), Uuid::new_v4(), MANAGE_ROLES)
            .await;
        assert!(matches!(result, Err(FolioError::Database(_))));
    }

    #[tokio::test]
    async fn missing_membership_is_forbidden() {
        let (service, _) = service_with(EmptyMemberRepo);

        let result = service
            .check_permission(Uuid::new_v4(), Uuid::new_v4(), READ_ROLES)
            .await;
        assert!(matches!(result, Err(FolioError::Forbidden { .. })));
    }

    #[tokio::test]
    async fn failed_owner_insert_rolls_back_the_organization() {
        let (service, deleted) = service_with(DownMemberRepo);

        let result = service
            .create_organization(
                Uuid::new_v4(),
                CreateOrganization {
                    name: "Acme".into(),
                    subdomain: "acme".into(),
                    description: None,
                    website: None,
                    is_public: None,
                },
            )
            .await;

        assert!(matches!(result, Err(FolioError::Database(_))));
        assert!(deleted.load(Ordering::SeqCst));
    }
}
