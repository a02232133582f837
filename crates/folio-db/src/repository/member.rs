//! SurrealDB implementation of [`MemberRepository`].

use chrono::{DateTime, Utc};
use folio_core::error::FolioResult;
use folio_core::models::member::{CreateMember, MemberRole, OrganizationMember};
use folio_core::repository::{MemberRepository, PaginatedResult, Pagination};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use crate::error::DbError;

/// DB-side row struct for queries where the UUID is already known.
#[derive(Debug, SurrealValue)]
struct MemberRow {
    user_id: String,
    organization_id: String,
    role: String,
    is_active: bool,
    joined_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// DB-side row struct that includes the record ID via `meta::id(id)`.
#[derive(Debug, SurrealValue)]
struct MemberRowWithId {
    record_id: String,
    user_id: String,
    organization_id: String,
    role: String,
    is_active: bool,
    joined_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

fn parse_member_role(s: &str) -> Result<MemberRole, DbError> {
    match s {
        "Owner" => Ok(MemberRole::Owner),
        "Admin" => Ok(MemberRole::Admin),
        "Editor" => Ok(MemberRole::Editor),
        "Viewer" => Ok(MemberRole::Viewer),
        other => Err(DbError::Migration(format!("unknown member role: {other}"))),
    }
}

fn member_role_str(role: MemberRole) -> &'static str {
    match role {
        MemberRole::Owner => "Owner",
        MemberRole::Admin => "Admin",
        MemberRole::Editor => "Editor",
        MemberRole::Viewer => "Viewer",
    }
}

impl MemberRow {
    fn into_member(self, id: Uuid) -> Result<OrganizationMember, DbError> {
        let user_id = Uuid::parse_str(&self.user_id)
            .map_err(|e| DbError::Migration(format!("invalid user UUID: {e}")))?;
        let organization_id = Uuid::parse_str(&self.organization_id)
            .map_err(|e| DbError::Migration(format!("invalid organization UUID: {e}")))?;
        Ok(OrganizationMember {
            id,
            user_id,
            organization_id,
            role: parse_member_role(&self.role)?,
            is_active: self.is_active,
            joined_at: self.joined_at,
            updated_at: self.updated_at,
        })
    }
}

impl MemberRowWithId {
    fn try_into_member(self) -> Result<OrganizationMember, DbError> {
        let id = Uuid::parse_str(&self.record_id)
            .map_err(|e| DbError::Migration(format!("invalid UUID: {e}")))?;
        let user_id = Uuid::parse_str(&self.user_id)
            .map_err(|e| DbError::Migration(format!("invalid user UUID: {e}")))?;
        let organization_id = Uuid::parse_str(&self.organization_id)
            .map_err(|e| DbError::Migration(format!("invalid organization UUID: {e}")))?;
        Ok(OrganizationMember {
            id,
            user_id,
            organization_id,
            role: parse_member_role(&self.role)?,
            is_active: self.is_active,
            joined_at: self.joined_at,
            updated_at: self.updated_at,
        })
    }
}

/// Row struct for count queries.
#[derive(Debug, SurrealValue)]
struct CountRow {
    total: u64,
}

/// SurrealDB implementation of the organization member repository.
#[derive(Clone)]
pub struct SurrealMemberRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealMemberRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> MemberRepository for SurrealMemberRepository<C> {
    async fn create(&self, input: CreateMember) -> FolioResult<OrganizationMember> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();

        let result = self
            .db
            .query(
                "CREATE type::record('organization_member', $id) SET \
                 user_id = $user_id, \
                 organization_id = $organization_id, \
                 role = $role",
            )
            .bind(("id", id_str.clone()))
            .bind(("user_id", input.user_id.to_string()))
            .bind(("organization_id", input.organization_id.to_string()))
            .bind(("role", member_role_str(input.role).to_string()))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(|e| DbError::Migration(e.to_string()))?;

        let rows: Vec<MemberRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "organization_member".into(),
            id: id_str,
        })?;

        Ok(row.into_member(id)?)
    }

    async fn get_by_id(
        &self,
        organization_id: Uuid,
        member_id: Uuid,
    ) -> FolioResult<OrganizationMember> {
        let id_str = member_id.to_string();

        let mut result = self
            .db
            .query(
                "SELECT * FROM type::record('organization_member', $id) \
                 WHERE organization_id = $organization_id \
                 AND is_active = true",
            )
            .bind(("id", id_str.clone()))
            .bind(("organization_id", organization_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<MemberRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "organization_member".into(),
            id: id_str,
        })?;

        Ok(row.into_member(member_id)?)
    }

    async fn get_active(
        &self,
        organization_id: Uuid,
        user_id: Uuid,
    ) -> FolioResult<OrganizationMember> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * \
                 FROM organization_member \
                 WHERE organization_id = $organization_id \
                 AND user_id = $user_id AND is_active = true",
            )
            .bind(("organization_id", organization_id.to_string()))
            .bind(("user_id", user_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<MemberRowWithId> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "organization_member".into(),
            id: format!("org={organization_id} user={user_id}"),
        })?;

        Ok(row.try_into_member()?)
    }

    async fn update_role(
        &self,
        organization_id: Uuid,
        member_id: Uuid,
        role: MemberRole,
    ) -> FolioResult<OrganizationMember> {
        let id_str = member_id.to_string();

        let mut result = self
            .db
            .query(
                "UPDATE type::record('organization_member', $id) SET \
                 role = $role, updated_at = time::now() \
                 WHERE organization_id = $organization_id \
                 AND is_active = true",
            )
            .bind(("id", id_str.clone()))
            .bind(("organization_id", organization_id.to_string()))
            .bind(("role", member_role_str(role).to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<MemberRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "organization_member".into(),
            id: id_str,
        })?;

        Ok(row.into_member(member_id)?)
    }

    async fn deactivate(&self, organization_id: Uuid, member_id: Uuid) -> FolioResult<()> {
        // Soft-delete: the row is retained for history.
        self.db
            .query(
                "UPDATE type::record('organization_member', $id) SET \
                 is_active = false, updated_at = time::now() \
                 WHERE organization_id = $organization_id",
            )
            .bind(("id", member_id.to_string()))
            .bind(("organization_id", organization_id.to_string()))
            .await
            .map_err(DbError::from)?;

        Ok(())
    }

    async fn list_by_organization(
        &self,
        organization_id: Uuid,
        pagination: Pagination,
    ) -> FolioResult<PaginatedResult<OrganizationMember>> {
        let org_id_str = organization_id.to_string();

        let mut count_result = self
            .db
            .query(
                "SELECT count() AS total FROM organization_member \
                 WHERE organization_id = $organization_id \
                 AND is_active = true GROUP ALL",
            )
            .bind(("organization_id", org_id_str.clone()))
            .await
            .map_err(DbError::from)?;
        let count_rows: Vec<CountRow> = count_result.take(0).map_err(DbError::from)?;
        let total = count_rows.first().map(|r| r.total).unwrap_or(0);

        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * \
                 FROM organization_member \
                 WHERE organization_id = $organization_id \
                 AND is_active = true \
                 ORDER BY joined_at ASC \
                 LIMIT $limit START $offset",
            )
            .bind(("organization_id", org_id_str))
            .bind(("limit", pagination.limit))
            .bind(("offset", pagination.offset))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<MemberRowWithId> = result.take(0).map_err(DbError::from)?;

        let items = rows
            .into_iter()
            .map(|row| row.try_into_member())
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(PaginatedResult {
            items,
            total,
            offset: pagination.offset,
            limit: pagination.limit,
        })
    }
}
