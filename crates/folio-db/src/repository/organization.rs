//! SurrealDB implementation of [`OrganizationRepository`].

use chrono::{DateTime, Utc};
use folio_core::error::FolioResult;
use folio_core::models::organization::{CreateOrganization, Organization, UpdateOrganization};
use folio_core::repository::{OrganizationRepository, PaginatedResult, Pagination};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use crate::error::DbError;

/// DB-side row struct for queries where the UUID is already known.
#[derive(Debug, SurrealValue)]
struct OrganizationRow {
    name: String,
    subdomain: String,
    custom_domain: Option<String>,
    description: Option<String>,
    website: Option<String>,
    logo: Option<String>,
    is_public: bool,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// DB-side row struct that includes the record ID via `meta::id(id)`.
#[derive(Debug, SurrealValue)]
struct OrganizationRowWithId {
    record_id: String,
    name: String,
    subdomain: String,
    custom_domain: Option<String>,
    description: Option<String>,
    website: Option<String>,
    logo: Option<String>,
    is_public: bool,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl OrganizationRow {
    fn into_organization(self, id: Uuid) -> Organization {
        Organization {
            id,
            name: self.name,
            subdomain: self.subdomain,
            custom_domain: self.custom_domain,
            description: self.description,
            website: self.website,
            logo: self.logo,
            is_public: self.is_public,
            is_active: self.is_active,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

impl OrganizationRowWithId {
    fn try_into_organization(self) -> Result<Organization, DbError> {
        let id = Uuid::parse_str(&self.record_id)
            .map_err(|e| DbError::Migration(format!("invalid UUID: {e}")))?;
        Ok(Organization {
            id,
            name: self.name,
            subdomain: self.subdomain,
            custom_domain: self.custom_domain,
            description: self.description,
            website: self.website,
            logo: self.logo,
            is_public: self.is_public,
            is_active: self.is_active,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// Row struct for count queries.
#[derive(Debug, SurrealValue)]
struct CountRow {
    total: u64,
}

/// SurrealDB implementation of the Organization repository.
#[derive(Clone)]
pub struct SurrealOrganizationRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealOrganizationRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> OrganizationRepository for SurrealOrganizationRepository<C> {
    async fn create(&self, input: CreateOrganization) -> FolioResult<Organization> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();

        // The caller validates the subdomain; storage is lowercase.
        let subdomain = input.subdomain.to_lowercase();
        let is_public = input.is_public.unwrap_or(true);

        let result = self
            .db
            .query(
                "CREATE type::record('organization', $id) SET \
                 name = $name, subdomain = $subdomain, \
                 custom_domain = NONE, \
                 description = $description, website = $website, \
                 logo = NONE, is_public = $is_public",
            )
            .bind(("id", id_str.clone()))
            .bind(("name", input.name))
            .bind(("subdomain", subdomain))
            .bind(("description", input.description))
            .bind(("website", input.website))
            .bind(("is_public", is_public))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(|e| DbError::Migration(e.to_string()))?;

        let rows: Vec<OrganizationRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "organization".into(),
            id: id_str,
        })?;

        Ok(row.into_organization(id))
    }

    async fn get_by_id(&self, id: Uuid) -> FolioResult<Organization> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query(
                "SELECT * FROM type::record('organization', $id) \
                 WHERE is_active = true",
            )
            .bind(("id", id_str.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<OrganizationRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "organization".into(),
            id: id_str,
        })?;

        Ok(row.into_organization(id))
    }

    async fn get_by_subdomain(&self, subdomain: &str) -> FolioResult<Organization> {
        let lowered = subdomain.to_lowercase();

        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM organization \
                 WHERE subdomain = $subdomain AND is_active = true",
            )
            .bind(("subdomain", lowered))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<OrganizationRowWithId> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "organization".into(),
            id: format!("subdomain={subdomain}"),
        })?;

        Ok(row.try_into_organization()?)
    }

    async fn subdomain_exists(&self, subdomain: &str) -> FolioResult<bool> {
        // Checked against every row, active or not, so a soft-deleted
        // organization keeps its subdomain reserved.
        let lowered = subdomain.to_lowercase();

        let mut result = self
            .db
            .query(
                "SELECT count() AS total FROM organization \
                 WHERE subdomain = $subdomain GROUP ALL",
            )
            .bind(("subdomain", lowered))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<CountRow> = result.take(0).map_err(DbError::from)?;
        Ok(rows.first().map(|r| r.total).unwrap_or(0) > 0)
    }

    async fn update(&self, id: Uuid, input: UpdateOrganization) -> FolioResult<Organization> {
        let id_str = id.to_string();

        let mut sets = Vec::new();
        if input.name.is_some() {
            sets.push("name = $name");
        }
        if input.subdomain.is_some() {
            sets.push("subdomain = $subdomain");
        }
        if input.custom_domain.is_some() {
            sets.push("custom_domain = $custom_domain");
        }
        if input.description.is_some() {
            sets.push("description = $description");
        }
        if input.website.is_some() {
            sets.push("website = $website");
        }
        if input.logo.is_some() {
            sets.push("logo = $logo");
        }
        if input.is_public.is_some() {
            sets.push("is_public = $is_public");
        }
        sets.push("updated_at = time::now()");

        let query = format!(
            "UPDATE type::record('organization', $id) SET {} \
             WHERE is_active = true",
            sets.join(", ")
        );

        let mut builder = self.db.query(&query).bind(("id", id_str.clone()));

        if let Some(name) = input.name {
            builder = builder.bind(("name", name));
        }
        if let Some(subdomain) = input.subdomain {
            builder = builder.bind(("subdomain", subdomain.to_lowercase()));
        }
        if let Some(custom_domain) = input.custom_domain {
            builder = builder.bind(("custom_domain", custom_domain));
        }
        if let Some(description) = input.description {
            builder = builder.bind(("description", description));
        }
        if let Some(website) = input.website {
            builder = builder.bind(("website", website));
        }
        if let Some(logo) = input.logo {
            builder = builder.bind(("logo", logo));
        }
        if let Some(is_public) = input.is_public {
            builder = builder.bind(("is_public", is_public));
        }

        let result = builder.await.map_err(DbError::from)?;
        let mut result = result
            .check()
            .map_err(|e| DbError::Migration(e.to_string()))?;

        let rows: Vec<OrganizationRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "organization".into(),
            id: id_str,
        })?;

        Ok(row.into_organization(id))
    }

    async fn deactivate(&self, id: Uuid) -> FolioResult<()> {
        // Soft-delete: the row and its subdomain claim are retained.
        self.db
            .query(
                "UPDATE type::record('organization', $id) SET \
                 is_active = false, updated_at = time::now()",
            )
            .bind(("id", id.to_string()))
            .await
            .map_err(DbError::from)?;

        Ok(())
    }

    async fn delete(&self, id: Uuid) -> FolioResult<()> {
        // Hard delete: the subdomain becomes claimable again.
        self.db
            .query("DELETE type::record('organization', $id)")
            .bind(("id", id.to_string()))
            .await
            .map_err(DbError::from)?;

        Ok(())
    }

    async fn list(&self, pagination: Pagination) -> FolioResult<PaginatedResult<Organization>> {
        let mut count_result = self
            .db
            .query(
                "SELECT count() AS total FROM organization \
                 WHERE is_active = true GROUP ALL",
            )
            .await
            .map_err(DbError::from)?;
        let count_rows: Vec<CountRow> = count_result.take(0).map_err(DbError::from)?;
        let total = count_rows.first().map(|r| r.total).unwrap_or(0);

        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM organization \
                 WHERE is_active = true \
                 ORDER BY created_at ASC \
                 LIMIT $limit START $offset",
            )
            .bind(("limit", pagination.limit))
            .bind(("offset", pagination.offset))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<OrganizationRowWithId> = result.take(0).map_err(DbError::from)?;

        let items = rows
            .into_iter()
            .map(|row| row.try_into_organization())
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(PaginatedResult {
            items,
            total,
            offset: pagination.offset,
            limit: pagination.limit,
        })
    }
}
