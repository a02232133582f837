//! Schema definitions and migration runner for SurrealDB.
//!
//! All table definitions use SCHEMAFULL mode for data integrity.
//! UUIDs are stored as strings. Enums are stored as strings with
//! ASSERT constraints for validation.

use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use tracing::info;

use crate::error::DbError;

// -----------------------------------------------------------------------
// Migration tracking
// -----------------------------------------------------------------------

const MIGRATION_TABLE_DDL: &str = "\
DEFINE TABLE IF NOT EXISTS _migration SCHEMAFULL;
DEFINE FIELD IF NOT EXISTS version ON TABLE _migration TYPE int;
DEFINE FIELD IF NOT EXISTS name ON TABLE _migration TYPE string;
DEFINE FIELD IF NOT EXISTS applied_at ON TABLE _migration TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX IF NOT EXISTS idx_migration_version ON TABLE _migration \
    COLUMNS version UNIQUE;
";

#[derive(Debug, SurrealValue)]
struct MigrationRecord {
    version: u32,
    #[allow(dead_code)]
    name: String,
}

struct Migration {
    version: u32,
    name: &'static str,
    sql: &'static str,
}

static MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    name: "initial_schema",
    sql: SCHEMA_V1,
}];

// -----------------------------------------------------------------------
// Schema v1 — initial table definitions
// -----------------------------------------------------------------------

const SCHEMA_V1: &str = "\
-- =======================================================================
-- Users
-- =======================================================================
DEFINE TABLE user SCHEMAFULL;
DEFINE FIELD first_name ON TABLE user TYPE string;
DEFINE FIELD last_name ON TABLE user TYPE string;
DEFINE FIELD email ON TABLE user TYPE string;
DEFINE FIELD password_hash ON TABLE user TYPE string;
DEFINE FIELD role ON TABLE user TYPE string \
    ASSERT $value IN ['Admin', 'Editor', 'Viewer'];
DEFINE FIELD avatar ON TABLE user TYPE option<string>;
DEFINE FIELD organization_id ON TABLE user TYPE option<string>;
DEFINE FIELD is_active ON TABLE user TYPE bool DEFAULT true;
DEFINE FIELD last_login_at ON TABLE user TYPE option<datetime>;
DEFINE FIELD created_at ON TABLE user TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE user TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_user_email ON TABLE user COLUMNS email UNIQUE;

-- =======================================================================
-- Organizations
-- =======================================================================
DEFINE TABLE organization SCHEMAFULL;
DEFINE FIELD name ON TABLE organization TYPE string;
DEFINE FIELD subdomain ON TABLE organization TYPE string;
DEFINE FIELD custom_domain ON TABLE organization TYPE option<string>;
DEFINE FIELD description ON TABLE organization TYPE option<string>;
DEFINE FIELD website ON TABLE organization TYPE option<string>;
DEFINE FIELD logo ON TABLE organization TYPE option<string>;
DEFINE FIELD is_public ON TABLE organization TYPE bool DEFAULT true;
DEFINE FIELD is_active ON TABLE organization TYPE bool DEFAULT true;
DEFINE FIELD created_at ON TABLE organization TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE organization TYPE datetime \
    DEFAULT time::now();
-- Unique index makes the subdomain path race-safe even when two
-- concurrent creates both pass the application-level check.
DEFINE INDEX idx_organization_subdomain ON TABLE organization \
    COLUMNS subdomain UNIQUE;

-- =======================================================================
-- Organization members
-- =======================================================================
DEFINE TABLE organization_member SCHEMAFULL;
DEFINE FIELD user_id ON TABLE organization_member TYPE string;
DEFINE FIELD organization_id ON TABLE organization_member TYPE string;
DEFINE FIELD role ON TABLE organization_member TYPE string \
    ASSERT $value IN ['Owner', 'Admin', 'Editor', 'Viewer'];
DEFINE FIELD is_active ON TABLE organization_member TYPE bool \
    DEFAULT true;
DEFINE FIELD joined_at ON TABLE organization_member TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE organization_member TYPE datetime \
    DEFAULT time::now();
-- Deliberately not unique: the one-active-membership-per-pair rule is
-- an application-level check in the membership service. Soft-deleted
-- rows for the same pair coexist with one active row.
DEFINE INDEX idx_member_org_user ON TABLE organization_member \
    COLUMNS organization_id, user_id;

-- =======================================================================
-- Documents
-- =======================================================================
DEFINE TABLE document SCHEMAFULL;
DEFINE FIELD title ON TABLE document TYPE string;
DEFINE FIELD description ON TABLE document TYPE option<string>;
DEFINE FIELD content ON TABLE document TYPE string;
DEFINE FIELD status ON TABLE document TYPE string \
    ASSERT $value IN ['Draft', 'Published', 'Archived'];
DEFINE FIELD slug ON TABLE document TYPE option<string>;
DEFINE FIELD is_public ON TABLE document TYPE bool DEFAULT false;
DEFINE FIELD views ON TABLE document TYPE int DEFAULT 0;
DEFINE FIELD published_at ON TABLE document TYPE option<datetime>;
DEFINE FIELD author_id ON TABLE document TYPE string;
DEFINE FIELD organization_id ON TABLE document TYPE option<string>;
DEFINE FIELD created_at ON TABLE document TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE document TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_document_author ON TABLE document COLUMNS author_id;
DEFINE INDEX idx_document_org ON TABLE document \
    COLUMNS organization_id;
-- Slugs are derived from titles and may collide; no UNIQUE here.
DEFINE INDEX idx_document_slug ON TABLE document COLUMNS slug;
";

// -----------------------------------------------------------------------
// Public API
// -----------------------------------------------------------------------

/// Run all pending migrations against the given SurrealDB client.
///
/// Creates a `_migration` tracking table on first run, then applies
/// each migration whose version exceeds the current maximum.
/// All DEFINE statements are idempotent so re-running is safe.
pub async fn run_migrations<C: Connection>(db: &Surreal<C>) -> Result<(), DbError> {
    // Ensure migration tracking table exists (idempotent).
    db.query(MIGRATION_TABLE_DDL)
        .await?
        .check()
        .map_err(|e| DbError::Migration(e.to_string()))?;

    // Determine current schema version.
    let mut result = db
        .query("SELECT * FROM _migration ORDER BY version DESC LIMIT 1")
        .await?;
    let records: Vec<MigrationRecord> = result.take(0)?;
    let current_version = records.first().map(|m| m.version).unwrap_or(0);

    for migration in MIGRATIONS {
        if migration.version > current_version {
            info!(
                version = migration.version,
                name = migration.name,
                "Applying migration"
            );
            db.query(migration.sql).await?.check().map_err(|e| {
                DbError::Migration(format!(
                    "Migration v{} '{}' failed: {}",
                    migration.version, migration.name, e,
                ))
            })?;

            // Record the applied migration.
            db.query(
                "CREATE _migration SET version = $version, \
                 name = $name",
            )
            .bind(("version", migration.version))
            .bind(("name", migration.name))
            .await?
            .check()
            .map_err(|e| {
                DbError::Migration(format!(
                    "Failed to record migration v{}: {}",
                    migration.version, e,
                ))
            })?;

            info!(
                version = migration.version,
                "Migration applied successfully"
            );
        }
    }

    Ok(())
}

/// Returns the raw schema DDL for version 1.
///
/// Exposed for testing with in-memory SurrealDB instances that
/// bypass the migration runner.
pub fn schema_v1() -> &'static str {
    SCHEMA_V1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_v1_is_nonempty() {
        assert!(!SCHEMA_V1.is_empty());
    }

    #[test]
    fn migrations_are_ordered() {
        for window in MIGRATIONS.windows(2) {
            assert!(
                window[0].version < window[1].version,
                "Migrations must be in ascending version order"
            );
        }
    }

    #[test]
    fn schema_defines_all_core_tables() {
        for table in ["user", "organization", "organization_member", "document"] {
            assert!(
                SCHEMA_V1.contains(&format!("DEFINE TABLE {table} ")),
                "missing table definition: {table}"
            );
        }
    }
}
