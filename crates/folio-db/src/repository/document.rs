//! SurrealDB implementation of [`DocumentRepository`].

use chrono::{DateTime, Utc};
use folio_core::error::FolioResult;
use folio_core::models::document::{Document, DocumentStatus, NewDocument};
use folio_core::repository::{DocumentFilter, DocumentRepository, PaginatedResult, Pagination};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use crate::error::DbError;

/// DB-side row struct for queries where the UUID is already known.
#[derive(Debug, SurrealValue)]
struct DocumentRow {
    title: String,
    description: Option<String>,
    content: String,
    status: String,
    slug: Option<String>,
    is_public: bool,
    views: u64,
    published_at: Option<DateTime<Utc>>,
    author_id: String,
    organization_id: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// DB-side row struct that includes the record ID via `meta::id(id)`.
#[derive(Debug, SurrealValue)]
struct DocumentRowWithId {
    record_id: String,
    title: String,
    description: Option<String>,
    content: String,
    status: String,
    slug: Option<String>,
    is_public: bool,
    views: u64,
    published_at: Option<DateTime<Utc>>,
    author_id: String,
    organization_id: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

fn parse_status(s: &str) -> Result<DocumentStatus, DbError> {
    match s {
        "Draft" => Ok(DocumentStatus::Draft),
        "Published" => Ok(DocumentStatus::Published),
        "Archived" => Ok(DocumentStatus::Archived),
        other => Err(DbError::Migration(format!(
            "unknown document status: {other}"
        ))),
    }
}

fn status_str(status: DocumentStatus) -> &'static str {
    match status {
        DocumentStatus::Draft => "Draft",
        DocumentStatus::Published => "Published",
        DocumentStatus::Archived => "Archived",
    }
}

impl DocumentRow {
    fn into_document(self, id: Uuid) -> Result<Document, DbError> {
        let author_id = Uuid::parse_str(&self.author_id)
            .map_err(|e| DbError::Migration(format!("invalid author UUID: {e}")))?;
        let organization_id = self
            .organization_id
            .map(|s| {
                Uuid::parse_str(&s)
                    .map_err(|e| DbError::Migration(format!("invalid organization UUID: {e}")))
            })
            .transpose()?;
        Ok(Document {
            id,
            title: self.title,
            description: self.description,
            content: self.content,
            status: parse_status(&self.status)?,
            slug: self.slug,
            is_public: self.is_public,
            views: self.views,
            published_at: self.published_at,
            author_id,
            organization_id,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

impl DocumentRowWithId {
    fn try_into_document(self) -> Result<Document, DbError> {
        let id = Uuid::parse_str(&self.record_id)
            .map_err(|e| DbError::Migration(format!("invalid UUID: {e}")))?;
        let row = DocumentRow {
            title: self.title,
            description: self.description,
            content: self.content,
            status: self.status,
            slug: self.slug,
            is_public: self.is_public,
            views: self.views,
            published_at: self.published_at,
            author_id: self.author_id,
            organization_id: self.organization_id,
            created_at: self.created_at,
            updated_at: self.updated_at,
        };
        row.into_document(id)
    }
}

/// Row struct for count queries.
#[derive(Debug, SurrealValue)]
struct CountRow {
    total: u64,
}

/// SurrealDB implementation of the Document repository.
#[derive(Clone)]
pub struct SurrealDocumentRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealDocumentRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> DocumentRepository for SurrealDocumentRepository<C> {
    async fn create(&self, input: NewDocument) -> FolioResult<Document> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();

        let result = self
            .db
            .query(
                "CREATE type::record('document', $id) SET \
                 title = $title, description = $description, \
                 content = $content, status = $status, \
                 slug = $slug, is_public = $is_public, \
                 views = 0, published_at = NONE, \
                 author_id = $author_id, \
                 organization_id = $organization_id",
            )
            .bind(("id", id_str.clone()))
            .bind(("title", input.title))
            .bind(("description", input.description))
            .bind(("content", input.content))
            .bind(("status", status_str(input.status).to_string()))
            .bind(("slug", input.slug))
            .bind(("is_public", input.is_public))
            .bind(("author_id", input.author_id.to_string()))
            .bind((
                "organization_id",
                input.organization_id.map(|v| v.to_string()),
            ))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(|e| DbError::Migration(e.to_string()))?;

        let rows: Vec<DocumentRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "document".into(),
            id: id_str,
        })?;

        Ok(row.into_document(id)?)
    }

    async fn get_by_id(&self, id: Uuid) -> FolioResult<Document> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query("SELECT * FROM type::record('document', $id)")
            .bind(("id", id_str.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<DocumentRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "document".into(),
            id: id_str,
        })?;

        Ok(row.into_document(id)?)
    }

    async fn get_by_slug(&self, slug: &str) -> FolioResult<Document> {
        let slug_owned = slug.to_string();

        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM document \
                 WHERE slug = $slug",
            )
            .bind(("slug", slug_owned))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<DocumentRowWithId> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "document".into(),
            id: format!("slug={slug}"),
        })?;

        Ok(row.try_into_document()?)
    }

    async fn save(&self, document: &Document) -> FolioResult<()> {
        let id_str = document.id.to_string();

        let mut result = self
            .db
            .query(
                "UPDATE type::record('document', $id) SET \
                 title = $title, description = $description, \
                 content = $content, status = $status, \
                 slug = $slug, is_public = $is_public, \
                 published_at = $published_at, \
                 updated_at = time::now()",
            )
            .bind(("id", id_str.clone()))
            .bind(("title", document.title.clone()))
            .bind(("description", document.description.clone()))
            .bind(("content", document.content.clone()))
            .bind(("status", status_str(document.status).to_string()))
            .bind(("slug", document.slug.clone()))
            .bind(("is_public", document.is_public))
            .bind(("published_at", document.published_at))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<DocumentRow> = result.take(0).map_err(DbError::from)?;
        if rows.is_empty() {
            return Err(DbError::NotFound {
                entity: "document".into(),
                id: id_str,
            }
            .into());
        }

        Ok(())
    }

    async fn delete(&self, id: Uuid) -> FolioResult<()> {
        self.db
            .query("DELETE type::record('document', $id)")
            .bind(("id", id.to_string()))
            .await
            .map_err(DbError::from)?;

        Ok(())
    }

    async fn record_view(&self, id: Uuid) -> FolioResult<()> {
        // Single-statement increment; concurrent readers cannot lose
        // updates the way a read-modify-write round trip would.
        let id_str = id.to_string();

        let mut result = self
            .db
            .query("UPDATE type::record('document', $id) SET views += 1")
            .bind(("id", id_str.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<DocumentRow> = result.take(0).map_err(DbError::from)?;
        if rows.is_empty() {
            return Err(DbError::NotFound {
                entity: "document".into(),
                id: id_str,
            }
            .into());
        }

        Ok(())
    }

    async fn list(
        &self,
        filter: DocumentFilter,
        pagination: Pagination,
    ) -> FolioResult<PaginatedResult<Document>> {
        let restriction = if filter.visible_to.is_some() {
            "WHERE author_id = $viewer \
             OR (is_public = true AND status = 'Published') "
        } else {
            ""
        };

        let count_query =
            format!("SELECT count() AS total FROM document {restriction}GROUP ALL");
        let mut count_builder = self.db.query(&count_query);
        if let Some(viewer) = filter.visible_to {
            count_builder = count_builder.bind(("viewer", viewer.to_string()));
        }
        let mut count_result = count_builder.await.map_err(DbError::from)?;
        let count_rows: Vec<CountRow> = count_result.take(0).map_err(DbError::from)?;
        let total = count_rows.first().map(|r| r.total).unwrap_or(0);

        let query = format!(
            "SELECT meta::id(id) AS record_id, * FROM document \
             {restriction}\
             ORDER BY updated_at DESC \
             LIMIT $limit START $offset"
        );
        let mut builder = self.db.query(&query);
        if let Some(viewer) = filter.visible_to {
            builder = builder.bind(("viewer", viewer.to_string()));
        }
        let mut result = builder
            .bind(("limit", pagination.limit))
            .bind(("offset", pagination.offset))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<DocumentRowWithId> = result.take(0).map_err(DbError::from)?;

        let items = rows
            .into_iter()
            .map(|row| row.try_into_document())
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(PaginatedResult {
            items,
            total,
            offset: pagination.offset,
            limit: pagination.limit,
        })
    }

    async fn list_by_author(
        &self,
        author_id: Uuid,
        pagination: Pagination,
    ) -> FolioResult<PaginatedResult<Document>> {
        let author_str = author_id.to_string();

        let mut count_result = self
            .db
            .query(
                "SELECT count() AS total FROM document \
                 WHERE author_id = $author_id GROUP ALL",
            )
            .bind(("author_id", author_str.clone()))
            .await
            .map_err(DbError::from)?;
        let count_rows: Vec<CountRow> = count_result.take(0).map_err(DbError::from)?;
        let total = count_rows.first().map(|r| r.total).unwrap_or(0);

        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM document \
                 WHERE author_id = $author_id \
                 ORDER BY updated_at DESC \
                 LIMIT $limit START $offset",
            )
            .bind(("author_id", author_str))
            .bind(("limit", pagination.limit))
            .bind(("offset", pagination.offset))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<DocumentRowWithId> = result.take(0).map_err(DbError::from)?;

        let items = rows
            .into_iter()
            .map(|row| row.try_into_document())
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(PaginatedResult {
            items,
            total,
            offset: pagination.offset,
            limit: pagination.limit,
        })
    }

    async fn list_by_organization(&self, organization_id: Uuid) -> FolioResult<Vec<Document>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM document \
                 WHERE organization_id = $organization_id \
                 ORDER BY updated_at DESC",
            )
            .bind(("organization_id", organization_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<DocumentRowWithId> = result.take(0).map_err(DbError::from)?;

        Ok(rows
            .into_iter()
            .map(|row| row.try_into_document())
            .collect::<Result<Vec<_>, DbError>>()?)
    }
}
