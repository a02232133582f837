//! Document lifecycle with visibility enforcement.

use chrono::Utc;
use folio_core::error::{FolioError, FolioResult};
use folio_core::models::document::{
    CreateDocument, Document, DocumentStatus, NewDocument, UpdateDocument,
};
use folio_core::models::user::{GlobalRole, User};
use folio_core::repository::{DocumentFilter, DocumentRepository, PaginatedResult, Pagination};
use folio_core::slug::generate_slug;
use folio_core::visibility;
use tracing::info;
use uuid::Uuid;

/// Document service.
///
/// Every read path runs [`visibility::can_access`], every write path
/// [`visibility::can_edit`]; repositories stay permission-free.
pub struct DocumentService<D: DocumentRepository> {
    doc_repo: D,
}

impl<D: DocumentRepository> DocumentService<D> {
    pub fn new(doc_repo: D) -> Self {
        Self { doc_repo }
    }

    /// Create a document authored by `author`. The slug is derived
    /// from the title and the organization is inherited from the
    /// author's direct organization reference.
    pub async fn create(&self, author: &User, input: CreateDocument) -> FolioResult<Document> {
        let slug = generate_slug(&input.title);

        let document = self
            .doc_repo
            .create(NewDocument {
                slug: Some(slug),
                description: input.description,
                content: input.content,
                status: input.status.unwrap_or(DocumentStatus::Draft),
                is_public: input.is_public.unwrap_or(false),
                author_id: author.id,
                organization_id: author.organization_id,
                title: input.title,
            })
            .await?;

        info!(document_id = %document.id, author_id = %author.id, "Created document");
        Ok(document)
    }

    /// Fetch a document by id, enforcing read visibility. A read of a
    /// published document counts a view as a side effect.
    pub async fn get(&self, id: Uuid, principal: Option<&User>) -> FolioResult<Document> {
        let document = self.doc_repo.get_by_id(id).await?;
        self.authorize_read(document, principal).await
    }

    /// Fetch a document by slug. Slugs are not unique; the first
    /// matching row wins.
    pub async fn get_by_slug(&self, slug: &str, principal: Option<&User>) -> FolioResult<Document> {
        let document = self.doc_repo.get_by_slug(slug).await?;
        self.authorize_read(document, principal).await
    }

    /// Apply a patch. Title changes re-derive the slug; a status
    /// transition into `Published` stamps `published_at` each time it
    /// happens, and nothing ever clears the stamp.
    pub async fn update(
        &self,
        id: Uuid,
        user: &User,
        patch: UpdateDocument,
    ) -> FolioResult<Document> {
        let mut document = self.doc_repo.get_by_id(id).await?;

        if !visibility::can_edit(&document, user) {
            return Err(FolioError::forbidden("not allowed to edit this document"));
        }

        if let Some(title) = patch.title {
            document.slug = Some(generate_slug(&title));
            document.title = title;
        }
        if let Some(description) = patch.description {
            document.description = description;
        }
        if let Some(content) = patch.content {
            document.content = content;
        }
        if let Some(is_public) = patch.is_public {
            document.is_public = is_public;
        }
        if let Some(status) = patch.status {
            if status == DocumentStatus::Published && document.status != DocumentStatus::Published
            {
                document.published_at = Some(Utc::now());
            }
            document.status = status;
        }

        self.doc_repo.save(&document).await?;
        self.doc_repo.get_by_id(id).await
    }

    /// Delete a document. Edit rights are required; this is the one
    /// hard delete in the system.
    pub async fn delete(&self, id: Uuid, user: &User) -> FolioResult<()> {
        let document = self.doc_repo.get_by_id(id).await?;

        if !visibility::can_edit(&document, user) {
            return Err(FolioError::forbidden("not allowed to delete this document"));
        }

        self.doc_repo.delete(id).await?;
        info!(document_id = %id, "Deleted document");
        Ok(())
    }

    /// List documents. Global admins see everything; everyone else
    /// sees their own plus public published documents.
    pub async fn list(
        &self,
        principal: Option<&User>,
        pagination: Pagination,
    ) -> FolioResult<PaginatedResult<Document>> {
        let filter = match principal {
            Some(user) if user.role != GlobalRole::Admin => DocumentFilter {
                visible_to: Some(user.id),
            },
            _ => DocumentFilter::default(),
        };

        self.doc_repo.list(filter, pagination).await
    }

    /// List a user's own documents, newest first.
    pub async fn list_for_author(
        &self,
        author_id: Uuid,
        pagination: Pagination,
    ) -> FolioResult<PaginatedResult<Document>> {
        self.doc_repo.list_by_author(author_id, pagination).await
    }

    async fn authorize_read(
        &self,
        mut document: Document,
        principal: Option<&User>,
    ) -> FolioResult<Document> {
        if !visibility::can_access(&document, principal) {
            return Err(FolioError::forbidden("not allowed to read this document"));
        }

        if document.is_published() {
            // Atomic increment in the store; mirror it on the copy we
            // hand back so the caller sees the count they produced.
            self.doc_repo.record_view(document.id).await?;
            document.views += 1;
        }

        Ok(document)
    }
}
