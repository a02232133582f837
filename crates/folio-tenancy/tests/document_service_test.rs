//! Integration tests for the document service backed by in-memory
//! SurrealDB.

use chrono::Utc;
use folio_core::error::FolioError;
use folio_core::models::document::{CreateDocument, DocumentStatus, UpdateDocument};
use folio_core::models::user::{GlobalRole, User};
use folio_core::repository::Pagination;
use folio_db::repository::SurrealDocumentRepository;
use folio_tenancy::DocumentService;
use surrealdb::Surreal;
use surrealdb::engine::local::{Db, Mem};
use uuid::Uuid;

async fn setup() -> DocumentService<SurrealDocumentRepository<Db>> {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    folio_db::run_migrations(&db).await.unwrap();
    DocumentService::new(SurrealDocumentRepository::new(db))
}

fn user(role: GlobalRole, organization_id: Option<Uuid>) -> User {
    User {
        id: Uuid::new_v4(),
        first_name: "Test".into(),
        last_name: "User".into(),
        email: format!("{}@example.com", Uuid::new_v4()),
        password_hash: String::new(),
        role,
        avatar: None,
        organization_id,
        is_active: true,
        last_login_at: None,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

fn new_document(title: &str) -> CreateDocument {
    CreateDocument {
        title: title.into(),
        description: None,
        content: "body".into(),
        status: None,
        is_public: None,
    }
}

#[tokio::test]
async fn create_derives_slug_and_inherits_organization() {
    let service = setup().await;
    let org_id = Uuid::new_v4();
    let author = user(GlobalRole::Editor, Some(org_id));

    let doc = service
        .create(&author, new_document("Getting Started, Fast!"))
        .await
        .unwrap();

    assert_eq!(doc.slug.as_deref(), Some("getting-started-fast"));
    assert_eq!(doc.status, DocumentStatus::Draft);
    assert!(!doc.is_public);
    assert_eq!(doc.author_id, author.id);
    assert_eq!(doc.organization_id, Some(org_id));
    assert!(doc.published_at.is_none());
}

#[tokio::test]
async fn drafts_are_invisible_to_strangers() {
    let service = setup().await;
    let author = user(GlobalRole::Editor, None);
    let stranger = user(GlobalRole::Viewer, None);
    let admin = user(GlobalRole::Admin, None);

    let doc = service.create(&author, new_document("Draft")).await.unwrap();

    // The author and any global admin can read their own draft.
    service.get(doc.id, Some(&author)).await.unwrap();
    service.get(doc.id, Some(&admin)).await.unwrap();

    assert!(matches!(
        service.get(doc.id, Some(&stranger)).await,
        Err(FolioError::Forbidden { .. })
    ));
    assert!(matches!(
        service.get(doc.id, None).await,
        Err(FolioError::Forbidden { .. })
    ));
}

#[tokio::test]
async fn reads_of_published_documents_count_views() {
    let service = setup().await;
    let author = user(GlobalRole::Editor, None);

    let doc = service
        .create(
            &author,
            CreateDocument {
                status: Some(DocumentStatus::Published),
                is_public: Some(true),
                ..new_document("Popular")
            },
        )
        .await
        .unwrap();

    let first = service.get(doc.id, None).await.unwrap();
    assert_eq!(first.views, 1);
    let second = service.get(doc.id, None).await.unwrap();
    assert_eq!(second.views, 2);

    // Draft reads never count.
    let draft = service.create(&author, new_document("Quiet")).await.unwrap();
    let read = service.get(draft.id, Some(&author)).await.unwrap();
    assert_eq!(read.views, 0);
}

#[tokio::test]
async fn publishing_stamps_published_at_and_nothing_clears_it() {
    let service = setup().await;
    let author = user(GlobalRole::Editor, None);

    let doc = service.create(&author, new_document("Story")).await.unwrap();

    let published = service
        .update(
            doc.id,
            &author,
            UpdateDocument {
                status: Some(DocumentStatus::Published),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    let first_stamp = published.published_at.unwrap();

    // Unpublishing keeps the stamp.
    let archived = service
        .update(
            doc.id,
            &author,
            UpdateDocument {
                status: Some(DocumentStatus::Archived),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(archived.published_at, Some(first_stamp));

    // Re-publishing stamps again.
    let republished = service
        .update(
            doc.id,
            &author,
            UpdateDocument {
                status: Some(DocumentStatus::Published),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert!(republished.published_at.unwrap() >= first_stamp);
}

#[tokio::test]
async fn title_changes_rederive_the_slug() {
    let service = setup().await;
    let author = user(GlobalRole::Editor, None);

    let doc = service
        .create(&author, new_document("Old Title"))
        .await
        .unwrap();
    let updated = service
        .update(
            doc.id,
            &author,
            UpdateDocument {
                title: Some("Brand New Title".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.title, "Brand New Title");
    assert_eq!(updated.slug.as_deref(), Some("brand-new-title"));
}

#[tokio::test]
async fn edit_rights_follow_author_admin_and_org_editors() {
    let service = setup().await;
    let org_id = Uuid::new_v4();
    let author = user(GlobalRole::Editor, Some(org_id));
    let org_editor = user(GlobalRole::Editor, Some(org_id));
    let other_org_editor = user(GlobalRole::Editor, Some(Uuid::new_v4()));
    let org_viewer = user(GlobalRole::Viewer, Some(org_id));
    let admin = user(GlobalRole::Admin, None);

    let doc = service.create(&author, new_document("Shared")).await.unwrap();

    let patch = || UpdateDocument {
        content: Some("edited".into()),
        ..Default::default()
    };

    service.update(doc.id, &author, patch()).await.unwrap();
    service.update(doc.id, &admin, patch()).await.unwrap();
    service.update(doc.id, &org_editor, patch()).await.unwrap();

    assert!(matches!(
        service.update(doc.id, &other_org_editor, patch()).await,
        Err(FolioError::Forbidden { .. })
    ));
    assert!(matches!(
        service.update(doc.id, &org_viewer, patch()).await,
        Err(FolioError::Forbidden { .. })
    ));
}

#[tokio::test]
async fn delete_requires_edit_rights_and_is_permanent() {
    let service = setup().await;
    let author = user(GlobalRole::Editor, None);
    let stranger = user(GlobalRole::Editor, None);

    let doc = service.create(&author, new_document("Doomed")).await.unwrap();

    assert!(matches!(
        service.delete(doc.id, &stranger).await,
        Err(FolioError::Forbidden { .. })
    ));

    service.delete(doc.id, &author).await.unwrap();
    assert!(matches!(
        service.get(doc.id, Some(&author)).await,
        Err(FolioError::NotFound { .. })
    ));
}

#[tokio::test]
async fn listing_restricts_everyone_but_admins() {
    let service = setup().await;
    let author = user(GlobalRole::Editor, None);
    let other = user(GlobalRole::Editor, None);
    let admin = user(GlobalRole::Admin, None);

    service.create(&author, new_document("Mine")).await.unwrap();
    service.create(&other, new_document("Private draft")).await.unwrap();
    service
        .create(
            &other,
            CreateDocument {
                status: Some(DocumentStatus::Published),
                is_public: Some(true),
                ..new_document("Public")
            },
        )
        .await
        .unwrap();

    let for_author = service
        .list(Some(&author), Pagination::default())
        .await
        .unwrap();
    assert_eq!(for_author.total, 2);

    let for_admin = service
        .list(Some(&admin), Pagination::default())
        .await
        .unwrap();
    assert_eq!(for_admin.total, 3);
}
