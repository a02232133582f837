//! Document visibility rules.
//!
//! Both predicates run on the global-role axis plus the user's single
//! direct organization reference. The per-organization membership
//! table is a separate authorization axis evaluated only by the
//! membership service; the two are not unified because their rules
//! differ.

use crate::models::document::Document;
use crate::models::user::{GlobalRole, User};

/// Whether a principal (or an anonymous caller) may read a document.
///
/// Rules in order, first match wins:
/// 1. public and published documents are readable by anyone;
/// 2. anonymous callers get nothing else;
/// 3. global admins read everything;
/// 4. authors read their own documents;
/// 5. members of the document's organization (by direct reference)
///    read organization documents.
pub fn can_access(document: &Document, principal: Option<&User>) -> bool {
    if document.is_public && document.is_published() {
        return true;
    }

    let Some(user) = principal else {
        return false;
    };

    if user.role == GlobalRole::Admin {
        return true;
    }

    if document.author_id == user.id {
        return true;
    }

    matches!(
        (document.organization_id, user.organization_id),
        (Some(doc_org), Some(user_org)) if doc_org == user_org
    )
}

/// Whether a principal may mutate a document.
///
/// Global admins, the author, and global-role editors attached to the
/// document's organization. Public/published status grants no write
/// access.
pub fn can_edit(document: &Document, user: &User) -> bool {
    if user.role == GlobalRole::Admin {
        return true;
    }

    if document.author_id == user.id {
        return true;
    }

    user.role == GlobalRole::Editor
        && matches!(
            (document.organization_id, user.organization_id),
            (Some(doc_org), Some(user_org)) if doc_org == user_org
        )
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use uuid::Uuid;

    use super::*;
    use crate::models::document::DocumentStatus;

    fn user(role: GlobalRole, organization_id: Option<Uuid>) -> User {
        User {
            id: Uuid::new_v4(),
            first_name: "Ada".into(),
            last_name: "Lovelace".into(),
            email: "ada@example.com".into(),
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

    fn document(
        author_id: Uuid,
        organization_id: Option<Uuid>,
        status: DocumentStatus,
        is_public: bool,
    ) -> Document {
        Document {
            id: Uuid::new_v4(),
            title: "Intro".into(),
            description: None,
            content: String::new(),
            status,
            slug: Some("intro".into()),
            is_public,
            views: 0,
            published_at: None,
            author_id,
            organization_id,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn public_published_is_readable_by_anyone() {
        let doc = document(Uuid::new_v4(), None, DocumentStatus::Published, true);
        assert!(can_access(&doc, None));
        assert!(can_access(&doc, Some(&user(GlobalRole::Viewer, None))));
    }

    #[test]
    fn public_draft_is_not_world_readable() {
        let doc = document(Uuid::new_v4(), None, DocumentStatus::Draft, true);
        assert!(!can_access(&doc, None));
    }

    #[test]
    fn private_draft_access_matrix() {
        let author = user(GlobalRole::Viewer, None);
        let doc = document(author.id, None, DocumentStatus::Draft, false);

        assert!(!can_access(&doc, None));
        assert!(!can_access(&doc, Some(&user(GlobalRole::Viewer, None))));
        assert!(can_access(&doc, Some(&author)));
        assert!(can_access(&doc, Some(&user(GlobalRole::Admin, None))));
    }

    #[test]
    fn direct_org_reference_grants_read() {
        let org = Uuid::new_v4();
        let doc = document(Uuid::new_v4(), Some(org), DocumentStatus::Draft, false);

        assert!(can_access(&doc, Some(&user(GlobalRole::Viewer, Some(org)))));
        assert!(!can_access(
            &doc,
            Some(&user(GlobalRole::Viewer, Some(Uuid::new_v4())))
        ));
        // A user with no organization never matches the org rule.
        assert!(!can_access(&doc, Some(&user(GlobalRole::Viewer, None))));
    }

    #[test]
    fn edit_requires_admin_author_or_org_editor() {
        let org = Uuid::new_v4();
        let author = user(GlobalRole::Viewer, None);
        let doc = document(author.id, Some(org), DocumentStatus::Published, true);

        assert!(can_edit(&doc, &user(GlobalRole::Admin, None)));
        assert!(can_edit(&doc, &author));
        assert!(can_edit(&doc, &user(GlobalRole::Editor, Some(org))));
        // Same org but only a viewer: read maybe, write no.
        assert!(!can_edit(&doc, &user(GlobalRole::Viewer, Some(org))));
        // Editor of a different org.
        assert!(!can_edit(&doc, &user(GlobalRole::Editor, Some(Uuid::new_v4()))));
    }

    #[test]
    fn org_less_document_is_not_editable_by_editors() {
        let doc = document(Uuid::new_v4(), None, DocumentStatus::Draft, false);
        assert!(!can_edit(&doc, &user(GlobalRole::Editor, Some(Uuid::new_v4()))));
    }
}
