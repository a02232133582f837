//! Public subdomain portal — the unauthenticated projection of an
//! organization's published content.

use folio_core::error::{FolioError, FolioResult};
use folio_core::models::document::PublicDocument;
use folio_core::models::organization::PublicOrganization;
use folio_core::repository::{DocumentRepository, OrganizationRepository};
use folio_core::subdomain::{HostScope, resolve_host};
use serde::Serialize;

/// Everything a tenant site renders: the reduced organization shape
/// plus its publicly visible documents.
#[derive(Debug, Clone, Serialize)]
pub struct PublicSite {
    pub organization: PublicOrganization,
    pub documents: Vec<PublicDocument>,
}

/// Public content projector.
pub struct PortalService<O: OrganizationRepository, D: DocumentRepository> {
    org_repo: O,
    doc_repo: D,
}

impl<O: OrganizationRepository, D: DocumentRepository> PortalService<O, D> {
    pub fn new(org_repo: O, doc_repo: D) -> Self {
        Self { org_repo, doc_repo }
    }

    /// Project the public site for a subdomain.
    ///
    /// Fails NotFound when the organization is absent, inactive, or
    /// not public — indistinguishably, so private tenants do not leak
    /// their existence. Documents are filtered on their own
    /// `is_public` flag independently of the organization-level gate.
    pub async fn public_site(&self, subdomain: &str) -> FolioResult<PublicSite> {
        let organization = self.org_repo.get_by_subdomain(subdomain).await?;

        if !organization.is_public {
            return Err(FolioError::not_found(
                "organization",
                format!("subdomain={subdomain}"),
            ));
        }

        let documents = self
            .doc_repo
            .list_by_organization(organization.id)
            .await?
            .iter()
            .filter(|doc| doc.is_public && doc.is_published())
            .map(PublicDocument::from)
            .collect();

        Ok(PublicSite {
            organization: PublicOrganization::from(&organization),
            documents,
        })
    }

    /// Project the site for an inbound host name. Hosts that resolve
    /// to the main domain have no tenant content to serve.
    pub async fn site_for_host(&self, host: &str) -> FolioResult<PublicSite> {
        match resolve_host(host) {
            HostScope::Tenant(slug) => self.public_site(&slug).await,
            HostScope::Main => Err(FolioError::not_found("organization", format!("host={host}"))),
        }
    }

    /// Single public document by slug within a tenant site.
    pub async fn document_by_slug(
        &self,
        subdomain: &str,
        slug: &str,
    ) -> FolioResult<(PublicOrganization, PublicDocument)> {
        let site = self.public_site(subdomain).await?;

        let document = site
            .documents
            .into_iter()
            .find(|doc| doc.slug.as_deref() == Some(slug))
            .ok_or_else(|| FolioError::not_found("document", format!("slug={slug}")))?;

        Ok((site.organization, document))
    }
}
