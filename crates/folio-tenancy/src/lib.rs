//! FOLIO Tenancy — the services that decide who may do what:
//! organization membership management, document lifecycle with
//! visibility enforcement, and the public subdomain portal.
//!
//! Every service is generic over the `folio-core` repository traits
//! and carries no database dependency of its own.

pub mod documents;
pub mod membership;
pub mod portal;

pub use documents::DocumentService;
pub use membership::MembershipService;
pub use portal::{PortalService, PublicSite};
