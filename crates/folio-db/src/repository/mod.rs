//! SurrealDB repository implementations.

mod document;
mod member;
mod organization;
mod user;

pub use document::SurrealDocumentRepository;
pub use member::SurrealMemberRepository;
pub use organization::SurrealOrganizationRepository;
pub use user::SurrealUserRepository;
