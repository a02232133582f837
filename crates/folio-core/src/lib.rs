//! FOLIO Core — domain models, repository traits, and the pure
//! decision logic shared across all crates: document visibility,
//! subdomain resolution, and slug derivation.

pub mod error;
pub mod models;
pub mod repository;
pub mod slug;
pub mod subdomain;
pub mod visibility;

pub use error::{FolioError, FolioResult};
