//! Domain models for FOLIO.
//!
//! These are the core types shared across all crates.

pub mod document;
pub mod member;
pub mod organization;
pub mod user;
