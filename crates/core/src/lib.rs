//! `gearbook-core`: shared building blocks for every managed catalog.
//!
//! This crate contains **pure** primitives (no HTTP, no storage): record
//! identity and the per-resource configuration data that the generic CRUD
//! machinery in `gearbook-client` is parameterized by.

pub mod entity;
pub mod error;
pub mod id;
pub mod resource;

pub use entity::Entity;
pub use error::{DomainError, DomainResult};
pub use id::RecordId;
pub use resource::{DeleteVerb, GateScope, ListEnvelope, Resource, ResourceKind};
