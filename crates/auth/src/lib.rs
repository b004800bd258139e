//! `gearbook-auth`: session and authorization boundary.
//!
//! This crate is intentionally decoupled from HTTP: it decodes session tokens,
//! persists the session to durable client-side storage and answers privilege
//! questions. The credential exchange itself lives in `gearbook-client`.

pub mod authorize;
pub mod claims;
pub mod session;
pub mod storage;
pub mod user;

pub use authorize::{AuthzError, Capability, authorize, can_mutate, can_view};
pub use claims::{Claims, DEFAULT_PRIVILEGE_CLAIM, MalformedTokenError, decode_claims, encode_claims};
pub use session::{Credentials, Session};
pub use storage::{FileStorage, InMemoryStorage, SessionStorage, StorageError};
pub use user::{User, UserFields, Users};
