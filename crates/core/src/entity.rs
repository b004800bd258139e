//! Entity trait: identity + continuity across edits.

use crate::RecordId;

/// A record the server owns and the client caches.
///
/// Identity is the server-assigned `id`; every other field may change through
/// an edit.
pub trait Entity {
    /// Returns the record identifier.
    fn id(&self) -> RecordId;
}
