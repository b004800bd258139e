//! Per-resource configuration data.
//!
//! The four managed catalogs differ only in wire details (paths, field names,
//! the delete verb, how the list is wrapped). Those differences live here as
//! data so a single generic client/manager can serve all of them.

use core::fmt::Debug;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::{DomainError, DomainResult, Entity, RecordId};

/// Path segment appended to `/{collection}/{id}/` for deletes.
///
/// The backend is not consistent here: some collections use `borrar`,
/// others `delete`.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum DeleteVerb {
    Borrar,
    Delete,
}

impl DeleteVerb {
    pub fn as_str(self) -> &'static str {
        match self {
            DeleteVerb::Borrar => "borrar",
            DeleteVerb::Delete => "delete",
        }
    }
}

/// Shape of a list response body.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ListEnvelope {
    /// The body is the JSON array itself.
    Bare,
    /// The array sits under the given key of a JSON object.
    Keyed(&'static str),
}

/// Which affordances of a catalog screen require the privileged flag.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum GateScope {
    /// Listing is open; create/edit/delete need privilege.
    MutationsOnly,
    /// The whole screen (list included) needs privilege.
    EntireScreen,
}

/// Static description of one managed resource kind.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ResourceKind {
    /// Stable machine name (`accessory-type`, `brand`, ...).
    pub name: &'static str,
    /// Human label, singular, capitalised ("Brand").
    pub label: &'static str,
    /// Human label, plural, lower case ("brands").
    pub plural: &'static str,
    /// GET path returning the list.
    pub list_path: &'static str,
    /// Collection path: POST target and prefix for `/{id}/...` routes.
    pub collection_path: &'static str,
    pub list_envelope: ListEnvelope,
    pub delete_verb: DeleteVerb,
    pub gate: GateScope,
}

impl ResourceKind {
    pub fn create_path(&self) -> String {
        self.collection_path.to_string()
    }

    pub fn update_path(&self, id: RecordId) -> String {
        format!("{}/{}/editar", self.collection_path, id)
    }

    pub fn delete_path(&self, id: RecordId) -> String {
        format!("{}/{}/{}", self.collection_path, id, self.delete_verb.as_str())
    }

    /// Lower-case singular label, for sentences.
    pub fn noun(&self) -> String {
        self.label.to_lowercase()
    }

    /// Look a kind up by its machine name within `kinds`.
    pub fn find(kinds: &[ResourceKind], name: &str) -> DomainResult<ResourceKind> {
        kinds
            .iter()
            .find(|k| k.name.eq_ignore_ascii_case(name))
            .copied()
            .ok_or_else(|| DomainError::unknown_resource(name))
    }
}

/// A managed resource: its record type, its editable field set and its wire
/// configuration.
///
/// Implemented by zero-sized marker types (one per catalog).
pub trait Resource: Send + Sync + 'static {
    /// Record as returned by the list endpoint.
    type Record: Entity + Serialize + DeserializeOwned + Clone + Debug + Send + Sync;

    /// Field set sent on create/update. `Default` is the empty form.
    type Fields: Serialize + DeserializeOwned + Default + Clone + PartialEq + Debug + Send + Sync;

    const KIND: ResourceKind;

    /// Pre-fill values for editing `record`.
    fn form_values(record: &Self::Record) -> Self::Fields;
}
