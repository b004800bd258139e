//! User accounts as a managed resource.
//!
//! User management is the one catalog whose list is itself privileged: the
//! whole screen is gated, not only its mutation controls.

use serde::{Deserialize, Serialize};

use gearbook_core::{DeleteVerb, Entity, GateScope, ListEnvelope, RecordId, Resource, ResourceKind};

/// A user account as listed by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: RecordId,
    pub username: String,
    #[serde(with = "admin_flag", default)]
    pub is_admin: bool,
}

impl Entity for User {
    fn id(&self) -> RecordId {
        self.id
    }
}

/// Editable user fields (create and update bodies).
#[derive(Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct UserFields {
    pub username: String,
    pub password: String,
    #[serde(with = "admin_flag", default)]
    pub is_admin: bool,
}

impl core::fmt::Debug for UserFields {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("UserFields")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("is_admin", &self.is_admin)
            .finish()
    }
}

/// Marker for the user catalog.
#[derive(Debug, Copy, Clone)]
pub struct Users;

impl Resource for Users {
    type Record = User;
    type Fields = UserFields;

    const KIND: ResourceKind = ResourceKind {
        name: "user",
        label: "User",
        plural: "users",
        list_path: "/users",
        collection_path: "/users",
        list_envelope: ListEnvelope::Bare,
        delete_verb: DeleteVerb::Borrar,
        gate: GateScope::EntireScreen,
    };

    /// The password is never part of a listed record, so it starts empty.
    fn form_values(record: &User) -> UserFields {
        UserFields {
            username: record.username.clone(),
            password: String::new(),
            is_admin: record.is_admin,
        }
    }
}

/// The backend transports the admin flag as `0`/`1`; booleans are accepted too.
mod admin_flag {
    use serde::{Deserialize, Deserializer, Serializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Bool(bool),
        Int(i64),
    }

    pub fn serialize<S: Serializer>(value: &bool, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(u8::from(*value))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
        Ok(match Raw::deserialize(deserializer)? {
            Raw::Bool(b) => b,
            Raw::Int(n) => n != 0,
        })
    }
}
