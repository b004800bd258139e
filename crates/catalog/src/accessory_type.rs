//! Accessory types (cases, chargers, cables, ...).

use serde::{Deserialize, Serialize};

use gearbook_core::{DeleteVerb, Entity, GateScope, ListEnvelope, RecordId, Resource, ResourceKind};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessoryType {
    pub id: RecordId,
    #[serde(rename = "tipo_accesorio")]
    pub name: String,
}

impl Entity for AccessoryType {
    fn id(&self) -> RecordId {
        self.id
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AccessoryTypeFields {
    #[serde(rename = "tipo_accesorio")]
    pub name: String,
}

impl AccessoryTypeFields {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

#[derive(Debug, Copy, Clone)]
pub struct AccessoryTypes;

impl Resource for AccessoryTypes {
    type Record = AccessoryType;
    type Fields = AccessoryTypeFields;

    const KIND: ResourceKind = ResourceKind {
        name: "accessory-type",
        label: "Accessory type",
        plural: "accessory types",
        list_path: "/accesorio_list",
        collection_path: "/accesorio",
        list_envelope: ListEnvelope::Keyed("accesorios"),
        delete_verb: DeleteVerb::Borrar,
        gate: GateScope::MutationsOnly,
    };

    fn form_values(record: &AccessoryType) -> AccessoryTypeFields {
        AccessoryTypeFields {
            name: record.name.clone(),
        }
    }
}
