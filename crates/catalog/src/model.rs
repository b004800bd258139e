//! Device models.

use gearbook_core::{DeleteVerb, GateScope, ListEnvelope, Resource, ResourceKind};

use crate::named::{NameFields, NamedRecord};

#[derive(Debug, Copy, Clone)]
pub struct Models;

impl Resource for Models {
    type Record = NamedRecord;
    type Fields = NameFields;

    const KIND: ResourceKind = ResourceKind {
        name: "model",
        label: "Model",
        plural: "models",
        list_path: "/modelo_list",
        collection_path: "/modelo",
        list_envelope: ListEnvelope::Keyed("modelos"),
        delete_verb: DeleteVerb::Delete,
        gate: GateScope::MutationsOnly,
    };

    fn form_values(record: &NamedRecord) -> NameFields {
        NameFields::from(record)
    }
}
