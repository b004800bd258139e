//! Brands.

use gearbook_core::{DeleteVerb, GateScope, ListEnvelope, Resource, ResourceKind};

use crate::named::{NameFields, NamedRecord};

#[derive(Debug, Copy, Clone)]
pub struct Brands;

impl Resource for Brands {
    type Record = NamedRecord;
    type Fields = NameFields;

    const KIND: ResourceKind = ResourceKind {
        name: "brand",
        label: "Brand",
        plural: "brands",
        list_path: "/marca_list",
        collection_path: "/marca",
        list_envelope: ListEnvelope::Keyed("marcas"),
        delete_verb: DeleteVerb::Delete,
        gate: GateScope::MutationsOnly,
    };

    fn form_values(record: &NamedRecord) -> NameFields {
        NameFields::from(record)
    }
}
