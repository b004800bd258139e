//! Records whose only editable attribute is a name (`nombre` on the wire).

use serde::{Deserialize, Serialize};

use gearbook_core::{Entity, RecordId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedRecord {
    pub id: RecordId,
    #[serde(rename = "nombre")]
    pub name: String,
}

impl Entity for NamedRecord {
    fn id(&self) -> RecordId {
        self.id
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct NameFields {
    #[serde(rename = "nombre")]
    pub name: String,
}

impl NameFields {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl From<&NamedRecord> for NameFields {
    fn from(record: &NamedRecord) -> Self {
        Self {
            name: record.name.clone(),
        }
    }
}
