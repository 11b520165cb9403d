use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::BTreeMap;

/// Field name to field type, as sent to the backend in `properties`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IndexMapping(BTreeMap<String, FieldType>);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum FieldType {
    Text,
    Keyword,
    Integer,
    Nested { properties: IndexMapping },
}

impl IndexMapping {
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    pub fn field(mut self, name: impl Into<String>, field_type: FieldType) -> Self {
        self.0.insert(name.into(), field_type);
        self
    }

    /// Schema for documents produced from [`crate::model::RecipeRecord`].
    pub fn recipes() -> Self {
        Self::new()
            .field("title", FieldType::Text)
            .field("submitter", FieldType::Text)
            .field("description", FieldType::Text)
            .field("calories", FieldType::Integer)
            .field(
                "ingredients",
                FieldType::Nested {
                    properties: Self::new().field("step", FieldType::Text),
                },
            )
    }

    pub fn get(&self, name: &str) -> Option<&FieldType> {
        self.0.get(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for IndexMapping {
    fn default() -> Self {
        Self::recipes()
    }
}

/// Body of the index creation request.
///
/// Unknown fields are rejected by the backend (`dynamic: strict`).
pub fn creation_body(
    doc_type: &str,
    shards: u32,
    replicas: u32,
    mapping: &IndexMapping,
) -> Value {
    json!({
        "settings": {
            "number_of_shards": shards,
            "number_of_replicas": replicas
        },
        "mappings": {
            doc_type: {
                "dynamic": "strict",
                "properties": mapping
            }
        }
    })
}
