use serde::Serialize;
use serde_json::{json, Map, Value};

/// Search request body: optional `_source` selection plus one query clause.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchQuery {
    #[serde(rename = "_source", skip_serializing_if = "Option::is_none")]
    source: Option<Vec<String>>,
    query: Value,
}

/// Bounds for a `range` clause. Unset bounds are left out of the request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Range {
    pub gte: Option<Value>,
    pub lte: Option<Value>,
}

impl SearchQuery {
    /// `match` query on a single field.
    pub fn matching(field: &str, value: impl Into<Value>) -> Self {
        Self {
            source: None,
            query: json!({ "match": { field: value.into() } }),
        }
    }

    /// `range` query on a single field.
    pub fn range(field: &str, range: Range) -> Self {
        let mut bounds = Map::new();
        if let Some(gte) = range.gte {
            bounds.insert("gte".to_string(), gte);
        }
        if let Some(lte) = range.lte {
            bounds.insert("lte".to_string(), lte);
        }

        Self {
            source: None,
            query: json!({ "range": { field: bounds } }),
        }
    }

    pub fn calories_at_least(min: i64) -> Self {
        Self::range(
            "calories",
            Range {
                gte: Some(min.into()),
                lte: None,
            },
        )
    }

    /// Restrict the fields returned for each hit.
    pub fn with_source<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.source = Some(fields.into_iter().map(Into::into).collect());
        self
    }
}
