//! Wire and row types for the todo service.
//!
//! # Design
//! `completed` historically arrived from some clients as the string `"true"`
//! instead of a boolean. That coercion is handled here, at the parsing
//! boundary, so the store only ever sees a plain `bool`.

use serde::{Deserialize, Deserializer, Serialize};

/// A single todo row, serialized as-is on every endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Todo {
    pub id: i64,
    pub name: String,
    pub completed: bool,
    pub order: i64,
}

/// Request payload for creating a new todo.
///
/// `order` defaults to 0; clients that care about position compute
/// `max(existing) + 1` themselves before posting.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateTodo {
    pub name: String,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub order: i64,
}

/// Partial patch for an existing todo. Omitted fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateTodo {
    pub name: Option<String>,
    #[serde(default, deserialize_with = "completed_lenient")]
    pub completed: Option<bool>,
    pub order: Option<i64>,
}

/// One entry of a bulk reorder request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReorderEntry {
    pub id: i64,
    pub order: i64,
}

/// Accept `completed` as a boolean or as a string, normalizing the string
/// form to `s == "true"`. Any other string becomes `false`.
fn completed_lenient<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Bool(bool),
        Text(String),
    }

    Ok(Option::<Raw>::deserialize(deserializer)?.map(|raw| match raw {
        Raw::Bool(b) => b,
        Raw::Text(s) => s == "true",
    }))
}
