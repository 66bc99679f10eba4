//! Domain DTOs for the todo API.
//!
//! # Design
//! These types mirror the server's schema but are defined independently, so
//! the client crate never links against Axum internals. Integration tests
//! catch any schema drift between the two crates.

use serde::{Deserialize, Serialize};

/// A single todo item returned by the API. `order` is the integer order key
/// that defines the canonical listing; ascending order is the display order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Todo {
    pub id: i64,
    pub name: String,
    pub completed: bool,
    pub order: i64,
}

/// Request payload for creating a new todo.
///
/// The server does not compute order keys; callers append by passing
/// [`crate::state::TodoList::next_order`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTodo {
    pub name: String,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub order: i64,
}

/// Request payload for updating an existing todo. Only the fields present in
/// the JSON are applied; omitted fields remain unchanged on the server.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateTodo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<i64>,
}

/// One entry of a bulk reorder request: the new order key for one id.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReorderEntry {
    pub id: i64,
    pub order: i64,
}
