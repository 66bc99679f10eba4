//! HTTP server for the ordered todo list, persisting items in SQLite.
//!
//! # Design
//! - `app(store)` returns the full `Router`, so integration tests drive it
//!   in-process with `tower::ServiceExt::oneshot` and the binary serves the
//!   same router over a `TcpListener`.
//! - The store handle is passed in explicitly rather than constructed behind
//!   the router, keeping the database an injectable dependency.
//! - `POST /todos/reorder` is the only multi-row operation; everything else
//!   is a single-row action mapped 1:1 onto a store call.

pub mod error;
pub mod routes;
pub mod schema;
pub mod store;
pub mod types;

use axum::routing::{get, post};
use axum::Router;
use tokio::net::TcpListener;

pub use error::StoreError;
pub use store::TodoStore;
pub use types::{CreateTodo, ReorderEntry, Todo, UpdateTodo};

use routes::AppState;

pub fn app(store: TodoStore) -> Router {
    let state = AppState::new(store);
    Router::new()
        .route("/todos", get(routes::list_todos).post(routes::create_todo))
        .route("/todos/reorder", post(routes::reorder_todos))
        .route(
            "/todos/{id}",
            get(routes::get_todo)
                .put(routes::update_todo)
                .delete(routes::delete_todo),
        )
        .route("/health", get(routes::health))
        .with_state(state)
}

pub async fn run(listener: TcpListener, store: TodoStore) -> Result<(), std::io::Error> {
    axum::serve(listener, app(store)).await
}
