//! SQLite-backed todo store.
//!
//! # Design
//! A `TodoStore` wraps a single `rusqlite::Connection` behind a
//! `parking_lot::Mutex` (rusqlite connections are not `Sync`). Every
//! operation takes the store explicitly — there is no process-wide handle.
//!
//! All operations are single-row except `reorder`, which updates every
//! submitted row inside one transaction: either all order keys change or
//! none do. The store trusts caller-supplied order values and never
//! recomputes them; clients submit a dense `0..N-1` renumbering.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::Mutex;
use rusqlite::{params, Connection, OptionalExtension};
use tracing::{debug, info, instrument, warn};

use crate::error::StoreError;
use crate::schema;
use crate::types::{CreateTodo, ReorderEntry, Todo, UpdateTodo};

/// How many times a reorder transaction is retried on SQLITE_BUSY before the
/// error is surfaced. The whole transaction is retried, never a single row —
/// partial application would break the ordering invariant.
const REORDER_ATTEMPTS: u32 = 3;

/// Thread-safe handle to the todos database.
#[derive(Clone)]
pub struct TodoStore {
    conn: Arc<Mutex<Connection>>,
    path: PathBuf,
}

impl TodoStore {
    /// Open (or create) a database file and run pending migrations.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| StoreError::Database(format!("create dir: {e}")))?;
        }

        let conn = Connection::open(path)?;
        conn.execute_batch(schema::PRAGMAS)?;
        schema::migrate(&conn)?;

        info!(path = %path.display(), "todo store opened");

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
            path: path.to_owned(),
        })
    }

    /// Open an in-memory database, mostly for tests.
    pub fn in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(schema::PRAGMAS)?;
        schema::migrate(&conn)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
            path: PathBuf::from(":memory:"),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn with_conn<F, T>(&self, f: F) -> Result<T, StoreError>
    where
        F: FnOnce(&Connection) -> Result<T, StoreError>,
    {
        let conn = self.conn.lock();
        f(&conn)
    }

    /// Insert a new todo. The id is assigned by the database; `order`
    /// defaults to 0 when the caller did not compute one.
    #[instrument(skip(self, input), fields(name = %input.name))]
    pub fn create(&self, input: &CreateTodo) -> Result<Todo, StoreError> {
        if input.name.trim().is_empty() {
            return Err(StoreError::Validation("name must not be empty".into()));
        }

        self.with_conn(|conn| {
            conn.execute(
                r#"INSERT INTO todos (name, completed, "order") VALUES (?1, ?2, ?3)"#,
                params![input.name, input.completed, input.order],
            )?;
            let id = conn.last_insert_rowid();
            debug!(id, "todo created");

            Ok(Todo {
                id,
                name: input.name.clone(),
                completed: input.completed,
                order: input.order,
            })
        })
    }

    /// List todos sorted ascending by order key, optionally filtered by
    /// completion state. Ties on `order` fall back to insertion order.
    pub fn list(&self, completed: Option<bool>) -> Result<Vec<Todo>, StoreError> {
        self.with_conn(|conn| {
            let (sql, filter) = match completed {
                Some(c) => (
                    r#"SELECT id, name, completed, "order" FROM todos
                       WHERE completed = ?1 ORDER BY "order" ASC, id ASC"#,
                    Some(c),
                ),
                None => (
                    r#"SELECT id, name, completed, "order" FROM todos
                       ORDER BY "order" ASC, id ASC"#,
                    None,
                ),
            };

            let mut stmt = conn.prepare(sql)?;
            let rows = match filter {
                Some(c) => stmt.query_map(params![c], row_to_todo)?,
                None => stmt.query_map([], row_to_todo)?,
            };
            rows.collect::<Result<Vec<_>, _>>().map_err(StoreError::from)
        })
    }

    pub fn get(&self, id: i64) -> Result<Todo, StoreError> {
        self.with_conn(|conn| {
            conn.query_row(
                r#"SELECT id, name, completed, "order" FROM todos WHERE id = ?1"#,
                params![id],
                row_to_todo,
            )
            .optional()?
            .ok_or(StoreError::NotFound(id))
        })
    }

    /// Apply a partial patch: only fields present in `patch` change.
    #[instrument(skip(self, patch))]
    pub fn update(&self, id: i64, patch: &UpdateTodo) -> Result<Todo, StoreError> {
        self.with_conn(|conn| {
            let mut todo = conn
                .query_row(
                    r#"SELECT id, name, completed, "order" FROM todos WHERE id = ?1"#,
                    params![id],
                    row_to_todo,
                )
                .optional()?
                .ok_or(StoreError::NotFound(id))?;

            if let Some(name) = &patch.name {
                todo.name = name.clone();
            }
            if let Some(completed) = patch.completed {
                todo.completed = completed;
            }
            if let Some(order) = patch.order {
                todo.order = order;
            }

            conn.execute(
                r#"UPDATE todos SET name = ?1, completed = ?2, "order" = ?3 WHERE id = ?4"#,
                params![todo.name, todo.completed, todo.order, todo.id],
            )?;

            Ok(todo)
        })
    }

    /// Delete by id, reporting whether a row was actually removed.
    #[instrument(skip(self))]
    pub fn delete(&self, id: i64) -> Result<bool, StoreError> {
        self.with_conn(|conn| {
            let changed = conn.execute("DELETE FROM todos WHERE id = ?1", params![id])?;
            Ok(changed > 0)
        })
    }

    /// Bulk-reassign order keys inside one transaction, then return the full
    /// set freshly sorted.
    ///
    /// An entry naming an unknown id aborts the whole call: committing the
    /// rest would leave the list ordered by a renumbering the client computed
    /// against a stale snapshot. SQLITE_BUSY failures retry the entire
    /// transaction up to [`REORDER_ATTEMPTS`] times.
    #[instrument(skip(self, entries), fields(count = entries.len()))]
    pub fn reorder(&self, entries: &[ReorderEntry]) -> Result<Vec<Todo>, StoreError> {
        let mut attempt = 0;
        loop {
            attempt += 1;
            let result = self.with_conn(|conn| {
                let tx = conn.unchecked_transaction()?;
                for entry in entries {
                    let changed = tx.execute(
                        r#"UPDATE todos SET "order" = ?1 WHERE id = ?2"#,
                        params![entry.order, entry.id],
                    )?;
                    if changed == 0 {
                        return Err(StoreError::NotFound(entry.id));
                    }
                }
                tx.commit()?;
                Ok(())
            });

            match result {
                Ok(()) => return self.list(None),
                Err(StoreError::Busy) if attempt < REORDER_ATTEMPTS => {
                    warn!(attempt, "reorder transaction busy, retrying");
                    continue;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

fn row_to_todo(row: &rusqlite::Row<'_>) -> Result<Todo, rusqlite::Error> {
    Ok(Todo {
        id: row.get(0)?,
        name: row.get(1)?,
        completed: row.get(2)?,
        order: row.get(3)?,
    })
}
