//! Versioned DDL for the todos database.
//!
//! Migrations are applied in order at open time. The `"order"` column arrived
//! after the first deployment, so it lives in its own migration rather than
//! the initial CREATE TABLE.

use rusqlite::Connection;

use crate::error::StoreError;

pub const SCHEMA_VERSION: u32 = 2;

pub const PRAGMAS: &str = r#"
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;
PRAGMA busy_timeout = 5000;
PRAGMA synchronous = NORMAL;
"#;

/// Migration steps; index i upgrades a database at version i to version i+1.
const MIGRATIONS: &[&str] = &[
    // v1: initial table
    r#"
    CREATE TABLE todos (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT,
        completed INTEGER NOT NULL DEFAULT 0
    );
    "#,
    // v2: explicit order key
    r#"ALTER TABLE todos ADD COLUMN "order" INTEGER NOT NULL DEFAULT 0;"#,
];

/// Bring the database up to `SCHEMA_VERSION`, creating the version table if
/// this is a fresh file. Each migration commits its version bump atomically.
pub fn migrate(conn: &Connection) -> Result<(), StoreError> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS schema_version (version INTEGER NOT NULL)",
        [],
    )?;

    let version: u32 = conn
        .query_row("SELECT version FROM schema_version LIMIT 1", [], |row| {
            row.get(0)
        })
        .unwrap_or(0);

    if version == 0 {
        conn.execute("INSERT INTO schema_version (version) VALUES (0)", [])?;
    }

    for (i, step) in MIGRATIONS.iter().enumerate() {
        let target = (i + 1) as u32;
        if version >= target {
            continue;
        }
        let tx = conn.unchecked_transaction()?;
        tx.execute_batch(step)?;
        tx.execute("UPDATE schema_version SET version = ?1", [target])?;
        tx.commit()?;
    }

    Ok(())
}
