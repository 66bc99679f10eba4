use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(String),

    /// SQLITE_BUSY — the reorder transaction retries these before giving up.
    #[error("database busy")]
    Busy,

    #[error("todo {0} not found")]
    NotFound(i64),

    #[error("{0}")]
    Validation(String),
}

impl From<rusqlite::Error> for StoreError {
    fn from(e: rusqlite::Error) -> Self {
        match &e {
            rusqlite::Error::SqliteFailure(err, _)
                if err.code == rusqlite::ErrorCode::DatabaseBusy =>
            {
                StoreError::Busy
            }
            _ => StoreError::Database(e.to_string()),
        }
    }
}

impl IntoResponse for StoreError {
    fn into_response(self) -> Response {
        let status = match &self {
            StoreError::NotFound(_) => StatusCode::NOT_FOUND,
            StoreError::Validation(_) => StatusCode::BAD_REQUEST,
            StoreError::Database(_) | StoreError::Busy => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn busy_code_maps_to_busy_variant() {
        let e = rusqlite::Error::SqliteFailure(
            rusqlite::ffi::Error::new(rusqlite::ffi::SQLITE_BUSY),
            None,
        );
        assert!(matches!(StoreError::from(e), StoreError::Busy));
    }

    #[test]
    fn other_codes_map_to_database_variant() {
        let e = rusqlite::Error::InvalidQuery;
        assert!(matches!(StoreError::from(e), StoreError::Database(_)));
    }
}
