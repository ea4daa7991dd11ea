use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API returned {status} for {url}")]
    Api {
        status: reqwest::StatusCode,
        url: String,
    },

    #[error("Malformed response from {url}: {reason}")]
    MalformedResponse { url: String, reason: String },

    #[error("Failed to access {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid JSON in {}: {source}", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Raw {record} record is missing '{field}'")]
    MissingField {
        record: &'static str,
        field: &'static str,
    },

    #[error("Invalid database name '{0}'")]
    InvalidDatabaseName(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

impl AppError {
    /// True when the database rejected a row because a referenced employer is missing.
    pub fn is_foreign_key_violation(&self) -> bool {
        matches!(
            self,
            AppError::Database(sqlx::Error::Database(db_err)) if db_err.is_foreign_key_violation()
        )
    }

    /// True when the database rejected a duplicate key or employer name.
    pub fn is_unique_violation(&self) -> bool {
        matches!(
            self,
            AppError::Database(sqlx::Error::Database(db_err)) if db_err.is_unique_violation()
        )
    }
}
