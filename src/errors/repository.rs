use redis::RedisError;
use sqlx::Error as SqlxError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RepositoryError {
    /// Postgres connection or query errors
    #[error("Database error: {0}")]
    Database(SqlxError),

    /// Redis connection or command errors
    #[error("Cache error: {0}")]
    Cache(#[from] RedisError),

    /// Key or row does not exist (never created, or expired)
    #[error("Record not found: {0}")]
    NotFound(String),

    /// Unique constraint violation
    #[error("Conflict error: {0}")]
    Conflict(String),

    /// Backend could not serve the request for any other reason
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

impl RepositoryError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

impl From<SqlxError> for RepositoryError {
    fn from(err: SqlxError) -> Self {
        match err {
            SqlxError::RowNotFound => Self::NotFound("Resource not found".to_string()),
            SqlxError::Database(db_err) => {
                // PostgreSQL unique violation
                if db_err.code().as_deref() == Some("23505") {
                    return Self::Conflict("Resource already exists".to_string());
                }
                Self::Database(SqlxError::Database(db_err))
            }
            _ => Self::Database(err),
        }
    }
}
