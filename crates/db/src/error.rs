use boxiii_core::error::CoreError;

/// PostgreSQL SQLSTATE for unique constraint violations.
pub const UNIQUE_VIOLATION: &str = "23505";

/// Error returned by repository operations that enforce domain rules in
/// addition to running SQL.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error(transparent)]
    Database(#[from] sqlx::Error),

    #[error(transparent)]
    Core(#[from] CoreError),
}

impl StoreError {
    /// True for a unique-constraint violation, which callers may retry.
    pub fn is_unique_violation(&self) -> bool {
        match self {
            Self::Database(e) => is_unique_violation(e),
            Self::Core(_) => false,
        }
    }
}

/// True when `err` is a PostgreSQL unique-constraint violation.
pub fn is_unique_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .and_then(|db| db.code())
        .is_some_and(|code| code == UNIQUE_VIOLATION)
}
