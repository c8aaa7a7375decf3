//! Error types for savour-sql

use thiserror::Error;

/// Result type alias for builder and data-access operations
pub type SqlResult<T> = Result<T, SqlError>;

/// Error types for statement building and database access
#[derive(Debug, Error)]
pub enum SqlError {
    /// A builder received input it cannot turn into well-formed SQL
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Table is not registered (or not writable for INSERT/UPDATE)
    #[error("Table name {0} doesn't exist!")]
    UnknownTable(String),

    /// Column has no registry policy or alias entry
    #[error("Unknown column: {0}")]
    UnknownColumn(String),

    /// Existence guard matched zero rows
    #[error("{0} not found!")]
    NotFound(String),

    /// The underlying store call failed
    #[error("Data access failure: {0}")]
    DataAccess(#[from] tokio_postgres::Error),

    /// Unique constraint violation
    #[error("Unique constraint violation: {0}")]
    UniqueViolation(String),

    /// Foreign key constraint violation
    #[error("Foreign key violation: {0}")]
    ForeignKeyViolation(String),

    /// Row decode/mapping error
    #[error("Decode error on column '{column}': {message}")]
    Decode { column: String, message: String },

    /// Database connection error
    #[error("Connection error: {0}")]
    Connection(String),

    /// Pool error
    #[cfg(feature = "pool")]
    #[error("Pool error: {0}")]
    Pool(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl SqlError {
    /// Create an invalid argument error
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    /// Create an unknown table error
    pub fn unknown_table(table: impl Into<String>) -> Self {
        Self::UnknownTable(table.into())
    }

    /// Create an unknown column error
    pub fn unknown_column(column: impl Into<String>) -> Self {
        Self::UnknownColumn(column.into())
    }

    /// Create a not found error for an entity label (e.g. `"recipe"`)
    pub fn not_found(entity: impl Into<String>) -> Self {
        Self::NotFound(entity.into())
    }

    /// Create a decode error for a specific column
    pub fn decode(column: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Decode {
            column: column.into(),
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Check if this is a not found error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// Check if this is an invalid argument error
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Self::InvalidArgument(_))
    }

    /// Check if this is an unknown table error
    pub fn is_unknown_table(&self) -> bool {
        matches!(self, Self::UnknownTable(_))
    }

    /// Check if this is an unknown column error
    pub fn is_unknown_column(&self) -> bool {
        matches!(self, Self::UnknownColumn(_))
    }

    /// Check if this is a unique violation error
    pub fn is_unique_violation(&self) -> bool {
        matches!(self, Self::UniqueViolation(_))
    }

    /// Parse a tokio_postgres error into a more specific SqlError
    pub fn from_db_error(err: tokio_postgres::Error) -> Self {
        if let Some(db_err) = err.as_db_error() {
            let constraint = db_err.constraint().unwrap_or("unknown");
            let message = db_err.message();

            match db_err.code().code() {
                "23505" => return Self::UniqueViolation(format!("{}: {}", constraint, message)),
                "23503" => {
                    return Self::ForeignKeyViolation(format!("{}: {}", constraint, message));
                }
                _ => {}
            }
        }
        Self::DataAccess(err)
    }
}

#[cfg(feature = "pool")]
impl From<deadpool_postgres::PoolError> for SqlError {
    fn from(err: deadpool_postgres::PoolError) -> Self {
        Self::Pool(err.to_string())
    }
}
