//! Row mapping traits

use crate::error::{SqlError, SqlResult};
use tokio_postgres::Row;

/// Maps a database row into a typed value.
///
/// # Example
///
/// ```ignore
/// use savour_sql::{FromRow, RowExt, SqlResult};
///
/// struct Occasion {
///     id: i32,
///     name: String,
/// }
///
/// impl FromRow for Occasion {
///     fn from_row(row: &tokio_postgres::Row) -> SqlResult<Self> {
///         Ok(Self {
///             id: row.try_get_column("id")?,
///             name: row.try_get_column("name")?,
///         })
///     }
/// }
/// ```
pub trait FromRow: Sized {
    /// Convert a database row into Self
    fn from_row(row: &Row) -> SqlResult<Self>;
}

/// Extension trait for Row to provide typed access
pub trait RowExt {
    /// Try to get a column value, returning SqlError::Decode on failure
    fn try_get_column<T>(&self, column: &str) -> SqlResult<T>
    where
        T: for<'a> tokio_postgres::types::FromSql<'a>;
}

impl RowExt for Row {
    fn try_get_column<T>(&self, column: &str) -> SqlResult<T>
    where
        T: for<'a> tokio_postgres::types::FromSql<'a>,
    {
        self.try_get(column)
            .map_err(|e| SqlError::decode(column, e.to_string()))
    }
}
