use super::query::BuiltQuery;
use crate::error::SqlResult;
use crate::ident::{validate_ident, validate_idents};
use crate::registry::SchemaRegistry;
use crate::value::{ColumnValues, SqlValue};

/// INSERT builder for a writable table.
///
/// Placeholders follow the order values were added.
#[derive(Debug, Clone)]
pub struct InsertBuilder<'a> {
    registry: &'a SchemaRegistry,
    table: String,
    values: ColumnValues,
    returning: Vec<String>,
}

impl<'a> InsertBuilder<'a> {
    pub fn new(registry: &'a SchemaRegistry, table: &str) -> Self {
        Self {
            registry,
            table: table.to_string(),
            values: ColumnValues::new(),
            returning: Vec::new(),
        }
    }

    /// Set a column value.
    pub fn set(mut self, column: &str, value: impl Into<SqlValue>) -> Self {
        self.values.push(column, value);
        self
    }

    /// Append every pair of `values`.
    pub fn values(mut self, values: ColumnValues) -> Self {
        for (col, value) in values {
            self.values.push(col, value);
        }
        self
    }

    pub fn returning<S: AsRef<str>>(mut self, cols: &[S]) -> Self {
        self.returning = cols.iter().map(|c| c.as_ref().to_string()).collect();
        self
    }

    pub fn build(&self) -> SqlResult<BuiltQuery> {
        self.registry.ensure_writable(&self.table)?;
        validate_idents(&self.returning)?;

        let mut columns = Vec::with_capacity(self.values.len());
        let mut placeholders = Vec::with_capacity(self.values.len());
        let mut params = Vec::with_capacity(self.values.len());
        for (idx, (column, value)) in self.values.iter().enumerate() {
            validate_ident(column)?;
            columns.push(column);
            placeholders.push(format!("${}", idx + 1));
            params.push(self.registry.bind_exact_if_known(column, value)?);
        }

        let mut sql = if columns.is_empty() {
            format!("INSERT INTO {} DEFAULT VALUES", self.table)
        } else {
            format!(
                "INSERT INTO {} ({}) VALUES ({})",
                self.table,
                columns.join(", "),
                placeholders.join(", ")
            )
        };

        if !self.returning.is_empty() {
            sql.push_str(" RETURNING ");
            sql.push_str(&self.returning.join(", "));
        }

        Ok(BuiltQuery::new(sql, params))
    }
}
