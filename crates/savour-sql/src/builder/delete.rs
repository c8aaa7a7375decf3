use super::query::BuiltQuery;
use super::where_builder::WhereBuilder;
use crate::error::{SqlError, SqlResult};
use crate::registry::{MatchMode, SchemaRegistry};
use crate::value::{ColumnValues, SqlValue};

/// DELETE builder for a writable table.
///
/// Conditions are exact-match and at least one is required.
#[derive(Debug, Clone)]
pub struct DeleteBuilder<'a> {
    registry: &'a SchemaRegistry,
    table: String,
    filter: ColumnValues,
    returning: Vec<String>,
}

impl<'a> DeleteBuilder<'a> {
    pub fn new(registry: &'a SchemaRegistry, table: &str) -> Self {
        Self {
            registry,
            table: table.to_string(),
            filter: ColumnValues::new(),
            returning: Vec::new(),
        }
    }

    /// Add an exact-match condition.
    pub fn and_eq(mut self, column: &str, value: impl Into<SqlValue>) -> Self {
        self.filter.push(column, value);
        self
    }

    /// Append every pair of `values` as conditions.
    pub fn filter(mut self, values: ColumnValues) -> Self {
        for (col, value) in values {
            self.filter.push(col, value);
        }
        self
    }

    pub fn returning<S: AsRef<str>>(mut self, cols: &[S]) -> Self {
        self.returning = cols.iter().map(|c| c.as_ref().to_string()).collect();
        self
    }

    pub fn build(&self) -> SqlResult<BuiltQuery> {
        self.registry.ensure_writable(&self.table)?;
        if self.filter.is_empty() {
            return Err(SqlError::invalid_argument(format!(
                "DELETE FROM {} requires a WHERE condition",
                self.table
            )));
        }

        let clause = WhereBuilder::new(self.registry)
            .mode(MatchMode::Strict)
            .returning(&self.returning)
            .build(&self.filter)?;
        let sql = format!("DELETE FROM {} {}", self.table, clause.sql);
        Ok(BuiltQuery::new(sql, clause.params))
    }
}
