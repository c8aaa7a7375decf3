use super::query::BuiltQuery;
use super::where_builder::WhereBuilder;
use crate::error::{SqlError, SqlResult};
use crate::ident::{validate_ident, validate_idents};
use crate::registry::{MatchMode, SchemaRegistry};
use crate::value::{ColumnValues, SqlValue};

/// UPDATE builder for a writable table.
///
/// Each SET column uses its strict operator. An optional filter becomes a
/// strict WHERE numbered after the SET parameters.
#[derive(Debug, Clone)]
pub struct UpdateBuilder<'a> {
    registry: &'a SchemaRegistry,
    table: String,
    set_values: ColumnValues,
    filter: ColumnValues,
    returning: Vec<String>,
}

impl<'a> UpdateBuilder<'a> {
    pub fn new(registry: &'a SchemaRegistry, table: &str) -> Self {
        Self {
            registry,
            table: table.to_string(),
            set_values: ColumnValues::new(),
            filter: ColumnValues::new(),
            returning: Vec::new(),
        }
    }

    /// Set a column.
    pub fn set(mut self, column: &str, value: impl Into<SqlValue>) -> Self {
        self.set_values.push(column, value);
        self
    }

    /// Append every pair of `values` to SET.
    pub fn values(mut self, values: ColumnValues) -> Self {
        for (col, value) in values {
            self.set_values.push(col, value);
        }
        self
    }

    /// Add an exact-match WHERE condition.
    pub fn and_eq(mut self, column: &str, value: impl Into<SqlValue>) -> Self {
        self.filter.push(column, value);
        self
    }

    pub fn returning<S: AsRef<str>>(mut self, cols: &[S]) -> Self {
        self.returning = cols.iter().map(|c| c.as_ref().to_string()).collect();
        self
    }

    pub fn build(&self) -> SqlResult<BuiltQuery> {
        self.registry.ensure_writable(&self.table)?;
        if self.set_values.is_empty() {
            return Err(SqlError::invalid_argument(format!(
                "UPDATE {} requires at least one column",
                self.table
            )));
        }
        validate_idents(&self.returning)?;

        let mut assignments = Vec::with_capacity(self.set_values.len());
        let mut params = Vec::with_capacity(self.set_values.len());
        for (idx, (column, value)) in self.set_values.iter().enumerate() {
            validate_ident(column)?;
            let op = self.registry.operator(column, MatchMode::Strict)?;
            assignments.push(format!("{} {} ${}", column, op.as_sql(), idx + 1));
            params.push(self.registry.bind(column, value, MatchMode::Strict)?);
        }

        let mut sql = format!("UPDATE {} SET {}", self.table, assignments.join(", "));

        let tail = WhereBuilder::starting_at(self.registry, params.len() + 1)?
            .mode(MatchMode::Strict)
            .returning(&self.returning)
            .build(&self.filter)?;
        if !tail.is_empty() {
            sql.push(' ');
            sql.push_str(&tail.sql);
            params.extend(tail.params);
        }

        Ok(BuiltQuery::new(sql, params))
    }
}
