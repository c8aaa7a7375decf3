use super::where_builder::BuiltClause;
use crate::error::{SqlError, SqlResult};
use crate::value::SqlValue;

/// A complete statement and its bound parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuiltQuery {
    sql: String,
    params: Vec<SqlValue>,
}

impl BuiltQuery {
    pub fn new(sql: impl Into<String>, params: Vec<SqlValue>) -> Self {
        Self {
            sql: sql.into(),
            params,
        }
    }

    pub fn sql(&self) -> &str {
        &self.sql
    }

    pub fn params(&self) -> &[SqlValue] {
        &self.params
    }

    pub fn into_parts(self) -> (String, Vec<SqlValue>) {
        (self.sql, self.params)
    }
}

/// Space-joins SELECT fragments, skipping empty ones.
///
/// ```rust
/// use savour_sql::builder::SelectStatement;
///
/// let q = SelectStatement::new("SELECT r.name FROM recipes r")
///     .push("")
///     .push("ORDER BY r.name")
///     .build();
/// assert_eq!(q.sql(), "SELECT r.name FROM recipes r ORDER BY r.name");
/// ```
#[derive(Debug, Clone, Default)]
pub struct SelectStatement {
    parts: Vec<String>,
    params: Vec<SqlValue>,
}

impl SelectStatement {
    pub fn new(select: impl Into<String>) -> Self {
        let mut stmt = Self::default();
        stmt.parts.push(select.into());
        stmt
    }

    /// Append a parameterless fragment (join list, ORDER BY, GROUP BY ...).
    pub fn push(mut self, fragment: impl Into<String>) -> Self {
        let fragment = fragment.into();
        if !fragment.trim().is_empty() {
            self.parts.push(fragment);
        }
        self
    }

    /// Append a WHERE clause. Its numbering must continue from the
    /// parameters already collected.
    pub fn filter(mut self, clause: BuiltClause) -> SqlResult<Self> {
        if clause.is_empty() {
            return Ok(self);
        }
        let expected = self.next_index();
        if !clause.params.is_empty() && clause.start != expected {
            return Err(SqlError::invalid_argument(format!(
                "where clause starts at ${} but next placeholder is ${}",
                clause.start, expected
            )));
        }
        self.parts.push(clause.sql);
        self.params.extend(clause.params);
        Ok(self)
    }

    /// Index the next appended placeholder should use.
    pub fn next_index(&self) -> usize {
        self.params.len() + 1
    }

    pub fn build(self) -> BuiltQuery {
        BuiltQuery::new(self.parts.join(" "), self.params)
    }
}
