//! WHERE clause builder driven by the schema registry.

use crate::error::{SqlError, SqlResult};
use crate::ident::{validate_ident, validate_idents};
use crate::registry::{AliasMap, MatchMode, SchemaRegistry};
use crate::value::{ColumnValues, SqlValue};

/// A built WHERE (and optional RETURNING) fragment.
///
/// The Nth placeholder in `sql`, counting from `start`, binds `params[N - 1]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuiltClause {
    pub sql: String,
    pub params: Vec<SqlValue>,
    /// Index of the first placeholder.
    pub start: usize,
}

impl BuiltClause {
    /// No predicates and no RETURNING.
    pub fn is_empty(&self) -> bool {
        self.sql.is_empty()
    }

    /// Index the next placeholder after this clause would take.
    pub fn next_index(&self) -> usize {
        self.start + self.params.len()
    }
}

/// Builds `WHERE c1 <op> $p AND c2 <op> $p+1 ...` from ordered column values.
///
/// Operator and bound value for each column come from the registry: text
/// columns use `ILIKE` with `%value%` in loose mode and `=` with the raw value
/// in strict mode; numeric columns always use `=` with an integer.
#[derive(Debug, Clone)]
pub struct WhereBuilder<'a> {
    registry: &'a SchemaRegistry,
    start: usize,
    mode: MatchMode,
    aliases: Option<AliasMap<'a>>,
    returning: Vec<String>,
}

impl<'a> WhereBuilder<'a> {
    /// Builder whose first placeholder is `$1`, in loose mode.
    pub fn new(registry: &'a SchemaRegistry) -> Self {
        Self {
            registry,
            start: 1,
            mode: MatchMode::Loose,
            aliases: None,
            returning: Vec::new(),
        }
    }

    /// Builder whose first placeholder is `$start`.
    ///
    /// Used when the clause follows SET or other parameters in the same
    /// statement.
    pub fn starting_at(registry: &'a SchemaRegistry, start: usize) -> SqlResult<Self> {
        if start < 1 {
            return Err(SqlError::invalid_argument(
                "placeholder numbering starts at 1",
            ));
        }
        let mut builder = Self::new(registry);
        builder.start = start;
        Ok(builder)
    }

    pub fn mode(mut self, mode: MatchMode) -> Self {
        self.mode = mode;
        self
    }

    /// Shorthand for `mode(MatchMode::from_exact(exact_match))`.
    pub fn exact(self, exact_match: bool) -> Self {
        self.mode(MatchMode::from_exact(exact_match))
    }

    /// Qualify every column through `aliases` (e.g. `name` -> `r.name`).
    pub fn aliases(mut self, aliases: AliasMap<'a>) -> Self {
        self.aliases = Some(aliases);
        self
    }

    pub fn returning<S: AsRef<str>>(mut self, cols: &[S]) -> Self {
        self.returning = cols.iter().map(|c| c.as_ref().to_string()).collect();
        self
    }

    pub fn build(&self, values: &ColumnValues) -> SqlResult<BuiltClause> {
        validate_idents(&self.returning)?;

        let mut conditions = Vec::with_capacity(values.len());
        let mut params = Vec::with_capacity(values.len());
        let mut idx = self.start;

        for (column, value) in values.iter() {
            validate_ident(column)?;
            let op = self.registry.operator(column, self.mode)?;
            let qualified = match &self.aliases {
                Some(aliases) => aliases.qualify(column)?,
                None => column.to_string(),
            };
            params.push(self.registry.bind(column, value, self.mode)?);
            conditions.push(format!("{} {} ${}", qualified, op.as_sql(), idx));
            idx += 1;
        }

        let mut sql = String::new();
        if !conditions.is_empty() {
            sql.push_str("WHERE ");
            sql.push_str(&conditions.join(" AND "));
        }
        if !self.returning.is_empty() {
            if !sql.is_empty() {
                sql.push(' ');
            }
            sql.push_str("RETURNING ");
            sql.push_str(&self.returning.join(", "));
        }

        Ok(BuiltClause {
            sql,
            params,
            start: self.start,
        })
    }
}
