//! Schema registry: static table/column metadata consulted by every builder.
//!
//! The registry is built once at startup and only read afterwards, so a shared
//! `&'static SchemaRegistry` is safe for unsynchronized concurrent use.
//!
//! # Example
//!
//! ```rust
//! use savour_sql::registry::{ColumnPolicy, MatchMode, Operator, SchemaRegistry, TableDescriptor};
//!
//! let registry = SchemaRegistry::new()
//!     .with_table(TableDescriptor::new("recipes", "r"))
//!     .with_column(ColumnPolicy::text("name"))
//!     .with_column(ColumnPolicy::numeric("id"))
//!     .with_writable("recipes");
//!
//! assert_eq!(registry.table("recipes").unwrap().qualified(), "recipes r");
//! assert_eq!(registry.operator("name", MatchMode::Loose).unwrap(), Operator::ContainsCaseInsensitive);
//! assert!(registry.is_numeric("id").unwrap());
//! ```

use crate::error::{SqlError, SqlResult};
use crate::value::SqlValue;
use std::collections::{HashMap, HashSet};
use std::fmt;

/// A registered table and its short alias.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableDescriptor {
    pub name: &'static str,
    /// Alias without the trailing dot (e.g. `"r"`).
    pub alias: &'static str,
}

impl TableDescriptor {
    pub const fn new(name: &'static str, alias: &'static str) -> Self {
        Self { name, alias }
    }

    /// `"<name> <alias>"`, as used after FROM/JOIN.
    pub fn qualified(&self) -> String {
        format!("{} {}", self.name, self.alias)
    }

    /// `"<alias>."`, as used in front of a column.
    pub fn prefix(&self) -> String {
        format!("{}.", self.alias)
    }
}

/// WHERE/SET comparison operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    /// `=`
    Equals,
    /// `ILIKE`
    ContainsCaseInsensitive,
}

impl Operator {
    pub fn as_sql(&self) -> &'static str {
        match self {
            Operator::Equals => "=",
            Operator::ContainsCaseInsensitive => "ILIKE",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_sql())
    }
}

/// Whether a predicate is an exact match or a containment match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatchMode {
    /// Exact match, raw bound value.
    Strict,
    /// Containment match, `%value%` for text columns.
    #[default]
    Loose,
}

impl MatchMode {
    pub fn from_exact(exact_match: bool) -> Self {
        if exact_match {
            MatchMode::Strict
        } else {
            MatchMode::Loose
        }
    }

    pub fn is_strict(&self) -> bool {
        matches!(self, MatchMode::Strict)
    }
}

/// Operator and coercion policy for one column name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnPolicy {
    pub column: &'static str,
    pub loose: Operator,
    pub strict: Operator,
    pub numeric: bool,
}

impl ColumnPolicy {
    /// Text column: `ILIKE` loose, `=` strict.
    pub const fn text(column: &'static str) -> Self {
        Self {
            column,
            loose: Operator::ContainsCaseInsensitive,
            strict: Operator::Equals,
            numeric: false,
        }
    }

    /// Numeric column: `=` in both modes, bound as an integer.
    pub const fn numeric(column: &'static str) -> Self {
        Self {
            column,
            loose: Operator::Equals,
            strict: Operator::Equals,
            numeric: true,
        }
    }

    pub fn operator(&self, mode: MatchMode) -> Operator {
        match mode {
            MatchMode::Strict => self.strict,
            MatchMode::Loose => self.loose,
        }
    }

    /// The value actually bound for this column.
    ///
    /// Numeric columns bind `Int` (text is trimmed and parsed) and are never
    /// wrapped. Other columns bind `Text` (ints and bools are stringified),
    /// wrapped as `%value%` in loose mode. `Null` passes through.
    pub fn bind(&self, value: &SqlValue, mode: MatchMode) -> SqlResult<SqlValue> {
        if value.is_null() {
            return Ok(SqlValue::Null);
        }
        if self.numeric {
            return self.coerce_int(value).map(SqlValue::Int);
        }

        let text = match value {
            SqlValue::Text(s) => s.clone(),
            SqlValue::Int(v) => v.to_string(),
            SqlValue::Bool(v) => v.to_string(),
            SqlValue::Null => return Ok(SqlValue::Null),
        };
        Ok(match mode {
            MatchMode::Loose => SqlValue::Text(format!("%{text}%")),
            MatchMode::Strict => SqlValue::Text(text),
        })
    }

    fn coerce_int(&self, value: &SqlValue) -> SqlResult<i32> {
        match value {
            SqlValue::Int(v) => Ok(*v),
            SqlValue::Text(s) => s.trim().parse::<i32>().map_err(|_| {
                SqlError::invalid_argument(format!(
                    "{} must be an integer, got '{}'",
                    self.column, s
                ))
            }),
            other => Err(SqlError::invalid_argument(format!(
                "{} must be an integer, got {}",
                self.column, other
            ))),
        }
    }
}

/// Column name to alias-prefix lookup for one query shape.
///
/// Different queries qualify the same column name with different tables
/// (`user_id` is `fr.` for favorites but `sv.` for saves), so alias maps are
/// per query rather than global.
#[derive(Debug, Clone, Copy)]
pub struct AliasMap<'a> {
    entries: &'a [(&'a str, &'a str)],
}

impl<'a> AliasMap<'a> {
    pub const fn new(entries: &'a [(&'a str, &'a str)]) -> Self {
        Self { entries }
    }

    pub fn get(&self, column: &str) -> Option<&'a str> {
        self.entries
            .iter()
            .find(|(col, _)| *col == column)
            .map(|(_, alias)| *alias)
    }

    /// Alias prefix for `column`, or [`SqlError::UnknownColumn`].
    pub fn prefix(&self, column: &str) -> SqlResult<&'a str> {
        self.get(column)
            .ok_or_else(|| SqlError::unknown_column(format!("no table alias for column {column}")))
    }

    /// `"<prefix><column>"`, e.g. `"r.name"`.
    pub fn qualify(&self, column: &str) -> SqlResult<String> {
        Ok(format!("{}{}", self.prefix(column)?, column))
    }
}

/// Read-only table and column metadata.
#[derive(Debug, Clone, Default)]
pub struct SchemaRegistry {
    tables: HashMap<&'static str, TableDescriptor>,
    columns: HashMap<&'static str, ColumnPolicy>,
    writable: HashSet<&'static str>,
}

impl SchemaRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_table(mut self, table: TableDescriptor) -> Self {
        self.tables.insert(table.name, table);
        self
    }

    pub fn with_tables(self, tables: &[TableDescriptor]) -> Self {
        tables.iter().fold(self, |reg, t| reg.with_table(*t))
    }

    pub fn with_column(mut self, policy: ColumnPolicy) -> Self {
        self.columns.insert(policy.column, policy);
        self
    }

    pub fn with_columns(self, policies: &[ColumnPolicy]) -> Self {
        policies.iter().fold(self, |reg, p| reg.with_column(*p))
    }

    /// Add a table to the INSERT/UPDATE allow-list.
    pub fn with_writable(mut self, table: &'static str) -> Self {
        self.writable.insert(table);
        self
    }

    pub fn with_writables(self, tables: &[&'static str]) -> Self {
        tables.iter().fold(self, |reg, t| reg.with_writable(t))
    }

    /// Descriptor for `name`, or [`SqlError::UnknownTable`].
    pub fn table(&self, name: &str) -> SqlResult<&TableDescriptor> {
        self.tables
            .get(name)
            .ok_or_else(|| SqlError::unknown_table(name))
    }

    /// Policy for `column`, or [`SqlError::UnknownColumn`].
    pub fn policy(&self, column: &str) -> SqlResult<&ColumnPolicy> {
        self.columns
            .get(column)
            .ok_or_else(|| SqlError::unknown_column(column))
    }

    pub fn operator(&self, column: &str, mode: MatchMode) -> SqlResult<Operator> {
        Ok(self.policy(column)?.operator(mode))
    }

    pub fn is_numeric(&self, column: &str) -> SqlResult<bool> {
        Ok(self.policy(column)?.numeric)
    }

    /// Coerce `value` for `column` under `mode`; see [`ColumnPolicy::bind`].
    pub fn bind(&self, column: &str, value: &SqlValue, mode: MatchMode) -> SqlResult<SqlValue> {
        self.policy(column)?.bind(value, mode)
    }

    /// Exact-mode coercion for columns with a policy, raw value otherwise.
    ///
    /// Used for INSERT values and guard constraints, where not every column
    /// is filterable.
    pub fn bind_exact_if_known(&self, column: &str, value: &SqlValue) -> SqlResult<SqlValue> {
        match self.columns.get(column) {
            Some(policy) => policy.bind(value, MatchMode::Strict),
            None => Ok(value.clone()),
        }
    }

    pub fn is_writable(&self, table: &str) -> bool {
        self.writable.contains(table)
    }

    /// Ok if `table` is on the allow-list, else [`SqlError::UnknownTable`].
    pub fn ensure_writable(&self, table: &str) -> SqlResult<()> {
        if self.is_writable(table) {
            Ok(())
        } else {
            Err(SqlError::unknown_table(table))
        }
    }

    pub fn is_registered(&self, table: &str) -> bool {
        self.tables.contains_key(table) || self.writable.contains(table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> SchemaRegistry {
        SchemaRegistry::new()
            .with_tables(&[
                TableDescriptor::new("authors", "a"),
                TableDescriptor::new("recipes", "r"),
            ])
            .with_columns(&[ColumnPolicy::text("full_name"), ColumnPolicy::numeric("id")])
            .with_writables(&["recipes", "view_later"])
    }

    #[test]
    fn table_lookup() {
        let reg = registry();
        let authors = reg.table("authors").unwrap();
        assert_eq!(authors.qualified(), "authors a");
        assert_eq!(authors.prefix(), "a.");
        assert!(reg.table("nope").unwrap_err().is_unknown_table());
    }

    #[test]
    fn operator_by_mode() {
        let reg = registry();
        assert_eq!(
            reg.operator("full_name", MatchMode::Loose).unwrap().as_sql(),
            "ILIKE"
        );
        assert_eq!(
            reg.operator("full_name", MatchMode::Strict).unwrap().as_sql(),
            "="
        );
        assert_eq!(reg.operator("id", MatchMode::Loose).unwrap(), Operator::Equals);
    }

    #[test]
    fn missing_column_fails_loudly() {
        let reg = registry();
        assert!(reg.is_numeric("nope").unwrap_err().is_unknown_column());
        assert!(reg.operator("nope", MatchMode::Strict).is_err());
    }

    #[test]
    fn bind_follows_column_policy() {
        let reg = registry();
        assert_eq!(
            reg.bind("full_name", &SqlValue::text("ina"), MatchMode::Loose).unwrap(),
            SqlValue::text("%ina%")
        );
        assert_eq!(
            reg.bind("full_name", &SqlValue::Int(7), MatchMode::Strict).unwrap(),
            SqlValue::text("7")
        );
        assert_eq!(
            reg.bind("id", &SqlValue::text(" 12 "), MatchMode::Loose).unwrap(),
            SqlValue::Int(12)
        );
        assert!(reg
            .bind("id", &SqlValue::text("twelve"), MatchMode::Strict)
            .unwrap_err()
            .is_invalid_argument());
        assert_eq!(
            reg.bind("id", &SqlValue::Null, MatchMode::Loose).unwrap(),
            SqlValue::Null
        );
    }

    #[test]
    fn bind_stringifies_bool_on_text_columns() {
        let reg = registry();
        assert_eq!(
            reg.bind("full_name", &SqlValue::Bool(true), MatchMode::Loose).unwrap(),
            SqlValue::text("%true%")
        );
        assert_eq!(
            reg.bind("full_name", &SqlValue::Bool(false), MatchMode::Strict).unwrap(),
            SqlValue::text("false")
        );
        assert!(reg
            .bind("id", &SqlValue::Bool(true), MatchMode::Loose)
            .unwrap_err()
            .is_invalid_argument());
    }

    #[test]
    fn bind_exact_passes_unknown_columns_through() {
        let reg = registry();
        let v = SqlValue::text("3 cups");
        assert_eq!(reg.bind_exact_if_known("qty", &v).unwrap(), v);
        assert_eq!(
            reg.bind_exact_if_known("id", &SqlValue::text("3")).unwrap(),
            SqlValue::Int(3)
        );
    }

    #[test]
    fn writable_allow_list() {
        let reg = registry();
        assert!(reg.is_writable("view_later"));
        assert!(!reg.is_writable("authors"));
        assert!(reg.ensure_writable("invalidTable").unwrap_err().is_unknown_table());
    }

    #[test]
    fn alias_map_qualifies() {
        const MAP: AliasMap<'static> = AliasMap::new(&[("name", "r."), ("rating", "rt.")]);
        assert_eq!(MAP.qualify("rating").unwrap(), "rt.rating");
        assert!(MAP.qualify("author").unwrap_err().is_unknown_column());
    }
}
