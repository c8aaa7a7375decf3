use crate::error::{SqlError, SqlResult};
use crate::ident::validate_ident;
use crate::registry::SchemaRegistry;

/// One join step: target table and the two sides of its `ON` equation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Join<'a> {
    pub table: &'a str,
    pub left: &'a str,
    pub right: &'a str,
}

impl<'a> Join<'a> {
    pub const fn new(table: &'a str, left: &'a str, right: &'a str) -> Self {
        Self { table, left, right }
    }
}

/// Join keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JoinKind {
    #[default]
    Inner,
    Left,
    Full,
}

impl JoinKind {
    pub fn as_sql(&self) -> &'static str {
        match self {
            JoinKind::Inner => "JOIN",
            JoinKind::Left => "LEFT JOIN",
            JoinKind::Full => "FULL JOIN",
        }
    }
}

/// Render `joins` in order, e.g. `JOIN authors a ON r.author_id = a.id`.
///
/// Later entries may reference aliases introduced by earlier ones. An empty
/// list renders as `""`.
pub fn join_sql(registry: &SchemaRegistry, joins: &[Join<'_>], kind: JoinKind) -> SqlResult<String> {
    let mut parts = Vec::with_capacity(joins.len());
    for join in joins {
        if join.table.trim().is_empty() {
            return Err(SqlError::invalid_argument("join table name cannot be empty"));
        }
        let table = registry.table(join.table)?;
        validate_ident(join.left)?;
        validate_ident(join.right)?;
        parts.push(format!(
            "{} {} ON {} = {}",
            kind.as_sql(),
            table.qualified(),
            join.left,
            join.right
        ));
    }
    Ok(parts.join(" "))
}
