use crate::error::{SqlError, SqlResult};
use crate::ident::{validate_ident, validate_select_expr};
use crate::registry::SchemaRegistry;

/// `SELECT <cols> FROM <table>`.
///
/// With `aliased` the table renders as `<table> <alias>` from the registry so
/// joins can follow; otherwise the bare name is used.
pub fn select_sql<S: AsRef<str>>(
    registry: &SchemaRegistry,
    columns: &[S],
    table: &str,
    aliased: bool,
) -> SqlResult<String> {
    if columns.is_empty() {
        return Err(SqlError::invalid_argument("select column list cannot be empty"));
    }
    for col in columns {
        validate_select_expr(col.as_ref())?;
    }

    let from = if aliased {
        registry.table(table)?.qualified()
    } else {
        validate_ident(table)?;
        table.to_string()
    };

    let cols: Vec<&str> = columns.iter().map(AsRef::as_ref).collect();
    Ok(format!("SELECT {} FROM {}", cols.join(", "), from))
}
