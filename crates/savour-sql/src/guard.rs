//! Row-existence guard.
//!
//! Every lookup keyed by a caller-supplied identifier runs through
//! [`row_exists`] first, so a missing row surfaces as
//! [`SqlError::NotFound`] with the entity label rather than as an empty result.

use crate::builder::{BuiltQuery, SqlBuilder};
use crate::client::GenericClient;
use crate::error::{SqlError, SqlResult};
use crate::ident::{validate_ident, validate_select_expr};
use crate::registry::SchemaRegistry;
use crate::value::ColumnValues;
use tokio_postgres::Row;

/// `SELECT <column> FROM <table> WHERE c1 = $1 [AND c2 = $2 ...]`.
pub fn existence_query(
    registry: &SchemaRegistry,
    column: &str,
    table: &str,
    constraints: &ColumnValues,
) -> SqlResult<BuiltQuery> {
    if constraints.is_empty() {
        return Err(SqlError::invalid_argument(format!(
            "existence check on {table} needs at least one constraint"
        )));
    }
    if !registry.is_registered(table) {
        return Err(SqlError::unknown_table(table));
    }
    validate_select_expr(column)?;

    let mut conditions = Vec::with_capacity(constraints.len());
    let mut params = Vec::with_capacity(constraints.len());
    for (idx, (col, value)) in constraints.iter().enumerate() {
        validate_ident(col)?;
        conditions.push(format!("{} = ${}", col, idx + 1));
        params.push(registry.bind_exact_if_known(col, value)?);
    }

    let sql = format!(
        "SELECT {} FROM {} WHERE {}",
        column,
        table,
        conditions.join(" AND ")
    );
    Ok(BuiltQuery::new(sql, params))
}

/// `rows` unchanged, or `NotFound(entity)` when empty.
pub fn ensure_found<R>(entity: &str, rows: Vec<R>) -> SqlResult<Vec<R>> {
    if rows.is_empty() {
        Err(SqlError::not_found(entity))
    } else {
        Ok(rows)
    }
}

/// Run the existence query and return every matched row.
pub async fn row_exists(
    conn: &impl GenericClient,
    registry: &SchemaRegistry,
    entity: &str,
    column: &str,
    table: &str,
    constraints: &ColumnValues,
) -> SqlResult<Vec<Row>> {
    let query = existence_query(registry, column, table, constraints).inspect_err(|err| {
        tracing::debug!(target: "savour.sql", entity, table, error = %err, "existence check rejected");
    })?;
    let rows = query.query(conn).await?;
    if rows.is_empty() {
        tracing::debug!(target: "savour.sql", entity, table, "existence check matched no rows");
    }
    ensure_found(entity, rows)
}
