//! Generic writes against any writable table.

use crate::catalog;
use crate::models::Message;
use savour_sql::{
    ColumnValues, DeleteBuilder, GenericClient, InsertBuilder, MutationBuilder, SqlBuilder,
    SqlResult, row_exists,
};
use tokio_postgres::Row;

/// Insert one row. Returns the `returning` columns of the new row, or no
/// rows when `returning` is empty.
pub async fn insert_row(
    conn: &impl GenericClient,
    table: &str,
    values: &ColumnValues,
    returning: &[&str],
) -> SqlResult<Vec<Row>> {
    let query = InsertBuilder::new(catalog::registry(), table)
        .values(values.clone())
        .returning(returning)
        .build()?;
    if returning.is_empty() {
        query.execute(conn).await?;
        Ok(Vec::new())
    } else {
        query.query(conn).await
    }
}

/// Delete the rows matching every constraint exactly.
///
/// Fails with `NotFound("Row")` when nothing matches; otherwise returns
/// `message` unchanged.
pub async fn delete_row(
    conn: &impl GenericClient,
    table: &str,
    constraints: &ColumnValues,
    message: &str,
) -> SqlResult<Message> {
    let reg = catalog::registry();
    let query = DeleteBuilder::new(reg, table)
        .filter(constraints.clone())
        .build()?;
    let probe = constraints.columns().first().copied().unwrap_or("id");
    row_exists(conn, reg, "Row", probe, table, constraints).await?;
    query.execute(conn).await?;
    Ok(Message::new(message))
}
