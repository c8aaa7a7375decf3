//! Occasions a recipe list can be planned for.

use crate::catalog;
use crate::models::Occasion;
use savour_sql::{BuiltQuery, GenericClient, SelectStatement, SqlBuilder, SqlResult, select_sql};

pub fn list_query() -> SqlResult<BuiltQuery> {
    let select = select_sql(catalog::registry(), &["id", "occasion"], "occasions", false)?;
    Ok(SelectStatement::new(select).push("ORDER BY id").build())
}

pub async fn list(conn: &impl GenericClient) -> SqlResult<Vec<Occasion>> {
    list_query()?.query_as(conn).await
}
