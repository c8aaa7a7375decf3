//! Ingredient lookup.

use crate::catalog;
use crate::models::Ingredient;
use savour_sql::{
    BuiltQuery, ColumnValues, GenericClient, SelectStatement, SqlBuilder, SqlResult,
    WhereBuilder, select_sql,
};

/// All ingredients, or those whose name contains `search` (case-insensitive).
pub fn list_query(search: Option<&str>) -> SqlResult<BuiltQuery> {
    let reg = catalog::registry();
    let mut filter = ColumnValues::new();
    if let Some(search) = search {
        filter.push("ingredient", search);
    }
    Ok(
        SelectStatement::new(select_sql(reg, &["id", "ingredient"], "ingredients", false)?)
            .filter(WhereBuilder::new(reg).build(&filter)?)?
            .push("ORDER BY ingredient")
            .build(),
    )
}

pub async fn list(conn: &impl GenericClient, search: Option<&str>) -> SqlResult<Vec<Ingredient>> {
    list_query(search)?.query_as(conn).await
}
