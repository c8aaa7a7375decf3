//! User accounts and their favourite/saved recipes.
//!
//! Passwords arrive here already hashed; hashing and verification belong to
//! the caller.

use crate::catalog::{self, RECIPE_COLUMNS, USER_PROFILE_COLUMNS};
use crate::models::{Credentials, Recipe, User};
use crate::recipes::{self, Reaction};
use savour_sql::{
    BuiltQuery, ColumnValues, GenericClient, InsertBuilder, JoinKind, MatchMode,
    SelectStatement, SqlBuilder, SqlError, SqlResult, UpdateBuilder, WhereBuilder, join_sql,
    row_exists, select_sql,
};

fn profile_columns() -> Vec<&'static str> {
    let mut cols = USER_PROFILE_COLUMNS.to_vec();
    cols.push("is_admin");
    cols
}

fn by_username(columns: &[&str], username: &str) -> SqlResult<BuiltQuery> {
    let reg = catalog::registry();
    let clause = WhereBuilder::new(reg)
        .mode(MatchMode::Strict)
        .build(&ColumnValues::new().with("username", username))?;
    Ok(SelectStatement::new(select_sql(reg, columns, "users", false)?)
        .filter(clause)?
        .build())
}

pub fn get_by_username_query(username: &str) -> SqlResult<BuiltQuery> {
    by_username(&profile_columns(), username)
}

pub fn credentials_query(username: &str) -> SqlResult<BuiltQuery> {
    by_username(&["id", "username", "password"], username)
}

/// Profile for `username`; `NotFound("User")` if there is none.
pub async fn get_by_username(conn: &impl GenericClient, username: &str) -> SqlResult<User> {
    get_by_username_query(username)?
        .query_opt_as(conn)
        .await?
        .ok_or_else(|| SqlError::not_found("User"))
}

/// Id, username and stored password hash for a login check.
pub async fn credentials(conn: &impl GenericClient, username: &str) -> SqlResult<Credentials> {
    credentials_query(username)?
        .query_opt_as(conn)
        .await?
        .ok_or_else(|| SqlError::invalid_argument("User doesn't exist!"))
}

pub fn register_query(values: &ColumnValues) -> SqlResult<BuiltQuery> {
    if values.contains("is_admin") {
        return Err(SqlError::invalid_argument("Cannot use is_admin property!"));
    }
    for required in ["username", "password"] {
        if values.get(required).is_none_or(|v| v.is_null()) {
            return Err(SqlError::invalid_argument(format!("{required} is required")));
        }
    }
    InsertBuilder::new(catalog::registry(), "users")
        .values(values.clone())
        .returning(&profile_columns())
        .build()
}

/// Insert a user. `values` carries the column values with `password`
/// already hashed.
pub async fn register(conn: &impl GenericClient, values: &ColumnValues) -> SqlResult<User> {
    let query = register_query(values)?;
    let username = values
        .get("username")
        .map(ToString::to_string)
        .unwrap_or_default();
    if by_username(&["id"], &username)?.query_opt(conn).await?.is_some() {
        return Err(SqlError::invalid_argument("Username exists already!"));
    }
    query.query_one_as(conn).await
}

/// `UPDATE users SET ... WHERE username = $n RETURNING <profile>`.
///
/// The WHERE placeholder continues after the SET placeholders.
pub fn edit_query(username: &str, values: &ColumnValues) -> SqlResult<BuiltQuery> {
    if values.contains("is_admin") {
        return Err(SqlError::invalid_argument("Cannot edit is_admin!"));
    }
    if values.contains("id") {
        return Err(SqlError::invalid_argument("Cannot edit id!"));
    }
    if values.contains("username") {
        return Err(SqlError::invalid_argument("Cannot edit username!"));
    }
    UpdateBuilder::new(catalog::registry(), "users")
        .values(values.clone())
        .and_eq("username", username)
        .returning(&profile_columns())
        .build()
}

pub async fn edit(
    conn: &impl GenericClient,
    username: &str,
    values: &ColumnValues,
) -> SqlResult<User> {
    let query = edit_query(username, values)?;
    let constraints = ColumnValues::new().with("username", username);
    row_exists(conn, catalog::registry(), "User", "id", "users", &constraints).await?;
    query.query_one_as(conn).await
}

pub(crate) async fn ensure_user(conn: &impl GenericClient, user_id: i32) -> SqlResult<()> {
    let constraints = ColumnValues::new().with("id", user_id);
    row_exists(conn, catalog::registry(), "user", "id", "users", &constraints).await?;
    Ok(())
}

/// Recipes in a user's favourite or saved collection, by name then rating.
pub fn collection_query(
    reaction: Reaction,
    user_id: i32,
    recipe_id: Option<i32>,
) -> SqlResult<BuiltQuery> {
    let reg = catalog::registry();
    let mut filter = ColumnValues::new().with("user_id", user_id);
    if let Some(recipe_id) = recipe_id {
        filter.push("recipe_id", recipe_id);
    }
    let clause = WhereBuilder::new(reg)
        .mode(MatchMode::Strict)
        .aliases(reaction.aliases())
        .build(&filter)?;
    Ok(
        SelectStatement::new(select_sql(reg, RECIPE_COLUMNS, reaction.table(), true)?)
            .push(join_sql(reg, reaction.recipe_joins(), JoinKind::Inner)?)
            .filter(clause)?
            .push("ORDER BY r.name, rt.rating")
            .build(),
    )
}

async fn collection(
    conn: &impl GenericClient,
    reaction: Reaction,
    user_id: i32,
    recipe_id: Option<i32>,
) -> SqlResult<Vec<Recipe>> {
    ensure_user(conn, user_id).await?;
    let mut recipes: Vec<Recipe> = collection_query(reaction, user_id, recipe_id)?
        .query_as(conn)
        .await?;
    if recipe_id.is_some() {
        if let Some(recipe) = recipes.first_mut() {
            recipes::attach_details(conn, recipe).await?;
        }
    }
    Ok(recipes)
}

/// All favourites, or the one matching `recipe_id` with ingredients and reviews.
pub async fn favorite_recipes(
    conn: &impl GenericClient,
    user_id: i32,
    recipe_id: Option<i32>,
) -> SqlResult<Vec<Recipe>> {
    collection(conn, Reaction::Favorite, user_id, recipe_id).await
}

pub async fn saved_recipes(
    conn: &impl GenericClient,
    user_id: i32,
    recipe_id: Option<i32>,
) -> SqlResult<Vec<Recipe>> {
    collection(conn, Reaction::Saved, user_id, recipe_id).await
}
