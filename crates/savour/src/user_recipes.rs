//! Recipes users write or adapt for themselves.

use crate::catalog;
use crate::models::{ListItem, Step, UserRecipe, UserRecipeSummary};
use savour_sql::{
    AliasMap, BuiltQuery, ColumnValues, GenericClient, Join, JoinKind, MatchMode, RowExt,
    SelectStatement, SqlBuilder, SqlError, SqlResult, WhereBuilder, join_sql, row_exists,
    select_sql,
};

const STEP_ALIASES: AliasMap<'static> =
    AliasMap::new(&[("user_id", "ur."), ("user_recipe_id", "urs.")]);

const INGREDIENT_ALIASES: AliasMap<'static> =
    AliasMap::new(&[("user_id", "ur."), ("id", "ur."), ("user_recipe_id", "uri.")]);

const INGREDIENT_JOINS: &[Join<'static>] = &[
    Join::new("user_recipes_ingredients", "ur.id", "uri.user_recipe_id"),
    Join::new("units", "uri.unit_id", "u.id"),
    Join::new("ingredients", "uri.ingredient_id", "ing.id"),
];

pub fn list_query(user_id: i32) -> SqlResult<BuiltQuery> {
    let reg = catalog::registry();
    let clause = WhereBuilder::new(reg)
        .mode(MatchMode::Strict)
        .build(&ColumnValues::new().with("user_id", user_id))?;
    Ok(
        SelectStatement::new(select_sql(reg, &["id", "recipe_name"], "user_recipes", false)?)
            .filter(clause)?
            .push("ORDER BY id")
            .build(),
    )
}

pub async fn list(conn: &impl GenericClient, user_id: i32) -> SqlResult<Vec<UserRecipeSummary>> {
    list_query(user_id)?.query_as(conn).await
}

pub fn steps_query(user_id: i32, user_recipe_id: i32) -> SqlResult<BuiltQuery> {
    let reg = catalog::registry();
    let joins = [Join::new("user_recipes", "urs.user_recipe_id", "ur.id")];
    let clause = WhereBuilder::new(reg)
        .mode(MatchMode::Strict)
        .aliases(STEP_ALIASES)
        .build(
            &ColumnValues::new()
                .with("user_recipe_id", user_recipe_id)
                .with("user_id", user_id),
        )?;
    Ok(
        SelectStatement::new(select_sql(reg, &["urs.step"], "user_recipes_steps", true)?)
            .push(join_sql(reg, &joins, JoinKind::Inner)?)
            .filter(clause)?
            .push("ORDER BY urs.id")
            .build(),
    )
}

/// Steps in the order they were written.
pub async fn steps(
    conn: &impl GenericClient,
    user_id: i32,
    user_recipe_id: i32,
) -> SqlResult<Vec<Step>> {
    steps_query(user_id, user_recipe_id)?.query_as(conn).await
}

pub fn name_query(user_id: i32, user_recipe_id: i32) -> SqlResult<BuiltQuery> {
    let reg = catalog::registry();
    let clause = WhereBuilder::new(reg)
        .mode(MatchMode::Strict)
        .aliases(INGREDIENT_ALIASES)
        .build(
            &ColumnValues::new()
                .with("user_id", user_id)
                .with("id", user_recipe_id),
        )?;
    Ok(
        SelectStatement::new(select_sql(reg, &["ur.recipe_name"], "user_recipes", true)?)
            .filter(clause)?
            .build(),
    )
}

pub fn ingredients_query(user_id: i32, user_recipe_id: i32) -> SqlResult<BuiltQuery> {
    let reg = catalog::registry();
    let clause = WhereBuilder::new(reg)
        .mode(MatchMode::Strict)
        .aliases(INGREDIENT_ALIASES)
        .build(
            &ColumnValues::new()
                .with("user_id", user_id)
                .with("user_recipe_id", user_recipe_id),
        )?;
    Ok(SelectStatement::new(select_sql(
        reg,
        &["uri.id", "uri.qty", "u.unit", "ing.ingredient"],
        "user_recipes",
        true,
    )?)
    .push(join_sql(reg, INGREDIENT_JOINS, JoinKind::Inner)?)
    .filter(clause)?
    .push("ORDER BY ing.ingredient")
    .build())
}

/// Name, ingredients (alphabetical) and steps of one of the user's recipes.
pub async fn get(
    conn: &impl GenericClient,
    user_id: i32,
    user_recipe_id: i32,
) -> SqlResult<UserRecipe> {
    let owned = ColumnValues::new()
        .with("user_id", user_id)
        .with("id", user_recipe_id);
    row_exists(conn, catalog::registry(), "user recipe", "id", "user_recipes", &owned).await?;

    let ingredients: Vec<ListItem> = ingredients_query(user_id, user_recipe_id)?
        .query_as(conn)
        .await?;
    let recipe_name: String = name_query(user_id, user_recipe_id)?
        .query_opt(conn)
        .await?
        .ok_or_else(|| SqlError::not_found("user recipe"))?
        .try_get_column("recipe_name")?;
    let steps = steps(conn, user_id, user_recipe_id).await?;

    Ok(UserRecipe {
        recipe_name,
        ingredients,
        steps,
    })
}
