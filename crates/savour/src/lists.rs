//! Recipe lists and shopping lists.

use crate::catalog::{self, RECIPE_COLUMNS, RECIPE_RELATIONS};
use crate::models::{
    ListItem, ListRecipes, Recipe, RecipeList, ShoppingList, ShoppingListDetail,
};
use crate::recipes;
use crate::users::ensure_user;
use savour_sql::{
    AliasMap, BuiltClause, BuiltQuery, ColumnValues, GenericClient, Join, JoinKind, MatchMode,
    RowExt, SelectStatement, SqlBuilder, SqlError, SqlResult, WhereBuilder, join_sql,
    row_exists, select_sql,
};

const RECIPE_LIST_ALIASES: AliasMap<'static> = AliasMap::new(&[
    ("user_id", "rl."),
    ("id", "rl."),
    ("list_id", "rlr."),
    ("recipe_id", "rlr."),
]);

const SHOPPING_LIST_ALIASES: AliasMap<'static> = AliasMap::new(&[
    ("user_id", "sl."),
    ("id", "sl."),
    ("list_id", "sli."),
]);

const LIST_OCCASION: &[Join<'static>] = &[Join::new("occasions", "rl.occasion_id", "o.id")];

const LIST_RECIPES: &[Join<'static>] = &[
    Join::new("recipelists_recipes", "rl.id", "rlr.list_id"),
    Join::new("recipes", "rlr.recipe_id", "r.id"),
];

const SHOPPING_LIST_ITEMS: &[Join<'static>] = &[
    Join::new("units", "sli.unit_id", "u.id"),
    Join::new("ingredients", "sli.ingredient_id", "ing.id"),
    Join::new("shoppinglists", "sli.list_id", "sl.id"),
];

fn strict(aliases: Option<AliasMap<'static>>, values: &ColumnValues) -> SqlResult<BuiltClause> {
    let mut builder = WhereBuilder::new(catalog::registry()).mode(MatchMode::Strict);
    if let Some(aliases) = aliases {
        builder = builder.aliases(aliases);
    }
    builder.build(values)
}

fn with_optional(mut values: ColumnValues, column: &str, value: Option<i32>) -> ColumnValues {
    if let Some(value) = value {
        values.push(column, value);
    }
    values
}

pub fn recipe_lists_query(user_id: i32, list_id: Option<i32>) -> SqlResult<BuiltQuery> {
    let reg = catalog::registry();
    let filter = with_optional(ColumnValues::new().with("user_id", user_id), "id", list_id);
    Ok(SelectStatement::new(select_sql(
        reg,
        &["rl.id", "rl.list_name", "o.occasion"],
        "recipelists",
        true,
    )?)
    .push(join_sql(reg, LIST_OCCASION, JoinKind::Inner)?)
    .filter(strict(Some(RECIPE_LIST_ALIASES), &filter)?)?
    .push("ORDER BY rl.list_name")
    .build())
}

/// A user's recipe lists, or the one with `list_id`.
pub async fn recipe_lists(
    conn: &impl GenericClient,
    user_id: i32,
    list_id: Option<i32>,
) -> SqlResult<Vec<RecipeList>> {
    ensure_user(conn, user_id).await?;
    recipe_lists_query(user_id, list_id)?.query_as(conn).await
}

pub fn list_recipes_query(
    user_id: i32,
    list_id: i32,
    recipe_id: Option<i32>,
) -> SqlResult<BuiltQuery> {
    let reg = catalog::registry();
    let filter = with_optional(
        ColumnValues::new()
            .with("user_id", user_id)
            .with("list_id", list_id),
        "recipe_id",
        recipe_id,
    );
    Ok(
        SelectStatement::new(select_sql(reg, RECIPE_COLUMNS, "recipelists", true)?)
            .push(join_sql(reg, LIST_RECIPES, JoinKind::Inner)?)
            .push(join_sql(reg, RECIPE_RELATIONS, JoinKind::Inner)?)
            .filter(strict(Some(RECIPE_LIST_ALIASES), &filter)?)?
            .push("ORDER BY r.name, author")
            .build(),
    )
}

pub fn list_header_query(list_id: i32) -> SqlResult<BuiltQuery> {
    let reg = catalog::registry();
    let columns = ["rl.list_name", "o.occasion"];
    Ok(
        SelectStatement::new(select_sql(reg, &columns, "recipelists", true)?)
            .push(join_sql(reg, LIST_OCCASION, JoinKind::Inner)?)
            .filter(strict(
                Some(RECIPE_LIST_ALIASES),
                &ColumnValues::new().with("id", list_id),
            )?)?
            .build(),
    )
}

/// Name, occasion and recipes of one of the user's lists. Asking for a
/// single recipe also attaches its ingredients.
pub async fn list_recipes(
    conn: &impl GenericClient,
    user_id: i32,
    list_id: i32,
    recipe_id: Option<i32>,
) -> SqlResult<ListRecipes> {
    let reg = catalog::registry();
    ensure_user(conn, user_id).await?;
    let owned = ColumnValues::new()
        .with("user_id", user_id)
        .with("id", list_id);
    row_exists(conn, reg, "recipelist", "id", "recipelists", &owned).await?;

    let mut recipes: Vec<Recipe> = list_recipes_query(user_id, list_id, recipe_id)?
        .query_as(conn)
        .await?;
    let header = list_header_query(list_id)?
        .query_opt(conn)
        .await?
        .ok_or_else(|| SqlError::not_found("recipelist"))?;

    if recipe_id.is_some() {
        if let Some(recipe) = recipes.first_mut() {
            recipe.ingredients = Some(recipes::ingredients(conn, recipe.id).await?);
        }
    }

    Ok(ListRecipes {
        list_name: header.try_get_column("list_name")?,
        occasion: header.try_get_column("occasion")?,
        recipes,
    })
}

pub fn shopping_lists_query(user_id: i32, list_id: Option<i32>) -> SqlResult<BuiltQuery> {
    let reg = catalog::registry();
    let filter = with_optional(ColumnValues::new().with("user_id", user_id), "id", list_id);
    Ok(SelectStatement::new(select_sql(
        reg,
        &["id", "list_name", "recipe_id"],
        "shoppinglists",
        false,
    )?)
    .filter(strict(None, &filter)?)?
    .push("ORDER BY list_name")
    .build())
}

pub async fn shopping_lists(
    conn: &impl GenericClient,
    user_id: i32,
    list_id: Option<i32>,
) -> SqlResult<Vec<ShoppingList>> {
    ensure_user(conn, user_id).await?;
    shopping_lists_query(user_id, list_id)?.query_as(conn).await
}

pub fn shopping_list_items_query(user_id: i32, list_id: i32) -> SqlResult<BuiltQuery> {
    let reg = catalog::registry();
    let filter = ColumnValues::new()
        .with("user_id", user_id)
        .with("list_id", list_id);
    Ok(SelectStatement::new(select_sql(
        reg,
        &["sli.id", "sli.qty", "u.unit", "ing.ingredient"],
        "shoppinglists_items",
        true,
    )?)
    .push(join_sql(reg, SHOPPING_LIST_ITEMS, JoinKind::Inner)?)
    .filter(strict(Some(SHOPPING_LIST_ALIASES), &filter)?)?
    .build())
}

pub fn shopping_list_header_query(list_id: i32) -> SqlResult<BuiltQuery> {
    let reg = catalog::registry();
    Ok(SelectStatement::new(select_sql(
        reg,
        &["sl.list_name", "sl.recipe_id"],
        "shoppinglists",
        true,
    )?)
    .filter(strict(
        Some(SHOPPING_LIST_ALIASES),
        &ColumnValues::new().with("id", list_id),
    )?)?
    .build())
}

pub fn recipe_byline_query(recipe_id: i32) -> SqlResult<BuiltQuery> {
    let reg = catalog::registry();
    let joins = [Join::new("authors", "r.author_id", "a.id")];
    Ok(SelectStatement::new(select_sql(
        reg,
        &["r.name", "a.full_name AS author"],
        "recipes",
        true,
    )?)
    .push(join_sql(reg, &joins, JoinKind::Inner)?)
    .filter(strict(
        Some(catalog::RECIPE_ALIASES),
        &ColumnValues::new().with("id", recipe_id),
    )?)?
    .build())
}

/// Items of one of the user's shopping lists, plus the recipe it was
/// built from and that recipe's ingredients.
pub async fn shopping_list_items(
    conn: &impl GenericClient,
    user_id: i32,
    list_id: i32,
) -> SqlResult<ShoppingListDetail> {
    let reg = catalog::registry();
    ensure_user(conn, user_id).await?;
    let owned = ColumnValues::new()
        .with("user_id", user_id)
        .with("id", list_id);
    row_exists(conn, reg, "shoppinglist", "id", "shoppinglists", &owned).await?;

    let list_items: Vec<ListItem> = shopping_list_items_query(user_id, list_id)?
        .query_as(conn)
        .await?;
    let header = shopping_list_header_query(list_id)?
        .query_opt(conn)
        .await?
        .ok_or_else(|| SqlError::not_found("shoppinglist"))?;
    let list_name: String = header.try_get_column("list_name")?;
    let recipe_id: Option<i32> = header.try_get_column("recipe_id")?;

    let mut detail = ShoppingListDetail {
        list_name,
        recipe_name: None,
        recipe_author: None,
        recipes_ingredients: Vec::new(),
        list_items,
    };
    if let Some(recipe_id) = recipe_id {
        if let Some(byline) = recipe_byline_query(recipe_id)?.query_opt(conn).await? {
            detail.recipe_name = byline.try_get_column("name")?;
            detail.recipe_author = byline.try_get_column("author")?;
        }
        detail.recipes_ingredients = recipes::ingredients(conn, recipe_id).await?;
    }
    Ok(detail)
}
