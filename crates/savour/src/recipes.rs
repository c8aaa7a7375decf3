//! Recipe reads, search and reviews.
//!
//! Favourite/saved user ids, ingredients and reviews are fetched one query
//! per recipe, in sequence, and every lookup re-checks that the recipe exists.
//! Listing `n` recipes costs `1 + 4n` round trips.

use crate::catalog::{
    self, FAVORITE_ALIASES, FAVORITE_RECIPE_RELATIONS, FAVORITE_USERS, INGREDIENT_COLUMNS,
    INGREDIENT_RELATIONS, RECIPE_ALIASES, RECIPE_COLUMNS, RECIPE_FILTERS,
    RECIPE_INGREDIENT_ALIASES, RECIPE_RELATIONS, SAVED_ALIASES, SAVED_RECIPE_RELATIONS,
    SAVED_USERS,
};
use crate::models::{Recipe, RecipeIngredient, Review};
use savour_sql::builder::order_by::{DIRECTION_KEY, ORDER_BY_KEY, ORDER_BY2_KEY};
use savour_sql::{
    AliasMap, BuiltClause, BuiltQuery, ColumnValues, FilterRequest, GenericClient,
    InsertBuilder, Join, JoinKind, MatchMode, OrderByBuilder, RowExt, SelectStatement,
    SqlBuilder, SqlError, SqlResult, WhereBuilder, join_sql, row_exists, select_sql,
};

/// Which per-user recipe collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reaction {
    Favorite,
    Saved,
}

impl Reaction {
    pub fn table(&self) -> &'static str {
        match self {
            Reaction::Favorite => "favorite_recipes",
            Reaction::Saved => "saved_recipes",
        }
    }

    fn user_id_select(&self) -> &'static str {
        match self {
            Reaction::Favorite => "fr.user_id AS fav_user_id",
            Reaction::Saved => "sv.user_id AS sav_user_id",
        }
    }

    fn user_id_column(&self) -> &'static str {
        match self {
            Reaction::Favorite => "fav_user_id",
            Reaction::Saved => "sav_user_id",
        }
    }

    fn user_joins(&self) -> &'static [Join<'static>] {
        match self {
            Reaction::Favorite => FAVORITE_USERS,
            Reaction::Saved => SAVED_USERS,
        }
    }

    pub(crate) fn recipe_joins(&self) -> &'static [Join<'static>] {
        match self {
            Reaction::Favorite => FAVORITE_RECIPE_RELATIONS,
            Reaction::Saved => SAVED_RECIPE_RELATIONS,
        }
    }

    pub(crate) fn aliases(&self) -> AliasMap<'static> {
        match self {
            Reaction::Favorite => FAVORITE_ALIASES,
            Reaction::Saved => SAVED_ALIASES,
        }
    }
}

fn by_recipe_id(recipe_id: i32, aliases: AliasMap<'static>) -> SqlResult<BuiltClause> {
    WhereBuilder::new(catalog::registry())
        .mode(MatchMode::Strict)
        .aliases(aliases)
        .build(&ColumnValues::new().with("id", recipe_id))
}

/// Base `SELECT <recipe columns> FROM recipes r JOIN ...`.
fn recipe_select() -> SqlResult<SelectStatement> {
    let reg = catalog::registry();
    Ok(
        SelectStatement::new(select_sql(reg, RECIPE_COLUMNS, "recipes", true)?)
            .push(join_sql(reg, RECIPE_RELATIONS, JoinKind::Inner)?),
    )
}

pub fn reaction_users_query(recipe_id: i32, reaction: Reaction) -> SqlResult<BuiltQuery> {
    let reg = catalog::registry();
    Ok(
        SelectStatement::new(select_sql(reg, &[reaction.user_id_select()], "recipes", true)?)
            .push(join_sql(reg, reaction.user_joins(), JoinKind::Full)?)
            .filter(by_recipe_id(recipe_id, RECIPE_ALIASES)?)?
            .build(),
    )
}

pub fn ingredients_query(recipe_id: i32) -> SqlResult<BuiltQuery> {
    let reg = catalog::registry();
    let clause = WhereBuilder::new(reg)
        .mode(MatchMode::Strict)
        .aliases(RECIPE_INGREDIENT_ALIASES)
        .build(&ColumnValues::new().with("recipe_id", recipe_id))?;
    Ok(
        SelectStatement::new(select_sql(reg, INGREDIENT_COLUMNS, "recipes_ingredients", true)?)
            .push(join_sql(reg, INGREDIENT_RELATIONS, JoinKind::Inner)?)
            .filter(clause)?
            .build(),
    )
}

pub fn reviews_query(recipe_id: i32) -> SqlResult<BuiltQuery> {
    let reg = catalog::registry();
    let joins = [Join::new("recipes", "rv.recipe_id", "r.id")];
    Ok(SelectStatement::new(select_sql(
        reg,
        &["rv.stars", "rv.review", "rv.user_id"],
        "reviews",
        true,
    )?)
    .push(join_sql(reg, &joins, JoinKind::Inner)?)
    .filter(by_recipe_id(recipe_id, RECIPE_ALIASES)?)?
    .build())
}

pub fn list_all_query() -> SqlResult<BuiltQuery> {
    Ok(recipe_select()?.push("ORDER BY r.name ASC").build())
}

pub fn get_query(recipe_id: i32) -> SqlResult<BuiltQuery> {
    Ok(recipe_select()?
        .filter(by_recipe_id(recipe_id, RECIPE_ALIASES)?)?
        .build())
}

/// Loose search over the recipe filter keys, sorted per `orderBy`/`orderBy2`/`chronOrder`.
///
/// A direction without a sort key is rejected here, even though the
/// order-by builder alone would ignore it.
pub fn filter_query(request: &FilterRequest) -> SqlResult<BuiltQuery> {
    if request.contains(DIRECTION_KEY)
        && !request.contains(ORDER_BY_KEY)
        && !request.contains(ORDER_BY2_KEY)
    {
        return Err(SqlError::invalid_argument(
            "Must select order by for sort order to work!",
        ));
    }

    let reg = catalog::registry();
    let filters = RECIPE_FILTERS.normalize(request);
    let clause = WhereBuilder::new(reg)
        .aliases(RECIPE_ALIASES)
        .build(&filters)?;
    let order_by = OrderByBuilder::new(RECIPE_ALIASES)
        .translate(RECIPE_FILTERS)
        .build(request)?;

    Ok(recipe_select()?.filter(clause)?.push(order_by).build())
}

pub(crate) async fn ensure_recipe(conn: &impl GenericClient, recipe_id: i32) -> SqlResult<()> {
    let constraints = ColumnValues::new().with("id", recipe_id);
    row_exists(conn, catalog::registry(), "recipe", "id", "recipes", &constraints).await?;
    Ok(())
}

/// Ids of users who favourited (or saved) the recipe.
pub async fn favorite_or_saved_user_ids(
    conn: &impl GenericClient,
    recipe_id: i32,
    reaction: Reaction,
) -> SqlResult<Vec<i32>> {
    ensure_recipe(conn, recipe_id).await?;
    let rows = reaction_users_query(recipe_id, reaction)?.query(conn).await?;
    let column = reaction.user_id_column();
    rows.iter()
        .filter_map(|row| row.try_get_column::<Option<i32>>(column).transpose())
        .collect()
}

pub async fn ingredients(
    conn: &impl GenericClient,
    recipe_id: i32,
) -> SqlResult<Vec<RecipeIngredient>> {
    ensure_recipe(conn, recipe_id).await?;
    ingredients_query(recipe_id)?.query_as(conn).await
}

pub async fn reviews(conn: &impl GenericClient, recipe_id: i32) -> SqlResult<Vec<Review>> {
    ensure_recipe(conn, recipe_id).await?;
    reviews_query(recipe_id)?.query_as(conn).await
}

/// Fill `fav_user_ids` and `sav_user_ids` on every recipe.
pub async fn attach_reactions(conn: &impl GenericClient, recipes: &mut [Recipe]) -> SqlResult<()> {
    for recipe in recipes.iter_mut() {
        recipe.fav_user_ids =
            Some(favorite_or_saved_user_ids(conn, recipe.id, Reaction::Favorite).await?);
        recipe.sav_user_ids =
            Some(favorite_or_saved_user_ids(conn, recipe.id, Reaction::Saved).await?);
    }
    Ok(())
}

/// Fill `ingredients` and `reviews`.
pub async fn attach_details(conn: &impl GenericClient, recipe: &mut Recipe) -> SqlResult<()> {
    recipe.ingredients = Some(ingredients(conn, recipe.id).await?);
    recipe.reviews = Some(reviews(conn, recipe.id).await?);
    Ok(())
}

/// Every recipe by name, with favourite and saved user ids.
pub async fn list_all(conn: &impl GenericClient) -> SqlResult<Vec<Recipe>> {
    let mut recipes: Vec<Recipe> = list_all_query()?.query_as(conn).await?;
    attach_reactions(conn, &mut recipes).await?;
    Ok(recipes)
}

/// One recipe with reactions, ingredients and reviews.
pub async fn get(conn: &impl GenericClient, recipe_id: i32) -> SqlResult<Recipe> {
    ensure_recipe(conn, recipe_id).await?;
    let mut recipe: Recipe = get_query(recipe_id)?
        .query_opt_as(conn)
        .await?
        .ok_or_else(|| SqlError::not_found("recipe"))?;
    attach_reactions(conn, std::slice::from_mut(&mut recipe)).await?;
    attach_details(conn, &mut recipe).await?;
    Ok(recipe)
}

pub async fn filter(conn: &impl GenericClient, request: &FilterRequest) -> SqlResult<Vec<Recipe>> {
    let mut recipes: Vec<Recipe> = filter_query(request)?.query_as(conn).await?;
    attach_reactions(conn, &mut recipes).await?;
    Ok(recipes)
}

pub fn add_review_query(
    recipe_id: i32,
    user_id: i32,
    stars: i32,
    review: &str,
) -> SqlResult<BuiltQuery> {
    InsertBuilder::new(catalog::registry(), "reviews")
        .set("user_id", user_id)
        .set("stars", stars)
        .set("review", review)
        .set("recipe_id", recipe_id)
        .returning(&["stars", "review", "user_id"])
        .build()
}

pub async fn add_review(
    conn: &impl GenericClient,
    recipe_id: i32,
    user_id: i32,
    stars: i32,
    review: &str,
) -> SqlResult<Review> {
    ensure_recipe(conn, recipe_id).await?;
    add_review_query(recipe_id, user_id, stars, review)?
        .query_one_as(conn)
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use savour_sql::SqlValue;

    const RECIPE_SELECT: &str = "SELECT r.id, r.name, a.full_name AS author, rt.rating, \
        rt.vote_count, r.url, r.image, r.description, r.serves, d.level, m.main_cat_name, \
        s.sub_cat_name, r.steps, r.prep_time, r.cook_time FROM recipes r \
        JOIN authors a ON r.author_id = a.id JOIN ratings rt ON r.id = rt.recipe_id \
        JOIN difficulty d ON r.difficulty_id = d.id \
        JOIN main_category m ON r.main_category_id = m.id \
        JOIN sub_category s ON r.sub_category_id = s.id";

    #[test]
    fn reaction_users_use_full_join() {
        let q = reaction_users_query(6, Reaction::Favorite).unwrap();
        assert_eq!(
            q.sql(),
            "SELECT fr.user_id AS fav_user_id FROM recipes r \
             FULL JOIN favorite_recipes fr ON r.id = fr.recipe_id WHERE r.id = $1"
        );
        assert_eq!(q.params(), &[SqlValue::Int(6)]);

        let q = reaction_users_query(6, Reaction::Saved).unwrap();
        assert!(q.sql().starts_with(
            "SELECT sv.user_id AS sav_user_id FROM recipes r FULL JOIN saved_recipes sv"
        ));
    }

    #[test]
    fn ingredient_and_review_queries() {
        let q = ingredients_query(3).unwrap();
        assert_eq!(
            q.sql(),
            "SELECT ri.id, ri.qty, u.unit, ing.ingredient, ing.id AS ingredient_id, \
             u.id AS unit_id FROM recipes_ingredients ri JOIN units u ON ri.unit_id = u.id \
             JOIN ingredients ing ON ri.ingredient_id = ing.id WHERE ri.recipe_id = $1"
        );

        let q = reviews_query(3).unwrap();
        assert_eq!(
            q.sql(),
            "SELECT rv.stars, rv.review, rv.user_id FROM reviews rv \
             JOIN recipes r ON rv.recipe_id = r.id WHERE r.id = $1"
        );
        assert_eq!(q.params(), &[SqlValue::Int(3)]);
    }

    #[test]
    fn list_and_get() {
        assert_eq!(
            list_all_query().unwrap().sql(),
            format!("{RECIPE_SELECT} ORDER BY r.name ASC")
        );
        assert_eq!(
            get_query(9).unwrap().sql(),
            format!("{RECIPE_SELECT} WHERE r.id = $1")
        );
    }

    #[test]
    fn filter_is_loose_and_sorted() {
        let request = FilterRequest::new()
            .with("author", "ina")
            .with("rating", "4")
            .with("orderBy", "name")
            .with("orderBy2", "author")
            .with("chronOrder", "desc")
            .with("colour", "red");
        let q = filter_query(&request).unwrap();
        assert_eq!(
            q.sql(),
            format!(
                "{RECIPE_SELECT} WHERE a.full_name ILIKE $1 AND rt.rating = $2 \
                 ORDER BY r.name, a.full_name DESC"
            )
        );
        assert_eq!(q.params(), &[SqlValue::text("%ina%"), SqlValue::Int(4)]);
    }

    #[test]
    fn filter_without_filters_lists_everything() {
        let q = filter_query(&FilterRequest::new()).unwrap();
        assert_eq!(q.sql(), RECIPE_SELECT);
        assert!(q.params().is_empty());
    }

    #[test]
    fn filter_direction_needs_a_sort_key() {
        let err = filter_query(&FilterRequest::new().with("chronOrder", "asc")).unwrap_err();
        assert!(err.is_invalid_argument());
        assert!(err.to_string().contains("Must select order by"));

        let err = filter_query(&FilterRequest::new().with("rating", "lots")).unwrap_err();
        assert!(err.is_invalid_argument());
    }

    #[test]
    fn review_insert() {
        let q = add_review_query(4, 2, 5, "Good!").unwrap();
        assert_eq!(
            q.sql(),
            "INSERT INTO reviews (user_id, stars, review, recipe_id) VALUES ($1, $2, $3, $4) \
             RETURNING stars, review, user_id"
        );
        assert_eq!(
            q.params(),
            &[
                SqlValue::Int(2),
                SqlValue::Int(5),
                SqlValue::text("Good!"),
                SqlValue::Int(4)
            ]
        );
    }
}
