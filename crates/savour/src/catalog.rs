//! The recipe catalog's schema metadata.
//!
//! Everything here is fixed at compile time and read-only at run time. The
//! process-wide [`registry`] is built on first use.

use savour_sql::{AliasMap, ColumnPolicy, FilterMap, Join, SchemaRegistry, TableDescriptor};
use std::sync::LazyLock;

pub const TABLES: &[TableDescriptor] = &[
    TableDescriptor::new("authors", "a"),
    TableDescriptor::new("units", "u"),
    TableDescriptor::new("ingredients", "ing"),
    TableDescriptor::new("main_category", "m"),
    TableDescriptor::new("sub_category", "s"),
    TableDescriptor::new("difficulty", "d"),
    TableDescriptor::new("recipes", "r"),
    TableDescriptor::new("recipes_ingredients", "ri"),
    TableDescriptor::new("ratings", "rt"),
    TableDescriptor::new("users", "usr"),
    TableDescriptor::new("disliked_recipes", "dis"),
    TableDescriptor::new("liked_recipes", "lik"),
    TableDescriptor::new("favorite_recipes", "fr"),
    TableDescriptor::new("saved_recipes", "sv"),
    TableDescriptor::new("occasions", "o"),
    TableDescriptor::new("recipelists", "rl"),
    TableDescriptor::new("recipelists_recipes", "rlr"),
    TableDescriptor::new("tips", "t"),
    TableDescriptor::new("reviews", "rv"),
    TableDescriptor::new("shoppinglists", "sl"),
    TableDescriptor::new("shoppinglists_items", "sli"),
    TableDescriptor::new("user_recipes", "ur"),
    TableDescriptor::new("user_recipes_ingredients", "uri"),
    TableDescriptor::new("user_recipes_steps", "urs"),
];

/// Tables that accept INSERT/UPDATE/DELETE besides the aliased ones.
const EXTRA_WRITABLE: &[&str] = &["view_later"];

pub const COLUMNS: &[ColumnPolicy] = &[
    // ids and counts
    ColumnPolicy::numeric("id"),
    ColumnPolicy::numeric("user_id"),
    ColumnPolicy::numeric("recipe_id"),
    ColumnPolicy::numeric("list_id"),
    ColumnPolicy::numeric("user_recipe_id"),
    ColumnPolicy::numeric("ingredient_id"),
    ColumnPolicy::numeric("unit_id"),
    ColumnPolicy::numeric("occasion_id"),
    ColumnPolicy::numeric("rating"),
    ColumnPolicy::numeric("vote_count"),
    ColumnPolicy::numeric("stars"),
    // users
    ColumnPolicy::text("username"),
    ColumnPolicy::text("first_name"),
    ColumnPolicy::text("last_name"),
    ColumnPolicy::text("email"),
    ColumnPolicy::text("phone"),
    ColumnPolicy::text("header_img"),
    ColumnPolicy::text("profile_img"),
    ColumnPolicy::text("password"),
    // recipes and lookups
    ColumnPolicy::text("full_name"),
    ColumnPolicy::text("name"),
    ColumnPolicy::text("main_cat_name"),
    ColumnPolicy::text("sub_cat_name"),
    ColumnPolicy::text("level"),
    ColumnPolicy::text("ingredient"),
    ColumnPolicy::text("unit"),
    ColumnPolicy::text("occasion"),
    ColumnPolicy::text("qty"),
    ColumnPolicy::text("review"),
    ColumnPolicy::text("tip"),
    // lists and user recipes
    ColumnPolicy::text("list_name"),
    ColumnPolicy::text("recipe_name"),
    ColumnPolicy::text("step"),
];

pub fn registry() -> &'static SchemaRegistry {
    static REGISTRY: LazyLock<SchemaRegistry> = LazyLock::new(|| {
        let mut writable: Vec<&'static str> = TABLES.iter().map(|t| t.name).collect();
        writable.extend_from_slice(EXTRA_WRITABLE);
        SchemaRegistry::new()
            .with_tables(TABLES)
            .with_columns(COLUMNS)
            .with_writables(&writable)
    });
    &REGISTRY
}

// ---- joins ----

/// Author, rating, difficulty and categories of `recipes r`.
pub const RECIPE_RELATIONS: &[Join<'static>] = &[
    Join::new("authors", "r.author_id", "a.id"),
    Join::new("ratings", "r.id", "rt.recipe_id"),
    Join::new("difficulty", "r.difficulty_id", "d.id"),
    Join::new("main_category", "r.main_category_id", "m.id"),
    Join::new("sub_category", "r.sub_category_id", "s.id"),
];

pub const FAVORITE_RECIPE_RELATIONS: &[Join<'static>] = &[
    Join::new("recipes", "fr.recipe_id", "r.id"),
    Join::new("authors", "r.author_id", "a.id"),
    Join::new("ratings", "r.id", "rt.recipe_id"),
    Join::new("difficulty", "r.difficulty_id", "d.id"),
    Join::new("main_category", "r.main_category_id", "m.id"),
    Join::new("sub_category", "r.sub_category_id", "s.id"),
];

pub const SAVED_RECIPE_RELATIONS: &[Join<'static>] = &[
    Join::new("recipes", "sv.recipe_id", "r.id"),
    Join::new("authors", "r.author_id", "a.id"),
    Join::new("ratings", "r.id", "rt.recipe_id"),
    Join::new("difficulty", "r.difficulty_id", "d.id"),
    Join::new("main_category", "r.main_category_id", "m.id"),
    Join::new("sub_category", "r.sub_category_id", "s.id"),
];

/// Unit and ingredient rows of `recipes_ingredients ri`.
pub const INGREDIENT_RELATIONS: &[Join<'static>] = &[
    Join::new("units", "ri.unit_id", "u.id"),
    Join::new("ingredients", "ri.ingredient_id", "ing.id"),
];

pub const FAVORITE_USERS: &[Join<'static>] =
    &[Join::new("favorite_recipes", "r.id", "fr.recipe_id")];

pub const SAVED_USERS: &[Join<'static>] = &[Join::new("saved_recipes", "r.id", "sv.recipe_id")];

// ---- select lists ----

pub const RECIPE_COLUMNS: &[&str] = &[
    "r.id",
    "r.name",
    "a.full_name AS author",
    "rt.rating",
    "rt.vote_count",
    "r.url",
    "r.image",
    "r.description",
    "r.serves",
    "d.level",
    "m.main_cat_name",
    "s.sub_cat_name",
    "r.steps",
    "r.prep_time",
    "r.cook_time",
];

pub const INGREDIENT_COLUMNS: &[&str] = &[
    "ri.id",
    "ri.qty",
    "u.unit",
    "ing.ingredient",
    "ing.id AS ingredient_id",
    "u.id AS unit_id",
];

/// Profile columns returned from user writes. Never includes `password`.
pub const USER_PROFILE_COLUMNS: &[&str] = &[
    "id",
    "username",
    "first_name",
    "last_name",
    "email",
    "phone",
    "header_img",
    "profile_img",
];

// ---- filters and aliases ----

/// Client filter keys accepted by the recipe search.
pub const RECIPE_FILTERS: FilterMap<'static> = FilterMap::new(&[
    ("author", "full_name"),
    ("name", "name"),
    ("maincategory", "main_cat_name"),
    ("subcategory", "sub_cat_name"),
    ("rating", "rating"),
    ("id", "id"),
    ("difficulty", "level"),
]);

/// Owning alias of each column in the recipe relation select.
pub const RECIPE_ALIASES: AliasMap<'static> = AliasMap::new(&[
    ("full_name", "a."),
    ("name", "r."),
    ("main_cat_name", "m."),
    ("sub_cat_name", "s."),
    ("rating", "rt."),
    ("id", "r."),
    ("level", "d."),
]);

pub const FAVORITE_ALIASES: AliasMap<'static> =
    AliasMap::new(&[("user_id", "fr."), ("recipe_id", "fr.")]);

pub const SAVED_ALIASES: AliasMap<'static> =
    AliasMap::new(&[("user_id", "sv."), ("recipe_id", "sv.")]);

pub const RECIPE_INGREDIENT_ALIASES: AliasMap<'static> =
    AliasMap::new(&[("id", "ri."), ("recipe_id", "ri.")]);
