//! Response shapes returned by the data-access functions.
//!
//! Field names are the JSON keys clients see.

use savour_sql::{FromRow, RowExt, SqlResult};
use serde::Serialize;
use tokio_postgres::Row;

/// A recipe with its author, rating, difficulty and categories.
///
/// The relation lists are `None` until a caller attaches them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recipe {
    pub id: i32,
    pub name: String,
    pub author: String,
    pub rating: i32,
    pub vote_count: i32,
    pub url: Option<String>,
    pub image: Option<String>,
    pub description: Option<String>,
    pub serves: Option<String>,
    pub level: String,
    pub main_cat_name: String,
    pub sub_cat_name: String,
    pub steps: Option<String>,
    pub prep_time: Option<String>,
    pub cook_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fav_user_ids: Option<Vec<i32>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sav_user_ids: Option<Vec<i32>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ingredients: Option<Vec<RecipeIngredient>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reviews: Option<Vec<Review>>,
}

impl FromRow for Recipe {
    fn from_row(row: &Row) -> SqlResult<Self> {
        Ok(Self {
            id: row.try_get_column("id")?,
            name: row.try_get_column("name")?,
            author: row.try_get_column("author")?,
            rating: row.try_get_column("rating")?,
            vote_count: row.try_get_column("vote_count")?,
            url: row.try_get_column("url")?,
            image: row.try_get_column("image")?,
            description: row.try_get_column("description")?,
            serves: row.try_get_column("serves")?,
            level: row.try_get_column("level")?,
            main_cat_name: row.try_get_column("main_cat_name")?,
            sub_cat_name: row.try_get_column("sub_cat_name")?,
            steps: row.try_get_column("steps")?,
            prep_time: row.try_get_column("prep_time")?,
            cook_time: row.try_get_column("cook_time")?,
            fav_user_ids: None,
            sav_user_ids: None,
            ingredients: None,
            reviews: None,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecipeIngredient {
    pub id: i32,
    pub qty: Option<String>,
    pub unit: String,
    pub ingredient: String,
    pub ingredient_id: i32,
    pub unit_id: i32,
}

impl FromRow for RecipeIngredient {
    fn from_row(row: &Row) -> SqlResult<Self> {
        Ok(Self {
            id: row.try_get_column("id")?,
            qty: row.try_get_column("qty")?,
            unit: row.try_get_column("unit")?,
            ingredient: row.try_get_column("ingredient")?,
            ingredient_id: row.try_get_column("ingredient_id")?,
            unit_id: row.try_get_column("unit_id")?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Review {
    pub stars: i32,
    pub review: Option<String>,
    pub user_id: i32,
}

impl FromRow for Review {
    fn from_row(row: &Row) -> SqlResult<Self> {
        Ok(Self {
            stars: row.try_get_column("stars")?,
            review: row.try_get_column("review")?,
            user_id: row.try_get_column("user_id")?,
        })
    }
}

/// A user profile. The password hash is never part of it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
    pub id: i32,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub header_img: Option<String>,
    pub profile_img: Option<String>,
    pub is_admin: bool,
}

impl FromRow for User {
    fn from_row(row: &Row) -> SqlResult<Self> {
        Ok(Self {
            id: row.try_get_column("id")?,
            username: row.try_get_column("username")?,
            first_name: row.try_get_column("first_name")?,
            last_name: row.try_get_column("last_name")?,
            email: row.try_get_column("email")?,
            phone: row.try_get_column("phone")?,
            header_img: row.try_get_column("header_img")?,
            profile_img: row.try_get_column("profile_img")?,
            is_admin: row.try_get_column("is_admin")?,
        })
    }
}

/// What a login check needs. Not serializable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub id: i32,
    pub username: String,
    pub password_hash: String,
}

impl FromRow for Credentials {
    fn from_row(row: &Row) -> SqlResult<Self> {
        Ok(Self {
            id: row.try_get_column("id")?,
            username: row.try_get_column("username")?,
            password_hash: row.try_get_column("password")?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecipeList {
    pub id: i32,
    pub list_name: String,
    pub occasion: String,
}

impl FromRow for RecipeList {
    fn from_row(row: &Row) -> SqlResult<Self> {
        Ok(Self {
            id: row.try_get_column("id")?,
            list_name: row.try_get_column("list_name")?,
            occasion: row.try_get_column("occasion")?,
        })
    }
}

/// A recipe list with its recipes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListRecipes {
    pub list_name: String,
    pub occasion: String,
    pub recipes: Vec<Recipe>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShoppingList {
    pub id: i32,
    pub list_name: String,
    pub recipe_id: Option<i32>,
}

impl FromRow for ShoppingList {
    fn from_row(row: &Row) -> SqlResult<Self> {
        Ok(Self {
            id: row.try_get_column("id")?,
            list_name: row.try_get_column("list_name")?,
            recipe_id: row.try_get_column("recipe_id")?,
        })
    }
}

/// One ingredient line of a shopping list or a user recipe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListItem {
    pub id: i32,
    pub qty: Option<String>,
    pub unit: String,
    pub ingredient: String,
}

impl FromRow for ListItem {
    fn from_row(row: &Row) -> SqlResult<Self> {
        Ok(Self {
            id: row.try_get_column("id")?,
            qty: row.try_get_column("qty")?,
            unit: row.try_get_column("unit")?,
            ingredient: row.try_get_column("ingredient")?,
        })
    }
}

/// A shopping list with the recipe it was made for.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShoppingListDetail {
    pub list_name: String,
    pub recipe_name: Option<String>,
    pub recipe_author: Option<String>,
    pub recipes_ingredients: Vec<RecipeIngredient>,
    pub list_items: Vec<ListItem>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserRecipeSummary {
    pub id: i32,
    pub recipe_name: String,
}

impl FromRow for UserRecipeSummary {
    fn from_row(row: &Row) -> SqlResult<Self> {
        Ok(Self {
            id: row.try_get_column("id")?,
            recipe_name: row.try_get_column("recipe_name")?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Step {
    pub step: String,
}

impl FromRow for Step {
    fn from_row(row: &Row) -> SqlResult<Self> {
        Ok(Self {
            step: row.try_get_column("step")?,
        })
    }
}

/// A user's own recipe variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserRecipe {
    pub recipe_name: String,
    pub ingredients: Vec<ListItem>,
    pub steps: Vec<Step>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Ingredient {
    pub id: i32,
    pub ingredient: String,
}

impl FromRow for Ingredient {
    fn from_row(row: &Row) -> SqlResult<Self> {
        Ok(Self {
            id: row.try_get_column("id")?,
            ingredient: row.try_get_column("ingredient")?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Occasion {
    pub id: i32,
    pub occasion: String,
}

impl FromRow for Occasion {
    fn from_row(row: &Row) -> SqlResult<Self> {
        Ok(Self {
            id: row.try_get_column("id")?,
            occasion: row.try_get_column("occasion")?,
        })
    }
}

/// Confirmation body for writes that return no rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Message {
    pub message: String,
}

impl Message {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
