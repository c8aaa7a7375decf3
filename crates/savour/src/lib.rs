//! # savour
//!
//! Data access for the Savour recipe catalog, built on `savour-sql`.
//!
//! Every function takes `&impl GenericClient`, so the same call runs on a
//! pooled connection or inside a transaction:
//!
//! ```ignore
//! use savour::{Config, recipes};
//! use savour_sql::FilterRequest;
//!
//! let config = Config::from_env()?;
//! let pool = config.create_pool()?;
//! let client = pool.get().await?;
//!
//! let request = FilterRequest::new()
//!     .with("author", "ina")
//!     .with("orderBy", "rating")
//!     .with("chronOrder", "desc");
//! let found = recipes::filter(&client, &request).await?;
//! ```

pub mod catalog;
pub mod config;
pub mod ingredients;
pub mod lists;
pub mod models;
pub mod occasions;
pub mod recipes;
pub mod rows;
pub mod user_recipes;
pub mod users;

pub use config::{Config, DatabaseConfig, Environment};
pub use recipes::Reaction;
