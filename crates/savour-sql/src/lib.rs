//! # savour-sql
//!
//! Registry-driven SQL generation for Postgres.
//!
//! ## Features
//!
//! - **Schema registry**: table aliases, per-column operators and numeric
//!   coercion, and a writable-table allow-list, all fixed at startup
//! - **Fragment builders**: SELECT, JOIN, WHERE and ORDER BY pieces with
//!   `$N` placeholder bookkeeping
//! - **Statement assemblers**: INSERT/UPDATE with optional RETURNING
//! - **Existence guard**: `NotFound` before trusting a caller-supplied id
//! - **Transaction-friendly**: pass a transaction anywhere a `GenericClient` is expected
//!
//! ## Example
//!
//! ```ignore
//! use savour_sql::builder::{WhereBuilder, select_sql, SelectStatement, SqlBuilder};
//! use savour_sql::ColumnValues;
//!
//! let filter = WhereBuilder::new(&registry)
//!     .build(&ColumnValues::new().with("name", "soup"))?;
//! let rows = SelectStatement::new(select_sql(&registry, &["name"], "recipes", false)?)
//!     .filter(filter)?
//!     .build()
//!     .query(&client)
//!     .await?;
//! ```

pub mod builder;
pub mod client;
pub mod error;
pub mod filter;
pub mod guard;
pub mod ident;
pub mod registry;
pub mod row;
pub mod value;

pub use builder::{
    BuiltClause, BuiltQuery, DeleteBuilder, Direction, InsertBuilder, Join, JoinKind, MutationBuilder,
    OrderByBuilder, SelectStatement, SqlBuilder, UpdateBuilder, WhereBuilder, join_sql,
    select_sql,
};
pub use client::GenericClient;
pub use error::{SqlError, SqlResult};
pub use filter::{FilterMap, FilterRequest};
pub use guard::{ensure_found, existence_query, row_exists};
pub use registry::{AliasMap, ColumnPolicy, MatchMode, Operator, SchemaRegistry, TableDescriptor};
pub use row::{FromRow, RowExt};
pub use value::{ColumnValues, SqlValue};

#[cfg(feature = "pool")]
pub mod pool;

#[cfg(feature = "pool")]
pub use pool::{create_pool, create_pool_with_config};
