//! Statement fragment builders and assemblers.
//!
//! Every builder reads table/column metadata from a [`SchemaRegistry`] and
//! returns SQL text plus an ordered parameter list. Nothing caller-supplied is
//! spliced into SQL except identifiers, which are validated first.
//!
//! - [`join_sql`] / [`select_sql`] produce parameterless fragments.
//! - [`WhereBuilder`] numbers placeholders from a caller-chosen start.
//! - [`OrderByBuilder`] reads the sort keys of a filter request.
//! - [`InsertBuilder`] / [`UpdateBuilder`] / [`DeleteBuilder`] produce
//!   complete statements for writable tables.
//! - [`SelectStatement`] stitches fragments together.
//!
//! [`SchemaRegistry`]: crate::registry::SchemaRegistry

pub mod delete;
pub mod insert;
pub mod join;
pub mod order_by;
pub mod query;
pub mod select;
pub mod traits;
pub mod update;
pub mod where_builder;

pub use delete::DeleteBuilder;
pub use insert::InsertBuilder;
pub use join::{Join, JoinKind, join_sql};
pub use order_by::{Direction, OrderByBuilder};
pub use query::{BuiltQuery, SelectStatement};
pub use select::select_sql;
pub use traits::{MutationBuilder, SqlBuilder};
pub use update::UpdateBuilder;
pub use where_builder::{BuiltClause, WhereBuilder};

#[cfg(test)]
mod tests;
