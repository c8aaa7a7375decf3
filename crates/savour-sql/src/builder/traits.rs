use super::query::BuiltQuery;
use crate::client::GenericClient;
use crate::error::SqlResult;
use crate::row::FromRow;
use crate::value::{SqlValue, params_ref};
use tokio_postgres::Row;
use tokio_postgres::types::ToSql;

/// Emit the statement about to run. Values are never logged.
fn log_statement(sql: &str, params: usize) {
    tracing::debug!(target: "savour.sql", sql = %sql, params, "executing statement");
}

/// Base trait for executable statements.
pub trait SqlBuilder: Sync {
    /// Build the SQL string.
    fn build_sql(&self) -> String;

    /// Bound values in placeholder order.
    fn params(&self) -> &[SqlValue];

    /// Get parameters as references compatible with tokio-postgres.
    fn params_ref(&self) -> Vec<&(dyn ToSql + Sync)> {
        params_ref(self.params())
    }

    /// Execute query and return all rows.
    fn query(
        &self,
        conn: &impl GenericClient,
    ) -> impl std::future::Future<Output = SqlResult<Vec<Row>>> + Send {
        async move {
            let sql = self.build_sql();
            let params = self.params_ref();
            log_statement(&sql, params.len());
            conn.query(&sql, &params).await
        }
    }

    /// Execute query and return at most one row.
    fn query_opt(
        &self,
        conn: &impl GenericClient,
    ) -> impl std::future::Future<Output = SqlResult<Option<Row>>> + Send {
        async move {
            let sql = self.build_sql();
            let params = self.params_ref();
            log_statement(&sql, params.len());
            conn.query_opt(&sql, &params).await
        }
    }

    /// Execute query and return exactly one row.
    fn query_one(
        &self,
        conn: &impl GenericClient,
    ) -> impl std::future::Future<Output = SqlResult<Row>> + Send {
        async move {
            let sql = self.build_sql();
            let params = self.params_ref();
            log_statement(&sql, params.len());
            conn.query_one(&sql, &params).await
        }
    }

    /// Execute query and map all rows to `T`.
    fn query_as<T: FromRow>(
        &self,
        conn: &impl GenericClient,
    ) -> impl std::future::Future<Output = SqlResult<Vec<T>>> + Send {
        async move {
            let rows = self.query(conn).await?;
            rows.iter().map(T::from_row).collect()
        }
    }

    /// Execute query and map at most one row to `T`.
    fn query_opt_as<T: FromRow>(
        &self,
        conn: &impl GenericClient,
    ) -> impl std::future::Future<Output = SqlResult<Option<T>>> + Send {
        async move {
            let row = self.query_opt(conn).await?;
            row.as_ref().map(T::from_row).transpose()
        }
    }

    /// Execute query and map exactly one row to `T`.
    fn query_one_as<T: FromRow>(
        &self,
        conn: &impl GenericClient,
    ) -> impl std::future::Future<Output = SqlResult<T>> + Send {
        async move {
            let row = self.query_one(conn).await?;
            T::from_row(&row)
        }
    }
}

/// Trait for INSERT/UPDATE/DELETE statements.
pub trait MutationBuilder: SqlBuilder {
    /// Execute and return affected row count.
    fn execute(
        &self,
        conn: &impl GenericClient,
    ) -> impl std::future::Future<Output = SqlResult<u64>> + Send {
        async move {
            let sql = self.build_sql();
            let params = self.params_ref();
            log_statement(&sql, params.len());
            conn.execute(&sql, &params).await
        }
    }
}

impl SqlBuilder for BuiltQuery {
    fn build_sql(&self) -> String {
        self.sql().to_string()
    }

    fn params(&self) -> &[SqlValue] {
        BuiltQuery::params(self)
    }
}

impl MutationBuilder for BuiltQuery {}
