//! Schema routing and the session-scoped unit of work.
//!
//! One database serves many tenants by giving each tenant its own schema.
//! [`TenantDb::session`] checks a connection out of the pool and issues
//! `SET search_path TO "<schema>"` on it, so every unqualified table name in
//! subsequent statements resolves inside that tenant's schema until the
//! session is released. The binding is per-connection state: concurrent
//! sessions bound to different tenants never interfere, and the pool's
//! `after_release` hook resets the search path before a connection is handed
//! to the next request.
//!
//! A [`TenantSession`] owns its connection exclusively (`&mut` access), which
//! makes sharing one open session across tasks unrepresentable.

use sqlx::pool::PoolConnection;
use sqlx::{Connection, PgConnection, PgPool, Postgres, Transaction};

use washboard_core::SchemaName;

use super::RepositoryError;

/// Bind a connection to a tenant schema.
///
/// The schema name is interpolated into the statement (identifiers cannot be
/// bound as parameters); [`SchemaName`] validation is what makes that safe.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the statement fails. A
/// non-existent schema does not fail here - `PostgreSQL` accepts unknown
/// names in `search_path` - but every subsequent query against the tenant's
/// tables will, which is fatal for the unit of work. There is no fallback to
/// `public`.
pub async fn bind_schema(
    conn: &mut PgConnection,
    schema: &SchemaName,
) -> Result<(), RepositoryError> {
    let statement = format!(r#"SET search_path TO "{schema}""#);
    sqlx::query(&statement).execute(conn).await?;
    Ok(())
}

/// Handle to the pool that hands out tenant-bound sessions.
#[derive(Clone)]
pub struct TenantDb {
    pool: PgPool,
}

impl TenantDb {
    /// Wrap an existing pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// The underlying pool, for work that is not tenant-scoped
    /// (schema discovery, migrations).
    #[must_use]
    pub const fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Check out a connection and bind it to `schema`.
    ///
    /// The schema must already exist: `PostgreSQL` tolerates unknown names in
    /// `search_path`, which would otherwise surface later as confusing
    /// missing-relation errors, so existence is verified up front.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::UnknownSchema` if the schema does not exist,
    /// or `RepositoryError::Database` if no connection can be acquired or the
    /// binding statement fails.
    pub async fn session(&self, schema: &SchemaName) -> Result<TenantSession, RepositoryError> {
        let mut conn = self.pool.acquire().await?;

        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM information_schema.schemata WHERE schema_name = $1)",
        )
        .bind(schema.as_str())
        .fetch_one(&mut *conn)
        .await?;
        if !exists {
            return Err(RepositoryError::UnknownSchema(schema.to_string()));
        }

        bind_schema(&mut conn, schema).await?;
        Ok(TenantSession {
            conn,
            schema: schema.clone(),
        })
    }
}

/// A pooled connection bound to exactly one tenant schema.
///
/// The session is the unit-of-work boundary:
///
/// - work that must be atomic runs inside [`TenantSession::begin`]; commit is
///   explicit, and a transaction dropped without commit rolls back
/// - nested `begin` calls on the same connection become savepoints (sqlx
///   semantics), so reentrant acquisition inside one logical request cannot
///   leak connections
/// - dropping the session returns the connection to the pool on every exit
///   path, where the `after_release` hook unbinds the schema
pub struct TenantSession {
    conn: PoolConnection<Postgres>,
    schema: SchemaName,
}

impl TenantSession {
    /// The schema this session is bound to.
    #[must_use]
    pub const fn schema(&self) -> &SchemaName {
        &self.schema
    }

    /// Exclusive access to the bound connection.
    pub fn conn(&mut self) -> &mut PgConnection {
        &mut self.conn
    }

    /// Start a transaction on the bound connection.
    ///
    /// Statements inside the transaction still see the tenant's search path;
    /// the binding is connection state, not transaction state.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if `BEGIN` fails.
    pub async fn begin(&mut self) -> Result<Transaction<'_, Postgres>, RepositoryError> {
        Ok(Connection::begin(&mut *self.conn).await?)
    }
}

impl std::fmt::Debug for TenantSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TenantSession")
            .field("schema", &self.schema)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use washboard_core::SchemaName;

    #[test]
    fn test_bind_statement_quotes_schema() {
        // The statement built by bind_schema must quote the identifier so a
        // schema named like a keyword still binds.
        let schema = SchemaName::parse("tenant_order").unwrap();
        let statement = format!(r#"SET search_path TO "{schema}""#);
        assert_eq!(statement, r#"SET search_path TO "tenant_order""#);
    }
}
