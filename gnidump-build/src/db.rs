//! Connection pool, schema reset and migration.

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::info;

use gnidump_core::Config;

use crate::error::Result;
use crate::schema;

/// Maximum connections in the shared pool. Bulk loads hold one connection
/// each; fifteen leaves headroom for the reconciliation queries.
const MAX_CONNECTIONS: u32 = 15;

pub(crate) async fn connect(cfg: &Config) -> Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(MAX_CONNECTIONS)
        .connect(&cfg.pg_url())
        .await?;
    Ok(pool)
}

/// Drops and recreates the `public` schema. The target database belongs to
/// the build; nothing else is expected to live in it.
pub(crate) async fn reset_db(pool: &PgPool, cfg: &Config) -> Result<()> {
    info!("resetting database");
    let statements = [
        "DROP SCHEMA IF EXISTS public CASCADE".to_string(),
        "CREATE SCHEMA public".to_string(),
        "GRANT ALL ON SCHEMA public TO postgres".to_string(),
        format!("GRANT ALL ON SCHEMA public TO {}", cfg.pg_user),
        "COMMENT ON SCHEMA public IS 'standard public schema'".to_string(),
    ];
    for statement in &statements {
        sqlx::query(statement).execute(pool).await?;
    }
    info!("database reset");
    Ok(())
}

/// Creates all target tables and their secondary indexes.
pub(crate) async fn migrate(pool: &PgPool) -> Result<()> {
    info!("running database migrations");
    for statement in schema::CREATE_TABLES {
        sqlx::query(statement).execute(pool).await?;
    }
    for statement in schema::CREATE_INDEXES {
        sqlx::query(statement).execute(pool).await?;
    }
    info!("database migrations completed");
    Ok(())
}

/// Truncates one table; every import phase clears its own target first.
pub(crate) async fn truncate_table(pool: &PgPool, table: &str) -> Result<()> {
    sqlx::query(&format!("TRUNCATE TABLE {table}"))
        .execute(pool)
        .await?;
    Ok(())
}
