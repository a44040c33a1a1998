//! SQLite pool setup for the products database

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use tracing::info;

use crate::config::Config;

const CREATE_PRODUCTS_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS products (
        id            INTEGER PRIMARY KEY,
        product_name  TEXT NOT NULL,
        barcode       TEXT NOT NULL,
        expiry_date   TEXT NOT NULL,
        status        TEXT NOT NULL
    )
"#;

/// Open the products database described by `config`.
///
/// The database is opened read-only unless `database_create` is set, in which
/// case the file and the `products` table are created when missing.
pub async fn connect(config: &Config) -> Result<SqlitePool, StoreError> {
    let options = SqliteConnectOptions::new()
        .filename(&config.database_path)
        .read_only(!config.database_create)
        .create_if_missing(config.database_create);

    let pool = SqlitePoolOptions::new()
        .max_connections(config.db_max_connections)
        .connect_with(options)
        .await
        .map_err(StoreError::Connect)?;

    if config.database_create {
        ensure_schema(&pool).await?;
    }

    info!(
        path = %config.database_path.display(),
        read_only = !config.database_create,
        "Opened products database"
    );

    Ok(pool)
}

/// Create the `products` table if it does not exist yet
pub async fn ensure_schema(pool: &SqlitePool) -> Result<(), StoreError> {
    sqlx::query(CREATE_PRODUCTS_TABLE)
        .execute(pool)
        .await
        .map_err(StoreError::Query)?;
    Ok(())
}

/// Store errors
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Failed to open database: {0}")]
    Connect(sqlx::Error),

    #[error("Query failed: {0}")]
    Query(#[from] sqlx::Error),
}

/// In-memory pool with no tables
#[cfg(test)]
pub(crate) async fn bare_memory_pool() -> SqlitePool {
    use std::str::FromStr;

    let options = SqliteConnectOptions::from_str("sqlite::memory:").unwrap();
    // a single long-lived connection keeps the in-memory database alive
    SqlitePoolOptions::new()
        .max_connections(1)
        .min_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await
        .unwrap()
}

/// In-memory pool with the products table, shared by tests across modules
#[cfg(test)]
pub(crate) async fn memory_pool() -> SqlitePool {
    let pool = bare_memory_pool().await;
    ensure_schema(&pool).await.unwrap();
    pool
}

#[cfg(test)]
pub(crate) async fn insert_product(
    pool: &SqlitePool,
    id: i64,
    name: &str,
    barcode: &str,
    expiry_date: &str,
    status: &str,
) {
    sqlx::query(
        "INSERT INTO products (id, product_name, barcode, expiry_date, status) VALUES (?, ?, ?, ?, ?)",
    )
    .bind(id)
    .bind(name)
    .bind(barcode)
    .bind(expiry_date)
    .bind(status)
    .execute(pool)
    .await
    .unwrap();
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn file_config(path: std::path::PathBuf, create: bool) -> Config {
        Config {
            server_addr: "127.0.0.1:0".parse().unwrap(),
            log_level: "info".to_string(),
            log_json: false,
            database_path: path,
            database_create: create,
            db_max_connections: 1,
            request_timeout: Duration::from_secs(5),
        }
    }

    fn temp_db_path(tag: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("product_qr_viewer_{}_{}.db", tag, std::process::id()))
    }

    #[tokio::test]
    async fn creates_database_when_allowed() {
        let path = temp_db_path("create");
        let _ = std::fs::remove_file(&path);

        let pool = connect(&file_config(path.clone(), true)).await.unwrap();
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM products")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(count.0, 0);

        pool.close().await;
        let _ = std::fs::remove_file(&path);
    }

    #[tokio::test]
    async fn read_only_open_fails_for_missing_file() {
        let path = temp_db_path("missing");
        let _ = std::fs::remove_file(&path);

        let result = connect(&file_config(path, false)).await;
        assert!(matches!(result, Err(StoreError::Connect(_))));
    }
}
