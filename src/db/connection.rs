use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;

use crate::error::AppError;

/// Creates the PostgreSQL connection pool, retrying a few times so the
/// server survives the database coming up slightly later than it does.
pub async fn create_pool(database_url: &str) -> Result<PgPool, AppError> {
    log::info!("Creating database connection pool");

    let max_retries = 3;
    let mut last_error = None;

    for attempt in 1..=max_retries {
        match PgPoolOptions::new()
            .max_connections(10)
            .acquire_timeout(Duration::from_secs(5))
            .idle_timeout(Duration::from_secs(60))
            .connect(database_url)
            .await
        {
            Ok(pool) => {
                log::info!("Successfully connected to database");
                return Ok(pool);
            }
            Err(e) => {
                log::warn!(
                    "Database connection attempt {} of {} failed: {}",
                    attempt,
                    max_retries,
                    e
                );
                last_error = Some(e);
                if attempt < max_retries {
                    tokio::time::sleep(Duration::from_secs(2 * attempt as u64)).await;
                }
            }
        }
    }

    let error = last_error
        .map(|e| e.to_string())
        .unwrap_or_else(|| "unknown database connection error".to_string());
    log::error!("All database connection attempts failed: {}", error);
    Err(AppError::Database(error))
}

/// Verifies the connection with a trivial query; used at startup.
pub async fn verify_connection(pool: &PgPool) -> Result<(), AppError> {
    sqlx::query_as::<_, (i32,)>("SELECT 1 as result")
        .fetch_optional(pool)
        .await
        .map_err(|e| {
            log::error!("Database connection verification failed: {}", e);
            AppError::from(e)
        })?;

    log::debug!("Database connection verified");
    Ok(())
}

/// Creates the users and tickets tables if they do not exist. Timestamps
/// are stored as ISO-8601 text, matching what the API serves back.
pub async fn init_schema(pool: &PgPool) -> Result<(), AppError> {
    sqlx::query(
        "CREATE TABLE IF NOT EXISTS users (
            id TEXT PRIMARY KEY,
            email TEXT UNIQUE NOT NULL,
            name TEXT NOT NULL,
            role TEXT NOT NULL,
            sector TEXT,
            password_hash TEXT NOT NULL,
            created_at TEXT NOT NULL
        )",
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE TABLE IF NOT EXISTS tickets (
            id TEXT PRIMARY KEY,
            title TEXT NOT NULL,
            description TEXT NOT NULL,
            category TEXT NOT NULL,
            priority TEXT NOT NULL,
            status TEXT NOT NULL,
            location TEXT,
            requester_name TEXT,
            requester_sector TEXT,
            assigned_to TEXT,
            user_id TEXT NOT NULL,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )",
    )
    .execute(pool)
    .await?;

    log::info!("Database schema verified");
    Ok(())
}
