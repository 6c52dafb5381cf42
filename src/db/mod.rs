use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;

pub mod coupon_repository;

// Usage rows deliberately carry no foreign key: deleting a coupon leaves its
// history in place.
const SCHEMA: [&str; 3] = [
    r#"CREATE TABLE IF NOT EXISTS coupons (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        coupon_code TEXT UNIQUE NOT NULL,
        is_used BOOLEAN NOT NULL DEFAULT 0
    )"#,
    r#"CREATE TABLE IF NOT EXISTS coupon_uses (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        coupon_id INTEGER NOT NULL,
        youtube_hashtag TEXT NOT NULL,
        selected_numbers TEXT NOT NULL,
        used_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
    )"#,
    r#"CREATE TABLE IF NOT EXISTS lotto_draws (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        draw_no INTEGER NOT NULL,
        draw_date TEXT NOT NULL,
        youtube_hashtag TEXT NOT NULL,
        coupon_use_id INTEGER
    )"#,
];

pub async fn initialize_db(connection_string: &str) -> anyhow::Result<SqlitePool> {
    create_database_directory(connection_string)?;

    let options = SqliteConnectOptions::from_str(connection_string)?.create_if_missing(true);
    let pool = SqlitePoolOptions::new().connect_with(options).await?;
    create_schema(&pool).await?;
    tracing::info!("Connected to database at {}.", connection_string);
    Ok(pool)
}

pub async fn create_schema(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    for statement in SCHEMA {
        sqlx::query(statement).execute(pool).await?;
    }
    Ok(())
}

fn create_database_directory(connection_string: &str) -> anyhow::Result<()> {
    let path = connection_string
        .trim_start_matches("sqlite://")
        .trim_start_matches("sqlite:")
        .split('?')
        .next()
        .unwrap_or_default();

    if path.is_empty() || path.starts_with(":memory:") {
        return Ok(());
    }

    if let Some(parent) = std::path::Path::new(path).parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
            tracing::info!("Created database directory at {}.", parent.display());
        }
    }
    Ok(())
}
