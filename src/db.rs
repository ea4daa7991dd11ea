use sqlx::migrate::Migrator;
use sqlx::postgres::PgPoolOptions;
use sqlx::{Connection, PgConnection, PgPool};

use crate::config::DbConfig;
use crate::error::AppError;

static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Drop `name` if it exists, create it empty and create the `employers` and
/// `vacancies` tables in it.
///
/// Destroys every row of a previous run. Other sessions connected to the old
/// database are terminated.
pub async fn reset_database(db: &DbConfig, name: &str) -> Result<(), AppError> {
    validate_database_name(name)?;

    tracing::warn!("Dropping and recreating database '{name}'");
    let mut admin = PgConnection::connect_with(&db.connect_options(&db.admin_database)).await?;
    let recreated = recreate(&mut admin, name).await;
    admin.close().await?;
    recreated?;

    let mut conn = PgConnection::connect_with(&db.connect_options(name)).await?;
    MIGRATOR.run(&mut conn).await?;
    conn.close().await?;

    tracing::info!("Database '{name}' created with empty employers and vacancies tables");
    Ok(())
}

async fn recreate(admin: &mut PgConnection, name: &str) -> Result<(), AppError> {
    // DDL on databases cannot be parameterized; the name is validated first.
    sqlx::raw_sql(&format!("DROP DATABASE IF EXISTS \"{name}\" WITH (FORCE)"))
        .execute(&mut *admin)
        .await?;
    sqlx::raw_sql(&format!("CREATE DATABASE \"{name}\""))
        .execute(&mut *admin)
        .await?;
    Ok(())
}

/// Pool against the freshly created database, shared by the writer and the reports.
pub async fn create_pool(db: &DbConfig, name: &str) -> Result<PgPool, AppError> {
    let pool = PgPoolOptions::new()
        .max_connections(2)
        .connect_with(db.connect_options(name))
        .await?;
    Ok(pool)
}

/// Accept only plain identifiers: a letter or underscore followed by ASCII
/// letters, digits or underscores, within PostgreSQL's 63 byte limit.
pub fn validate_database_name(name: &str) -> Result<(), AppError> {
    let mut chars = name.chars();
    let valid_start = chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_');
    let valid_rest = chars.all(|c| c.is_ascii_alphanumeric() || c == '_');

    if valid_start && valid_rest && name.len() <= 63 {
        Ok(())
    } else {
        Err(AppError::InvalidDatabaseName(name.to_string()))
    }
}
