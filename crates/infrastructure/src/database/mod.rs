pub mod entities;
mod reference_repository;
mod user_repository;
mod work_entry_repository;

pub use reference_repository::SeaOrmReferenceRepository;
pub use user_repository::SeaOrmUserRepository;
pub use work_entry_repository::SeaOrmWorkEntryRepository;

use chrono::{DateTime, FixedOffset, Utc};
use domain::DomainError;
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};
use tracing::info;

/// Open the database and bring the schema up to date.
pub async fn connect(url: &str, max_connections: u32) -> Result<DatabaseConnection, DbErr> {
    let mut options = ConnectOptions::new(url.to_string());
    options.max_connections(max_connections).sqlx_logging(false);

    info!("Connecting to database...");
    let db = Database::connect(options).await?;

    info!("Running database migrations...");
    Migrator::up(&db, None).await?;
    info!("✅ Migrations applied successfully");

    Ok(db)
}

pub(crate) fn db_error(e: DbErr) -> DomainError {
    DomainError::Storage(format!("Database error: {}", e))
}

pub(crate) fn to_offset(dt: DateTime<Utc>) -> DateTime<FixedOffset> {
    dt.fixed_offset()
}
