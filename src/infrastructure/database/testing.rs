//! Test fixtures: freshly migrated databases.

use sea_orm::DatabaseConnection;
use sea_orm_migration::MigratorTrait;
use tempfile::TempDir;

use super::migrator::Migrator;
use super::{init_database, DatabaseConfig};

async fn migrated(config: &DatabaseConfig) -> DatabaseConnection {
    let db = init_database(config).await.expect("sqlite");
    Migrator::up(&db, None).await.expect("migrations");
    db
}

/// Single-connection in-memory database.
pub async fn memory_db() -> DatabaseConnection {
    migrated(&DatabaseConfig::in_memory()).await
}

/// File-backed database inside `dir` with a real connection pool, so
/// concurrent callers run on separate connections.
pub async fn file_db(dir: &TempDir) -> DatabaseConnection {
    let path = dir.path().join("accounts.db");
    migrated(&DatabaseConfig {
        url: format!("sqlite://{}?mode=rwc", path.display()),
        max_connections: 8,
        ..DatabaseConfig::default()
    })
    .await
}
