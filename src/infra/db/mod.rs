//! Database connection and schema management.

use std::collections::HashSet;

use sea_orm::{Database as SeaDatabase, DatabaseConnection, DbErr, EntityTrait};
use sea_orm_migration::{seaql_migrations, MigrationName, MigratorTrait};

use crate::config::Config;

pub mod migrations;

pub use migrations::Migrator;

/// One row of `migrate status`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationState {
    pub name: String,
    pub applied: bool,
}

/// Owns the SeaORM connection pool.
#[derive(Clone)]
pub struct Database {
    connection: DatabaseConnection,
}

impl Database {
    /// Open the pool and bring the schema up to date.
    pub async fn connect(config: &Config) -> Result<Self, DbErr> {
        let db = Self::open(config).await?;
        db.run_migrations().await.inspect_err(|e| {
            tracing::error!("Failed to run migrations: {}", e);
        })?;

        tracing::info!("Database connected and migrations applied");
        Ok(db)
    }

    /// Open the pool and leave the schema alone. `migrate` uses this.
    pub async fn open(config: &Config) -> Result<Self, DbErr> {
        Ok(Self::from_connection(
            SeaDatabase::connect(&config.database_url).await?,
        ))
    }

    pub fn from_connection(connection: DatabaseConnection) -> Self {
        Self { connection }
    }

    /// Cloned handle for repositories; clones share the pool.
    pub fn get_connection(&self) -> DatabaseConnection {
        self.connection.clone()
    }

    pub async fn run_migrations(&self) -> Result<(), DbErr> {
        Migrator::up(&self.connection, None).await
    }

    /// Revert the most recent migration.
    pub async fn rollback_migration(&self) -> Result<(), DbErr> {
        Migrator::down(&self.connection, Some(1)).await
    }

    /// Every known migration, in order, with whether it has been applied.
    pub async fn migration_status(&self) -> Result<Vec<MigrationState>, DbErr> {
        let applied: HashSet<String> = seaql_migrations::Entity::find()
            .all(&self.connection)
            .await?
            .into_iter()
            .map(|row| row.version)
            .collect();

        Ok(Migrator::migrations()
            .iter()
            .map(|m| MigrationState {
                applied: applied.contains(m.name()),
                name: m.name().to_string(),
            })
            .collect())
    }

    /// Drop every table and re-apply all migrations.
    pub async fn fresh_migrations(&self) -> Result<(), DbErr> {
        Migrator::fresh(&self.connection).await
    }

    /// Round-trip to the server; used by `/health`.
    pub async fn ping(&self) -> Result<(), DbErr> {
        self.connection.ping().await
    }
}
