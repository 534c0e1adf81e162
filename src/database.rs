use color_eyre::{Result, eyre::Context};
use migration::MigratorTrait;
use sea_orm::{ConnectOptions, ConnectionTrait, Database as SeaDatabase, DatabaseConnection};
use std::path::Path;
use std::time::Duration;

/// Shared persistence handle. Handlers receive it through `AppState` and
/// hand a clone of the `Arc` to each service; nothing global is kept.
pub struct Database {
    pub(crate) conn: DatabaseConnection,
}

impl Database {
    /// Open or create a database at the given path
    pub async fn open(path: &Path) -> Result<Self> {
        tracing::debug!("Opening database at: {}", path.display());

        // Create parent directories if they don't exist
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).context(format!(
                "Failed to create database directory: {}",
                parent.display()
            ))?;
        }

        let url = format!("sqlite://{}?mode=rwc", path.display());

        let mut opt = ConnectOptions::new(url);
        opt.max_connections(16)
            .min_connections(1)
            .connect_timeout(Duration::from_secs(8))
            .acquire_timeout(Duration::from_secs(8))
            .idle_timeout(Duration::from_secs(300))
            .sqlx_logging(false);

        let database = Self::connect(opt)
            .await
            .context(format!("Failed to open database: {}", path.display()))?;

        tracing::info!("Database ready at: {}", path.display());
        Ok(database)
    }

    /// Connect with the given options and bring the schema up to date.
    pub async fn connect(opt: ConnectOptions) -> Result<Self> {
        let conn = SeaDatabase::connect(opt)
            .await
            .context("Failed to connect to database")?;

        // sqlx turns foreign keys on for every new SQLite connection; this
        // covers the connection that runs the migrations either way.
        conn.execute_unprepared("PRAGMA foreign_keys = ON")
            .await
            .context("Failed to enable foreign keys")?;

        let database = Database { conn };
        database.migrate().await?;
        Ok(database)
    }

    /// Apply every pending migration.
    pub async fn migrate(&self) -> Result<()> {
        tracing::debug!("Running database migrations");
        migration::Migrator::up(&self.conn, None)
            .await
            .context("Failed to run database migrations")?;
        Ok(())
    }

    /// Names of the migrations recorded as applied.
    pub async fn applied_migrations(&self) -> Result<Vec<String>> {
        let applied = migration::Migrator::get_applied_migrations(&self.conn)
            .await
            .context("Failed to read migration history")?;
        Ok(applied.iter().map(|m| m.name().to_string()).collect())
    }
}
