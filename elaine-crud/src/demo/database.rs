//! Demo database lifecycle
//!
//! The demo runs on a `SQLite` file. Migrations and seeds are embedded in the
//! binary so setup works from any checkout.

use std::fs;
use std::path::{Path, PathBuf};

use sqlx::migrate::Migrator;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};

use crate::config::DemoSettings;
use crate::error::{ElaineError, Result};

/// Embedded demo schema migrations
pub static MIGRATOR: Migrator = sqlx::migrate!("./demo/migrations");

/// Embedded demo seed data
pub const SEEDS: &str = include_str!("../../demo/seeds.sql");

/// Result of a setup run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SetupReport {
    /// The database file did not exist before setup
    pub created: bool,
    /// Migrations applied by this run
    pub migrations_applied: usize,
}

/// Handle on the demo database file
#[derive(Debug, Clone)]
pub struct DemoDatabase {
    path: PathBuf,
}

impl DemoDatabase {
    /// Database stored at `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Database named by the demo settings
    ///
    /// # Errors
    ///
    /// Returns [`ElaineError::Config`] for in-memory URLs, which cannot persist
    /// between commands.
    pub fn from_settings(root: &Path, settings: &DemoSettings) -> Result<Self> {
        settings.database_path(root).map(Self::new).ok_or_else(|| {
            ElaineError::Config(format!(
                "demo database_url must point at a file, got {}",
                settings.database_url
            ))
        })
    }

    /// Database file path
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The database file exists
    #[must_use]
    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Open a pool, creating the file and its directory when missing
    pub async fn connect(&self) -> Result<SqlitePool> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir).map_err(|e| ElaineError::io(dir, e))?;
        }

        let options = SqliteConnectOptions::new()
            .filename(&self.path)
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await?;
        Ok(pool)
    }

    /// Apply pending migrations, returning how many ran
    pub async fn migrate(pool: &SqlitePool) -> Result<usize> {
        let before = applied_migrations(pool).await?;
        MIGRATOR.run(pool).await?;
        let after = applied_migrations(pool).await?;

        let applied = after.saturating_sub(before);
        tracing::info!(applied, total = after, "migrations up to date");
        Ok(applied)
    }

    /// Load the sample data
    pub async fn seed(pool: &SqlitePool) -> Result<()> {
        sqlx::raw_sql(SEEDS).execute(pool).await?;
        tracing::info!("seed data loaded");
        Ok(())
    }

    /// Create, migrate and seed
    ///
    /// Safe to run against an existing database: applied migrations are
    /// skipped and seed rows already present are left untouched.
    pub async fn setup(&self) -> Result<SetupReport> {
        let created = !self.exists();
        tracing::info!(path = %self.path.display(), created, "setting up demo database");

        let pool = self.connect().await?;
        let migrations_applied = Self::migrate(&pool).await?;
        Self::seed(&pool).await?;
        pool.close().await;

        Ok(SetupReport {
            created,
            migrations_applied,
        })
    }

    /// Delete the database file and its journal files
    ///
    /// Returns whether a database existed.
    pub fn drop_database(&self) -> Result<bool> {
        let existed = self.exists();

        for suffix in ["", "-wal", "-shm", "-journal"] {
            let mut file = self.path.clone().into_os_string();
            file.push(suffix);
            let file = PathBuf::from(file);

            match fs::remove_file(&file) {
                Ok(()) => tracing::debug!(path = %file.display(), "removed"),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => return Err(ElaineError::io(file, e)),
            }
        }

        tracing::info!(path = %self.path.display(), existed, "demo database dropped");
        Ok(existed)
    }

    /// Drop, then set up from scratch
    pub async fn reset(&self) -> Result<SetupReport> {
        self.drop_database()?;
        self.setup().await
    }
}

async fn applied_migrations(pool: &SqlitePool) -> Result<usize> {
    let (tracked,): (i64,) = sqlx::query_as(
        "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = '_sqlx_migrations'",
    )
    .fetch_one(pool)
    .await?;

    if tracked == 0 {
        return Ok(0);
    }

    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM _sqlx_migrations WHERE success = 1")
        .fetch_one(pool)
        .await?;
    Ok(usize::try_from(count).unwrap_or_default())
}
