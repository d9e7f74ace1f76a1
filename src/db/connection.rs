//! Lazy, shared access to the database.
//!
//! A [`ConnectionManager`] is built once at startup from a [`StoreConfig`] and
//! cloned into whatever needs storage. The first successful
//! [`ConnectionManager::get_database`] opens and migrates the database; every
//! later call hands back the same [`Database`] handle. A failed attempt leaves
//! the manager unconnected, so the next call tries again from scratch.

use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::OnceCell;

use super::Database;
use crate::error::{StoreError, StoreResult};

pub const DEFAULT_DATABASE_NAME: &str = "FosterTrack";

/// Where the database lives and what it is called.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Connection string: `:memory:` or a directory, optionally with a
    /// `sqlite:` scheme. Required; `None` fails at connect time.
    pub url: Option<String>,
    /// Database name. With a directory url this is the file `<dir>/<name>.db`.
    pub name: String,
}

impl StoreConfig {
    pub fn new(url: Option<String>, name: Option<String>) -> Self {
        Self {
            url: url.filter(|u| !u.trim().is_empty()),
            name: name
                .filter(|n| !n.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_DATABASE_NAME.to_string()),
        }
    }

    pub fn memory() -> Self {
        Self::new(Some(":memory:".to_string()), None)
    }
}

#[derive(Debug, PartialEq)]
enum Location {
    Memory,
    Directory(PathBuf),
}

fn parse_location(url: &str) -> Location {
    let url = url.trim();
    let rest = url
        .strip_prefix("sqlite://")
        .or_else(|| url.strip_prefix("sqlite:"))
        .unwrap_or(url);

    if rest == ":memory:" {
        Location::Memory
    } else {
        Location::Directory(PathBuf::from(rest))
    }
}

#[derive(Clone)]
pub struct ConnectionManager {
    config: Arc<StoreConfig>,
    db: Arc<OnceCell<Database>>,
}

impl ConnectionManager {
    pub fn new(config: StoreConfig) -> Self {
        Self {
            config: Arc::new(config),
            db: Arc::new(OnceCell::new()),
        }
    }

    /// Wrap an already-open database, e.g. an in-memory one in tests.
    pub fn from_database(db: Database) -> Self {
        let config = StoreConfig::new(None, Some(db.name().to_string()));
        Self {
            config: Arc::new(config),
            db: Arc::new(OnceCell::from(db)),
        }
    }

    pub fn is_connected(&self) -> bool {
        self.db.initialized()
    }

    /// Return the shared database handle, connecting first if needed.
    ///
    /// Concurrent first calls wait on a single connection attempt.
    pub async fn get_database(&self) -> StoreResult<Database> {
        self.db
            .get_or_try_init(|| async { connect(&self.config) })
            .await
            .cloned()
    }
}

fn connect(config: &StoreConfig) -> StoreResult<Database> {
    let url = config.url.as_deref().ok_or_else(|| {
        StoreError::Configuration("database connection string (DATABASE_URL) is not set".into())
    })?;

    let db = match parse_location(url) {
        Location::Memory => Database::open_memory_named(&config.name)?,
        Location::Directory(dir) => {
            Database::open(dir.join(format!("{}.db", config.name)), &config.name)?
        }
    };
    db.migrate()?;

    tracing::info!(database = %config.name, "Connected to database");
    Ok(db)
}
