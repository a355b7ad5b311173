//! Subcommand implementations

pub mod catalog;
pub mod downloads;
pub mod play;
pub mod playlist;

use std::path::Path;
use std::sync::Arc;
use tilawa_core::Catalog;
use tilawa_storage::SqliteTrackStore;

use crate::config::AppConfig;
use crate::error::Result;

/// Shared state for every subcommand
pub struct AppContext {
    pub config: AppConfig,
    pub catalog: Arc<Catalog>,
}

impl AppContext {
    pub fn new(config: AppConfig) -> Result<Self> {
        Ok(Self {
            config,
            catalog: Arc::new(Catalog::builtin()?),
        })
    }

    /// Open the offline store, creating and migrating the database if needed
    pub async fn open_store(&self) -> Result<SqliteTrackStore> {
        let url = &self.config.storage.database_url;
        if let Some(parent) = database_parent_dir(url) {
            tokio::fs::create_dir_all(parent).await?;
        }

        let pool = tilawa_storage::create_pool(url).await?;
        tilawa_storage::run_migrations(&pool).await?;
        tracing::debug!(url = %url, "Offline store ready");

        Ok(SqliteTrackStore::new(pool))
    }
}

/// Directory holding a file-backed SQLite database, if any
fn database_parent_dir(url: &str) -> Option<&Path> {
    let path = url
        .strip_prefix("sqlite://")
        .or_else(|| url.strip_prefix("sqlite:"))?;
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() || path.starts_with(":memory:") {
        return None;
    }
    Path::new(path)
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_database_parent_dir() {
        assert_eq!(
            database_parent_dir("sqlite://./data/tilawa.db"),
            Some(Path::new("./data"))
        );
        assert_eq!(
            database_parent_dir("sqlite:/var/lib/tilawa/db.sqlite?mode=rwc"),
            Some(Path::new("/var/lib/tilawa"))
        );
        assert_eq!(database_parent_dir("sqlite://tilawa.db"), None);
        assert_eq!(database_parent_dir("sqlite::memory:"), None);
        assert_eq!(database_parent_dir("postgres://x"), None);
    }
}
