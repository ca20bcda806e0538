use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::io::AsyncWriteExt;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use super::entry::{is_valid_player_id, WatchlistEntry};
use crate::error::{BotError, Result};

/// Watchlist operations used by the webhook listeners and chat commands
#[async_trait]
pub trait WatchlistStore: Send + Sync {
    /// Add a new entry. Fails with `InvalidPlayerId` or `AlreadyWatched`.
    async fn add(&self, id: &str, description: &str) -> Result<WatchlistEntry>;

    /// Remove an entry. Fails with `NotWatched` if the id is absent.
    async fn remove(&self, id: &str) -> Result<WatchlistEntry>;

    /// Exact-match lookup by id
    async fn find(&self, id: &str) -> Option<WatchlistEntry>;

    /// All entries in insertion order
    async fn list(&self) -> Vec<WatchlistEntry>;
}

/// Shared watchlist type
pub type SharedWatchlist = Arc<dyn WatchlistStore>;

/// Watchlist kept in memory and mirrored to a line-oriented text file.
///
/// Additions append one line; removals rewrite the whole file. Memory is
/// only updated after the file write succeeded.
pub struct FileWatchlist {
    path: PathBuf,
    entries: RwLock<Vec<WatchlistEntry>>,
}

impl FileWatchlist {
    /// Load from disk, creating an empty file if none exists
    pub async fn load(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let entries = read_entries(&path).await?;
        info!(
            "Loaded {} watchlist entries from {}",
            entries.len(),
            path.display()
        );

        Ok(Self {
            path,
            entries: RwLock::new(entries),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn path_string(&self) -> String {
        self.path().display().to_string()
    }

    async fn append_line(&self, entry: &WatchlistEntry) -> Result<()> {
        let save_err = |e: std::io::Error| BotError::StateSave {
            path: self.path_string(),
            source: e,
        };

        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await
            .map_err(save_err)?;
        file.write_all(entry.to_line().as_bytes())
            .await
            .map_err(save_err)?;
        file.flush().await.map_err(save_err)?;
        Ok(())
    }

    /// Write to a temp file first, then rename over the original
    async fn rewrite(&self, entries: &[WatchlistEntry]) -> Result<()> {
        let content: String = entries.iter().map(WatchlistEntry::to_line).collect();

        let temp_path = {
            let mut p = self.path.clone().into_os_string();
            p.push(".tmp");
            PathBuf::from(p)
        };

        tokio::fs::write(&temp_path, &content)
            .await
            .map_err(|e| BotError::StateSave {
                path: self.path_string(),
                source: e,
            })?;

        tokio::fs::rename(&temp_path, &self.path)
            .await
            .map_err(|e| BotError::StateSave {
                path: self.path_string(),
                source: e,
            })?;

        Ok(())
    }
}

#[async_trait]
impl WatchlistStore for FileWatchlist {
    async fn add(&self, id: &str, description: &str) -> Result<WatchlistEntry> {
        if !is_valid_player_id(id) {
            return Err(BotError::InvalidPlayerId { id: id.to_string() });
        }

        let mut entries = self.entries.write().await;
        if entries.iter().any(|e| e.id == id) {
            return Err(BotError::AlreadyWatched { id: id.to_string() });
        }

        let entry = WatchlistEntry::new(id, description);
        self.append_line(&entry).await?;
        entries.push(entry.clone());

        info!("Added {} to watchlist", entry.id);
        Ok(entry)
    }

    async fn remove(&self, id: &str) -> Result<WatchlistEntry> {
        let mut entries = self.entries.write().await;
        let index = entries
            .iter()
            .position(|e| e.id == id)
            .ok_or_else(|| BotError::NotWatched { id: id.to_string() })?;

        let mut remaining = entries.clone();
        let removed = remaining.remove(index);
        self.rewrite(&remaining).await?;
        *entries = remaining;

        info!("Removed {} from watchlist", removed.id);
        Ok(removed)
    }

    async fn find(&self, id: &str) -> Option<WatchlistEntry> {
        self.entries
            .read()
            .await
            .iter()
            .find(|e| e.id == id)
            .cloned()
    }

    async fn list(&self) -> Vec<WatchlistEntry> {
        self.entries.read().await.clone()
    }
}

/// Read every entry from a watchlist file.
///
/// A missing file is created empty. Later duplicates of an id are dropped.
pub async fn read_entries(path: &Path) -> Result<Vec<WatchlistEntry>> {
    let content = match tokio::fs::read_to_string(path).await {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            warn!(
                "Watchlist file not found at {}, creating an empty one",
                path.display()
            );
            tokio::fs::write(path, "")
                .await
                .map_err(|e| BotError::StateSave {
                    path: path.display().to_string(),
                    source: e,
                })?;
            return Ok(Vec::new());
        }
        Err(e) => {
            return Err(BotError::StateLoad {
                path: path.display().to_string(),
                source: e,
            })
        }
    };

    let mut entries: Vec<WatchlistEntry> = Vec::new();
    for entry in content.lines().filter_map(WatchlistEntry::parse_line) {
        if entries.iter().any(|e| e.id == entry.id) {
            warn!("Skipping duplicate watchlist entry {}", entry.id);
            continue;
        }
        debug!("Loading watchlist entry: {}", entry.id);
        entries.push(entry);
    }

    Ok(entries)
}
