//! Screenshot persistence.
//!
//! Screenshots are written once and later served back by name over the
//! read-only retrieval interface, so names are generated here and lookups
//! refuse anything that could escape the storage directory.

use std::io;
use std::path::{Path, PathBuf};

use chrono::Utc;
use tracing::debug;
use uuid::Uuid;

/// A persisted screenshot.
#[derive(Debug, Clone)]
pub struct SavedShot {
    /// File name, usable with the retrieval interface.
    pub name: String,
    /// Absolute path on disk.
    pub path: PathBuf,
}

/// Flat directory of PNG screenshots.
pub struct ScreenshotStore {
    dir: PathBuf,
}

impl ScreenshotStore {
    /// Open (creating if needed) the storage directory.
    pub fn new(dir: PathBuf) -> io::Result<Self> {
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Persist PNG bytes under a fresh timestamped name.
    pub async fn save_png(&self, bytes: &[u8]) -> io::Result<SavedShot> {
        let name = format!(
            "shot-{}-{}.png",
            Utc::now().format("%Y%m%d%H%M%S"),
            &Uuid::new_v4().simple().to_string()[..8]
        );
        let path = self.dir.join(&name);
        tokio::fs::write(&path, bytes).await?;
        debug!(name = %name, bytes = bytes.len(), "screenshot saved");
        Ok(SavedShot { name, path })
    }

    /// Resolve a stored screenshot by name.
    ///
    /// Names containing path separators or traversal components are
    /// rejected; this is the serving boundary for untrusted input.
    pub fn resolve(&self, name: &str) -> Option<PathBuf> {
        if name.is_empty()
            || name.contains('/')
            || name.contains('\\')
            || name.contains("..")
            || !name.ends_with(".png")
        {
            return None;
        }
        let path = self.dir.join(name);
        path.is_file().then_some(path)
    }
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
