//! JSON-file SessionRepository implementation.

use crate::paths::{PathError, QueryDeskPaths};
use crate::storage::AtomicJsonFile;
use querydesk_core::error::{QueryDeskError, Result};
use querydesk_core::session::{SessionRepository, ThreadRecord};
use std::path::{Path, PathBuf};

/// Stores the session as two blobs in one directory:
///
/// ```text
/// data_dir/
/// ├── chats.json    # [ThreadRecord]
/// └── titles.json   # [String], parallel to chats.json
/// ```
pub struct JsonSessionRepository {
    chats: AtomicJsonFile<Vec<ThreadRecord>>,
    titles: AtomicJsonFile<Vec<String>>,
}

impl JsonSessionRepository {
    /// Creates a repository rooted at `data_dir`. Nothing is touched on disk
    /// until the first save.
    pub fn new(data_dir: impl AsRef<Path>) -> Self {
        let data_dir = data_dir.as_ref();
        Self {
            chats: AtomicJsonFile::new(QueryDeskPaths::chats_file(data_dir)),
            titles: AtomicJsonFile::new(QueryDeskPaths::titles_file(data_dir)),
        }
    }

    /// Creates a repository at the platform data directory.
    pub fn default_location() -> Result<Self> {
        let data_dir = QueryDeskPaths::data_dir()
            .map_err(|e: PathError| QueryDeskError::config(e.to_string()))?;
        Ok(Self::new(data_dir))
    }

    pub fn chats_path(&self) -> PathBuf {
        self.chats.path().to_path_buf()
    }

    pub fn titles_path(&self) -> PathBuf {
        self.titles.path().to_path_buf()
    }
}

impl SessionRepository for JsonSessionRepository {
    fn load_threads(&self) -> Result<Option<Vec<ThreadRecord>>> {
        Ok(self.chats.load()?)
    }

    fn load_titles(&self) -> Result<Option<Vec<String>>> {
        Ok(self.titles.load()?)
    }

    fn save(&self, threads: &[ThreadRecord], titles: &[String]) -> Result<()> {
        self.chats.save(&threads.to_vec())?;
        self.titles.save(&titles.to_vec())?;
        tracing::debug!(
            "Saved {} thread(s) to {}",
            threads.len(),
            self.chats.path().display()
        );
        Ok(())
    }
}
