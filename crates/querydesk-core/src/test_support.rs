//! Shared fixtures for unit tests.

use crate::error::Result;
use crate::session::{SessionRepository, SessionStore, ThreadRecord};
use std::sync::Arc;

/// Repository with nothing stored that accepts every save.
pub struct NullRepository;

impl SessionRepository for NullRepository {
    fn load_threads(&self) -> Result<Option<Vec<ThreadRecord>>> {
        Ok(None)
    }

    fn load_titles(&self) -> Result<Option<Vec<String>>> {
        Ok(None)
    }

    fn save(&self, _threads: &[ThreadRecord], _titles: &[String]) -> Result<()> {
        Ok(())
    }
}

/// A store holding the single default thread.
pub fn empty_store() -> SessionStore {
    SessionStore::load(Arc::new(NullRepository))
}
