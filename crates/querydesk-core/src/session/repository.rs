//! Session repository trait.
//!
//! Defines the durable-storage boundary for the session: two independently keyed
//! blobs, the thread collection and the parallel title list.

use super::model::ThreadRecord;
use crate::error::Result;

/// An abstract repository for persisting the thread collection.
///
/// Writes are synchronous: the session store calls [`SessionRepository::save`]
/// inside every mutation and must not suspend while doing so.
///
/// # Implementation Notes
///
/// - `load_*` returns `Ok(None)` when nothing was stored yet.
/// - A blob that exists but cannot be parsed is reported as `Err`; the store
///   treats it like an absent blob.
pub trait SessionRepository: Send + Sync {
    /// Loads the thread collection blob.
    fn load_threads(&self) -> Result<Option<Vec<ThreadRecord>>>;

    /// Loads the title list blob.
    fn load_titles(&self) -> Result<Option<Vec<String>>>;

    /// Writes both blobs.
    fn save(&self, threads: &[ThreadRecord], titles: &[String]) -> Result<()>;
}
