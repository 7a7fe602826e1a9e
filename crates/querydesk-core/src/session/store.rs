use super::message::{Axis, Message};
use super::model::{Thread, ThreadRecord};
use super::repository::SessionRepository;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Shared handle to the single session store.
///
/// Every component mutates the session through this handle; the lock is only
/// held for the duration of one mutation.
pub type SessionHandle = Arc<Mutex<SessionStore>>;

/// Owns the ordered thread collection and the active-thread pointer.
///
/// `SessionStore` is responsible for:
/// - Creating, switching and deleting threads
/// - Appending messages and freezing thread titles
/// - Applying user axis selections to result messages
/// - Persisting the whole collection after every mutation
///
/// The collection is never empty.
pub struct SessionStore {
    threads: Vec<Thread>,
    active_index: usize,
    repository: Arc<dyn SessionRepository>,
}

impl SessionStore {
    /// Restores the session from the repository.
    ///
    /// Absent or unreadable data yields a single empty "New Chat" thread. A title
    /// list that does not match the threads is rebuilt from each thread's first
    /// question.
    pub fn load(repository: Arc<dyn SessionRepository>) -> Self {
        let records = match repository.load_threads() {
            Ok(Some(records)) if !records.is_empty() => records,
            Ok(_) => {
                tracing::debug!("No stored threads, starting with an empty session");
                Vec::new()
            }
            Err(e) => {
                tracing::warn!("Failed to load stored threads, starting fresh: {}", e);
                Vec::new()
            }
        };

        if records.is_empty() {
            return Self::with_threads(vec![Thread::new()], repository);
        }

        let titles = match repository.load_titles() {
            Ok(Some(titles)) if titles.len() == records.len() => Some(titles),
            Ok(Some(titles)) => {
                tracing::warn!(
                    "Stored title count ({}) does not match thread count ({}), rebuilding titles",
                    titles.len(),
                    records.len()
                );
                None
            }
            Ok(None) => None,
            Err(e) => {
                tracing::warn!("Failed to load stored titles, rebuilding: {}", e);
                None
            }
        };

        let threads: Vec<Thread> = match titles {
            Some(titles) => records
                .into_iter()
                .zip(titles)
                .map(|(record, title)| Thread::from_record(record, title))
                .collect(),
            None => records
                .into_iter()
                .map(|record| {
                    let mut thread = Thread::from_record(record, String::new());
                    thread.title = thread.derived_title();
                    thread
                })
                .collect(),
        };

        tracing::info!("Restored {} thread(s)", threads.len());
        Self::with_threads(threads, repository)
    }

    fn with_threads(threads: Vec<Thread>, repository: Arc<dyn SessionRepository>) -> Self {
        Self {
            threads,
            active_index: 0,
            repository,
        }
    }

    /// Wraps the store in a shared handle.
    pub fn into_handle(self) -> SessionHandle {
        Arc::new(Mutex::new(self))
    }

    /// Writes the collection and its titles to the repository.
    ///
    /// Failures are logged and swallowed; the in-memory session stays authoritative.
    pub fn save(&self) {
        let records: Vec<ThreadRecord> = self.threads.iter().map(Thread::to_record).collect();
        let titles = self.titles();
        if let Err(e) = self.repository.save(&records, &titles) {
            tracing::warn!("Failed to persist session: {}", e);
        }
    }

    // ============================================================================
    // Mutations
    // ============================================================================

    /// Appends an empty thread and makes it active. Returns its index.
    pub fn create_thread(&mut self) -> usize {
        self.threads.push(Thread::new());
        self.active_index = self.threads.len() - 1;
        tracing::debug!("Created thread {}", self.active_index);
        self.save();
        self.active_index
    }

    /// Switches the active thread. Out-of-range indices are ignored.
    pub fn set_active(&mut self, index: usize) -> bool {
        if index >= self.threads.len() {
            tracing::debug!("Ignoring switch to out-of-range thread {}", index);
            return false;
        }
        self.active_index = index;
        true
    }

    /// Appends a message to the thread at `index`.
    pub fn append_message(&mut self, index: usize, message: Message) -> bool {
        let Some(thread) = self.threads.get_mut(index) else {
            tracing::debug!("Ignoring append to out-of-range thread {}", index);
            return false;
        };
        thread.push(message);
        self.save();
        true
    }

    /// Appends a message to the thread with the given id.
    ///
    /// Returns `false` if that thread no longer exists.
    pub fn append_message_to(&mut self, thread_id: &str, message: Message) -> bool {
        match self.index_of(thread_id) {
            Some(index) => self.append_message(index, message),
            None => false,
        }
    }

    /// Replaces one axis field of a result message.
    ///
    /// No-op unless the addressed message exists and is a query result.
    pub fn mutate_message_axis(
        &mut self,
        thread_index: usize,
        message_index: usize,
        axis: Axis,
        value: Option<String>,
    ) -> bool {
        let Some(result) = self
            .threads
            .get_mut(thread_index)
            .and_then(|thread| thread.messages.get_mut(message_index))
            .and_then(Message::as_result_mut)
        else {
            tracing::debug!(
                "Ignoring axis change on thread {} message {}",
                thread_index,
                message_index
            );
            return false;
        };
        result.set_axis_field(axis, value);
        self.save();
        true
    }

    /// Removes a thread and its title, keeping the active pointer on the same thread
    /// when possible.
    ///
    /// - deleting the active thread resets the pointer to 0
    /// - deleting a thread before the active one shifts the pointer down by one
    ///
    /// The last remaining thread cannot be deleted.
    pub fn delete_thread(&mut self, index: usize) -> bool {
        if index >= self.threads.len() {
            tracing::debug!("Ignoring delete of out-of-range thread {}", index);
            return false;
        }
        if self.threads.len() == 1 {
            tracing::debug!("Refusing to delete the only thread");
            return false;
        }

        let removed = self.threads.remove(index);
        if self.active_index == index {
            self.active_index = 0;
        } else if self.active_index > index {
            self.active_index -= 1;
        }
        tracing::info!("Deleted thread {} ({})", index, removed.id);
        self.save();
        true
    }

    // ============================================================================
    // Queries
    // ============================================================================

    pub fn len(&self) -> usize {
        self.threads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.threads.is_empty()
    }

    pub fn active_index(&self) -> usize {
        self.active_index
    }

    pub fn active_thread(&self) -> &Thread {
        &self.threads[self.active_index]
    }

    pub fn thread(&self, index: usize) -> Option<&Thread> {
        self.threads.get(index)
    }

    pub fn threads(&self) -> &[Thread] {
        &self.threads
    }

    pub fn index_of(&self, thread_id: &str) -> Option<usize> {
        self.threads.iter().position(|thread| thread.id == thread_id)
    }

    /// The parallel title list, one entry per thread.
    pub fn titles(&self) -> Vec<String> {
        self.threads.iter().map(|thread| thread.title.clone()).collect()
    }

    /// Label for the thread list: the title, or `Chat N` if the title is empty.
    pub fn display_title(&self, index: usize) -> Option<String> {
        self.threads.get(index).map(|thread| {
            if thread.title.is_empty() {
                format!("Chat {}", index + 1)
            } else {
                thread.title.clone()
            }
        })
    }
}
