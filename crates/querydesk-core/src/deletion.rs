//! Two-step thread deletion.
//!
//! A delete request parks the target index until the user confirms or cancels.

use crate::session::SessionStore;

/// Confirmation state of the deletion workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeletionState {
    /// No deletion pending.
    #[default]
    Idle,
    /// Waiting for the user to confirm deleting the thread at this index.
    PendingConfirm { index: usize },
}

/// Drives `Idle → PendingConfirm(index) → Idle`.
#[derive(Debug, Default)]
pub struct DeletionWorkflow {
    state: DeletionState,
}

impl DeletionWorkflow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> DeletionState {
        self.state
    }

    /// Index awaiting confirmation, if any.
    pub fn pending(&self) -> Option<usize> {
        match self.state {
            DeletionState::PendingConfirm { index } => Some(index),
            DeletionState::Idle => None,
        }
    }

    /// Asks for confirmation before deleting the thread at `index`.
    ///
    /// A request made while another is pending replaces it.
    pub fn request_delete(&mut self, index: usize) {
        self.state = DeletionState::PendingConfirm { index };
    }

    /// Deletes the pending thread and returns to idle.
    ///
    /// Returns whether a thread was removed; no-op while idle.
    pub fn confirm(&mut self, store: &mut SessionStore) -> bool {
        match std::mem::take(&mut self.state) {
            DeletionState::PendingConfirm { index } => store.delete_thread(index),
            DeletionState::Idle => false,
        }
    }

    /// Drops the pending request without touching the session.
    pub fn cancel(&mut self) {
        self.state = DeletionState::Idle;
    }
}
