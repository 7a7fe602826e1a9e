//! Chat use case.
//!
//! [`ChatUseCase`] is the single entry point front ends drive. It wires the
//! session store, the query dispatcher, the deletion workflow and the
//! spreadsheet writer together.

use crate::query_dispatcher::{QueryDispatcher, SubmitOutcome};
use anyhow::{Context, Result, anyhow};
use querydesk_core::backend::QueryBackend;
use querydesk_core::deletion::DeletionWorkflow;
use querydesk_core::export::{SpreadsheetWriter, export_to_spreadsheet};
use querydesk_core::session::{Axis, SessionHandle};
use querydesk_core::visualization::{AxisSelection, select_axis};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Use case for one user's chat surface.
///
/// # Responsibilities
///
/// - Asking questions through the dispatcher
/// - Creating and switching threads
/// - Two-step thread deletion
/// - Axis selection on the active thread's results
/// - Exporting a result to a spreadsheet file
pub struct ChatUseCase {
    session: SessionHandle,
    dispatcher: Arc<QueryDispatcher>,
    deletion: Mutex<DeletionWorkflow>,
    writer: Arc<dyn SpreadsheetWriter>,
    export_dir: PathBuf,
}

impl ChatUseCase {
    pub fn new(
        session: SessionHandle,
        backend: Arc<dyn QueryBackend>,
        writer: Arc<dyn SpreadsheetWriter>,
        export_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            dispatcher: Arc::new(QueryDispatcher::new(session.clone(), backend)),
            session,
            deletion: Mutex::new(DeletionWorkflow::new()),
            writer,
            export_dir: export_dir.into(),
        }
    }

    pub fn session(&self) -> SessionHandle {
        self.session.clone()
    }

    pub fn dispatcher(&self) -> Arc<QueryDispatcher> {
        self.dispatcher.clone()
    }

    pub fn export_dir(&self) -> &Path {
        &self.export_dir
    }

    /// Puts `question` into the draft input and submits it.
    pub async fn ask(&self, question: &str) -> SubmitOutcome {
        self.dispatcher.set_draft(question);
        self.dispatcher.submit_draft().await
    }

    /// Opens an empty thread, makes it active and clears the draft input.
    pub async fn new_thread(&self) -> usize {
        let index = self.session.lock().await.create_thread();
        self.dispatcher.clear_draft();
        index
    }

    pub async fn switch_thread(&self, index: usize) -> bool {
        self.session.lock().await.set_active(index)
    }

    /// Starts a deletion; nothing is removed until [`ChatUseCase::confirm_delete`].
    pub async fn request_delete(&self, index: usize) -> bool {
        if index >= self.session.lock().await.len() {
            return false;
        }
        self.deletion.lock().await.request_delete(index);
        true
    }

    pub async fn pending_delete(&self) -> Option<usize> {
        self.deletion.lock().await.pending()
    }

    pub async fn confirm_delete(&self) -> bool {
        let mut deletion = self.deletion.lock().await;
        let mut store = self.session.lock().await;
        deletion.confirm(&mut store)
    }

    pub async fn cancel_delete(&self) {
        self.deletion.lock().await.cancel();
    }

    /// Sets or clears an axis of a result in the active thread.
    pub async fn select_axis(
        &self,
        message_index: usize,
        axis: Axis,
        value: Option<String>,
    ) -> AxisSelection {
        let mut store = self.session.lock().await;
        let thread_index = store.active_index();
        select_axis(&mut store, thread_index, message_index, axis, value)
    }

    /// Writes the result at `message_index` of the active thread to the export
    /// directory and returns the file path.
    pub async fn export(&self, message_index: usize) -> Result<PathBuf> {
        let sheet = {
            let store = self.session.lock().await;
            let result = store
                .active_thread()
                .messages
                .get(message_index)
                .and_then(|message| message.as_result())
                .ok_or_else(|| anyhow!("Message {} is not a query result", message_index))?;
            export_to_spreadsheet(&result.rows, &result.columns)
        };

        self.writer
            .write(&sheet, &self.export_dir)
            .with_context(|| format!("Failed to export to {}", self.export_dir.display()))
    }
}
