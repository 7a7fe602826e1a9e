//! Query dispatching.
//!
//! [`QueryDispatcher`] turns a question into a backend call and reconciles the
//! answer (or the failure) into the thread that was active when the question
//! was asked.

use querydesk_core::backend::{BackendError, QueryBackend};
use querydesk_core::session::{Message, SessionHandle};
use querydesk_core::visualization::ChartKind;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

/// Why a submit was refused without touching the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// The question was empty after trimming.
    Empty,
    /// Another question is still waiting for its answer.
    Busy,
}

/// Result of [`QueryDispatcher::submit`].
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    Rejected(RejectReason),
    /// A result message was appended to the thread.
    Answered { thread_id: String },
    /// An error message was appended to the thread.
    Failed {
        thread_id: String,
        error: BackendError,
    },
    /// The thread was deleted while waiting; the reply was dropped.
    Discarded { thread_id: String },
}

/// Formats the chat text of a failed query.
pub fn error_message_text(error: &BackendError) -> String {
    format!("⚠️ Error: {}", error)
}

/// Clears the waiting flag and the draft however `submit` exits.
struct InFlightGuard<'a> {
    dispatcher: &'a QueryDispatcher,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.dispatcher.lock_draft().clear();
        self.dispatcher.waiting.store(false, Ordering::SeqCst);
    }
}

/// Sends questions to the backend, one at a time.
pub struct QueryDispatcher {
    session: SessionHandle,
    backend: Arc<dyn QueryBackend>,
    waiting: AtomicBool,
    draft: Mutex<String>,
}

impl QueryDispatcher {
    pub fn new(session: SessionHandle, backend: Arc<dyn QueryBackend>) -> Self {
        Self {
            session,
            backend,
            waiting: AtomicBool::new(false),
            draft: Mutex::new(String::new()),
        }
    }

    /// Whether a question is waiting for its answer.
    pub fn is_waiting(&self) -> bool {
        self.waiting.load(Ordering::SeqCst)
    }

    pub fn draft(&self) -> String {
        self.lock_draft().clone()
    }

    /// Replaces the pending question input.
    pub fn set_draft(&self, text: impl Into<String>) {
        *self.lock_draft() = text.into();
    }

    pub fn clear_draft(&self) {
        self.lock_draft().clear();
    }

    fn lock_draft(&self) -> MutexGuard<'_, String> {
        self.draft.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Submits the current draft.
    pub async fn submit_draft(&self) -> SubmitOutcome {
        let question = self.draft();
        self.submit(&question).await
    }

    /// Asks `question` in the active thread.
    ///
    /// Appends exactly one user message and, unless the thread disappears
    /// meanwhile, exactly one result or error message. The session lock is never
    /// held while the backend call is outstanding.
    pub async fn submit(&self, question: &str) -> SubmitOutcome {
        if question.trim().is_empty() {
            return SubmitOutcome::Rejected(RejectReason::Empty);
        }
        if self
            .waiting
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            tracing::debug!("Rejected submit while a query is in flight");
            return SubmitOutcome::Rejected(RejectReason::Busy);
        }
        let _guard = InFlightGuard { dispatcher: self };

        let requested_chart_kind = ChartKind::detect(question);

        let thread_id = {
            let mut store = self.session.lock().await;
            let index = store.active_index();
            store.append_message(index, Message::user(question));
            store.active_thread().id.clone()
        };

        tracing::info!(
            target: "querydesk::dispatch",
            "Dispatching question for thread {} (chart: {:?})",
            thread_id,
            requested_chart_kind
        );

        let (message, outcome) = match self.backend.query(question).await {
            Ok(response) => {
                tracing::debug!(
                    target: "querydesk::dispatch",
                    "Received {} row(s) for thread {}",
                    response.result.len(),
                    thread_id
                );
                (
                    Message::Result(response.into_result(requested_chart_kind)),
                    SubmitOutcome::Answered {
                        thread_id: thread_id.clone(),
                    },
                )
            }
            Err(error) => {
                tracing::warn!(
                    target: "querydesk::dispatch",
                    "Query failed for thread {}: {}",
                    thread_id,
                    error
                );
                (
                    Message::error(error_message_text(&error)),
                    SubmitOutcome::Failed {
                        thread_id: thread_id.clone(),
                        error,
                    },
                )
            }
        };

        let mut store = self.session.lock().await;
        if store.append_message_to(&thread_id, message) {
            outcome
        } else {
            tracing::warn!(
                target: "querydesk::dispatch",
                "Thread {} was deleted while waiting, discarding reply",
                thread_id
            );
            SubmitOutcome::Discarded { thread_id }
        }
    }
}
