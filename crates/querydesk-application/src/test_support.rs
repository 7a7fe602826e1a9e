//! Test doubles shared by the application tests.

use async_trait::async_trait;
use querydesk_core::backend::{BackendError, QueryBackend, QueryResponse};
use querydesk_core::error::Result;
use querydesk_core::session::{SessionHandle, SessionRepository, SessionStore, ThreadRecord};
use serde_json::Value;
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

#[derive(Default)]
pub struct MemorySessionRepository {
    threads: Mutex<Option<Vec<ThreadRecord>>>,
    titles: Mutex<Option<Vec<String>>>,
}

impl SessionRepository for MemorySessionRepository {
    fn load_threads(&self) -> Result<Option<Vec<ThreadRecord>>> {
        Ok(self.threads.lock().unwrap().clone())
    }

    fn load_titles(&self) -> Result<Option<Vec<String>>> {
        Ok(self.titles.lock().unwrap().clone())
    }

    fn save(&self, threads: &[ThreadRecord], titles: &[String]) -> Result<()> {
        *self.threads.lock().unwrap() = Some(threads.to_vec());
        *self.titles.lock().unwrap() = Some(titles.to_vec());
        Ok(())
    }
}

pub fn new_session() -> SessionHandle {
    SessionStore::load(Arc::new(MemorySessionRepository::default())).into_handle()
}

pub struct MockBackend {
    reply: std::result::Result<Value, BackendError>,
    login_reply: std::result::Result<bool, BackendError>,
    gate: Option<Notify>,
    questions: Mutex<Vec<String>>,
    logins: Mutex<usize>,
}

impl MockBackend {
    fn with_reply(reply: std::result::Result<Value, BackendError>, gated: bool) -> Self {
        Self {
            reply,
            login_reply: Ok(true),
            gate: gated.then(Notify::new),
            questions: Mutex::new(Vec::new()),
            logins: Mutex::new(0),
        }
    }

    pub fn answering(body: Value) -> Self {
        Self::with_reply(Ok(body), false)
    }

    pub fn failing(error: BackendError) -> Self {
        Self::with_reply(Err(error), false)
    }

    /// Holds every query until [`MockBackend::release`] is called.
    pub fn gated(body: Value) -> Self {
        Self::with_reply(Ok(body), true)
    }

    pub fn with_login(mut self, reply: std::result::Result<bool, BackendError>) -> Self {
        self.login_reply = reply;
        self
    }

    pub fn release(&self) {
        if let Some(gate) = &self.gate {
            gate.notify_one();
        }
    }

    pub fn questions(&self) -> Vec<String> {
        self.questions.lock().unwrap().clone()
    }

    pub fn login_calls(&self) -> usize {
        *self.logins.lock().unwrap()
    }
}

#[async_trait]
impl QueryBackend for MockBackend {
    async fn query(&self, question: &str) -> std::result::Result<QueryResponse, BackendError> {
        self.questions.lock().unwrap().push(question.to_string());
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        match &self.reply {
            Ok(body) => serde_json::from_value(body.clone())
                .map_err(|e| BackendError::Decode(e.to_string())),
            Err(e) => Err(e.clone()),
        }
    }

    async fn login(&self, _username: &str, _password: &str) -> std::result::Result<bool, BackendError> {
        *self.logins.lock().unwrap() += 1;
        self.login_reply.clone()
    }
}
