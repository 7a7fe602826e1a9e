//! Session domain module.
//!
//! This module contains the conversation model and the single-writer store that
//! owns every thread.
//!
//! # Module Structure
//!
//! - `message`: Message variants (`Message`, `QueryResult`, `Axis`)
//! - `model`: Thread model and title derivation (`Thread`, `ThreadRecord`)
//! - `repository`: Durable-storage boundary (`SessionRepository`)
//! - `store`: Thread collection and active pointer (`SessionStore`)

mod message;
mod model;
mod repository;
mod store;

// Re-export public API
pub use message::{Axis, Message, QueryResult, Row, resolve_columns};
pub use model::{
    DEFAULT_THREAD_TITLE, TITLE_ELLIPSIS, TITLE_MAX_CHARS, Thread, ThreadRecord, derive_title,
};
pub use repository::SessionRepository;
pub use store::{SessionHandle, SessionStore};
