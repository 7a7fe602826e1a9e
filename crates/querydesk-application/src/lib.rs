//! Application layer for QueryDesk.
//!
//! Coordinates the domain components and the backend boundary into the
//! operations a front end exposes.

pub mod chat_usecase;
pub mod login;
pub mod query_dispatcher;

#[cfg(test)]
mod test_support;

pub use chat_usecase::ChatUseCase;
pub use login::{LoginError, LoginGate};
pub use query_dispatcher::{QueryDispatcher, RejectReason, SubmitOutcome};
