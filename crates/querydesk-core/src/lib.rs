//! Domain layer of the QueryDesk client.
//!
//! Owns the conversation state engine (threads, messages, active pointer), the
//! result-to-chart binding, the deletion workflow, spreadsheet sheet building and
//! the traits other crates implement at the edges.

pub mod backend;
pub mod config;
pub mod deletion;
pub mod error;
pub mod export;
pub mod session;
pub mod visualization;

#[cfg(test)]
mod test_support;

// Re-export common error type
pub use error::QueryDeskError;
