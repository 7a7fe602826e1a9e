//! Transport adapters for the analytics backend.

pub mod http_backend;

pub use http_backend::HttpQueryBackend;
