//! Backend boundary.
//!
//! The analytics backend exposes two JSON endpoints:
//!
//! - `POST /login { username, password } → { success }`
//! - `POST /query { question } → { sql_query, result, columns?, is_plotable, chart_insight? }`
//!
//! [`QueryBackend`] abstracts the transport so the dispatcher can be driven by an
//! HTTP client in production and by mocks in tests.

use crate::session::{QueryResult, Row};
use crate::visualization::ChartKind;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failure of a backend call.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BackendError {
    /// The request could not be sent or no response arrived.
    #[error("{0}")]
    Transport(String),

    /// The backend answered with a non-success status.
    #[error("Request failed with status code {status}: {body}")]
    Status { status: u16, body: String },

    /// The response body did not have the expected shape.
    #[error("Malformed response: {0}")]
    Decode(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginResponse {
    #[serde(default)]
    pub success: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryRequest {
    pub question: String,
}

/// Body of a `/query` answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryResponse {
    pub sql_query: String,
    #[serde(default)]
    pub result: Vec<Row>,
    /// Column order; derived from the first row when absent or empty.
    #[serde(default)]
    pub columns: Option<Vec<String>>,
    #[serde(default)]
    pub is_plotable: bool,
    #[serde(default)]
    pub chart_insight: Option<String>,
}

impl QueryResponse {
    /// Converts the answer into a result message payload.
    pub fn into_result(self, requested_chart_kind: Option<ChartKind>) -> QueryResult {
        QueryResult::new(
            self.sql_query,
            self.columns,
            self.result,
            self.is_plotable,
            requested_chart_kind,
            self.chart_insight,
        )
    }
}

/// Transport to the analytics backend.
#[async_trait]
pub trait QueryBackend: Send + Sync {
    /// Sends a natural-language question and returns the generated SQL and rows.
    async fn query(&self, question: &str) -> Result<QueryResponse, BackendError>;

    /// Checks credentials; `Ok(false)` when the backend rejects them.
    async fn login(&self, username: &str, password: &str) -> Result<bool, BackendError>;
}
