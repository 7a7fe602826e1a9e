//! HTTP implementation of [`QueryBackend`].

use async_trait::async_trait;
use querydesk_core::backend::{
    BackendError, LoginRequest, LoginResponse, QueryBackend, QueryRequest, QueryResponse,
};
use querydesk_core::config::ClientConfig;
use reqwest::{Client, StatusCode};
use serde::{Serialize, de::DeserializeOwned};
use std::time::Duration;

/// Talks to the analytics backend over JSON/HTTP.
#[derive(Clone)]
pub struct HttpQueryBackend {
    client: Client,
    base_url: String,
}

impl HttpQueryBackend {
    /// Creates a backend client with a per-request timeout.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, BackendError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| BackendError::Transport(format!("Failed to build HTTP client: {}", e)))?;
        let base_url = base_url.into().trim_end_matches('/').to_string();

        tracing::info!("[HttpQueryBackend] Using backend at {}", base_url);
        Ok(Self { client, base_url })
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self, BackendError> {
        Self::new(
            config.backend_url.clone(),
            Duration::from_secs(config.request_timeout_secs),
        )
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Posts `body` and returns the raw status and body text.
    async fn post<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<(StatusCode, String), BackendError> {
        let url = self.endpoint(path);
        tracing::debug!("[HttpQueryBackend] POST {}", url);

        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| BackendError::Transport(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| BackendError::Transport(format!("Failed to read response body: {}", e)))?;
        Ok((status, text))
    }

    fn decode<T: DeserializeOwned>(text: &str) -> Result<T, BackendError> {
        serde_json::from_str(text).map_err(|e| BackendError::Decode(e.to_string()))
    }
}

#[async_trait]
impl QueryBackend for HttpQueryBackend {
    async fn query(&self, question: &str) -> Result<QueryResponse, BackendError> {
        let request = QueryRequest {
            question: question.to_string(),
        };
        let (status, text) = self.post("query", &request).await?;

        if !status.is_success() {
            tracing::warn!("[HttpQueryBackend] /query returned {}", status);
            return Err(BackendError::Status {
                status: status.as_u16(),
                body: text,
            });
        }

        let response: QueryResponse = Self::decode(&text)?;
        tracing::debug!(
            "[HttpQueryBackend] /query returned {} row(s)",
            response.result.len()
        );
        Ok(response)
    }

    async fn login(&self, username: &str, password: &str) -> Result<bool, BackendError> {
        let request = LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        };
        let (status, text) = self.post("login", &request).await?;

        match status {
            StatusCode::UNAUTHORIZED => Ok(false),
            s if s.is_success() => Ok(Self::decode::<LoginResponse>(&text)?.success),
            s => Err(BackendError::Status {
                status: s.as_u16(),
                body: text,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_joins_without_double_slash() {
        let backend = HttpQueryBackend::new("http://127.0.0.1:8000/", Duration::from_secs(1)).unwrap();
        assert_eq!(backend.base_url(), "http://127.0.0.1:8000");
        assert_eq!(backend.endpoint("/query"), "http://127.0.0.1:8000/query");
        assert_eq!(backend.endpoint("login"), "http://127.0.0.1:8000/login");
    }

    #[test]
    fn test_from_default_config() {
        let backend = HttpQueryBackend::from_config(&ClientConfig::default()).unwrap();
        assert_eq!(backend.base_url(), "http://127.0.0.1:8000");
    }
}
