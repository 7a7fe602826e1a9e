//! Login gate in front of the chat surface.

use querydesk_core::backend::QueryBackend;
use std::sync::Arc;
use thiserror::Error;

pub const MISSING_FIELDS_MESSAGE: &str = "Please fill both fields.";
pub const INVALID_CREDENTIALS_MESSAGE: &str = "Invalid username or password.";

/// Why a login attempt did not succeed. `Display` yields the user-facing text.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginError {
    #[error("{}", MISSING_FIELDS_MESSAGE)]
    MissingFields,
    #[error("{}", INVALID_CREDENTIALS_MESSAGE)]
    InvalidCredentials,
}

/// Tracks whether the user has logged in.
///
/// Logging out only closes the gate; the session store is left untouched.
pub struct LoginGate {
    backend: Arc<dyn QueryBackend>,
    logged_in: bool,
}

impl LoginGate {
    pub fn new(backend: Arc<dyn QueryBackend>) -> Self {
        Self {
            backend,
            logged_in: false,
        }
    }

    pub fn is_logged_in(&self) -> bool {
        self.logged_in
    }

    pub async fn login(&mut self, username: &str, password: &str) -> Result<(), LoginError> {
        if username.is_empty() || password.is_empty() {
            return Err(LoginError::MissingFields);
        }

        match self.backend.login(username, password).await {
            Ok(true) => {
                tracing::info!("User '{}' logged in", username);
                self.logged_in = true;
                Ok(())
            }
            Ok(false) => {
                tracing::info!("Login rejected for '{}'", username);
                Err(LoginError::InvalidCredentials)
            }
            Err(e) => {
                tracing::warn!("Login request failed: {}", e);
                Err(LoginError::InvalidCredentials)
            }
        }
    }

    pub fn logout(&mut self) {
        if self.logged_in {
            tracing::info!("Logged out");
        }
        self.logged_in = false;
    }
}
