//! In-process auth provider for the Shelfmark local backend.
//!
//! Holds at most one signed-in principal. The OAuth handshake that would
//! normally produce that principal happens outside this crate; `sign_in`
//! exists so the demo binary and tests can establish a session directly.

use std::sync::Mutex;

use async_trait::async_trait;

use crate::providers::auth::AuthProvider;
use crate::types::errors::AuthError;
use crate::types::principal::Principal;

/// Single-session [`AuthProvider`] implementation.
pub struct LocalAuth {
    session: Mutex<Option<Principal>>,
}

impl LocalAuth {
    /// Creates a provider with no active session.
    pub fn new() -> Self {
        Self {
            session: Mutex::new(None),
        }
    }

    /// Establishes a session for the given principal, replacing any prior one.
    pub fn sign_in(&self, principal: Principal) {
        let mut session = match self.session.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        *session = Some(principal);
    }
}

impl Default for LocalAuth {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AuthProvider for LocalAuth {
    async fn get_session(&self) -> Result<Option<Principal>, AuthError> {
        let session = self
            .session
            .lock()
            .map_err(|e| AuthError::Unavailable(e.to_string()))?;
        Ok(session.clone())
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        let mut session = self
            .session
            .lock()
            .map_err(|e| AuthError::Unavailable(e.to_string()))?;
        *session = None;
        Ok(())
    }
}
