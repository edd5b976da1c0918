//! Session gate for Shelfmark.
//!
//! Thin wrapper over an [`AuthProvider`] that answers whether a caller is
//! authenticated. Every bookmark operation is gated on the principal this
//! module resolves; an unreachable provider fails closed.

use std::sync::Arc;

use tracing::warn;

use crate::providers::auth::AuthProvider;
use crate::types::errors::{AuthError, SessionError};
use crate::types::principal::Principal;

/// Authentication gate over the session provider.
pub struct SessionGate {
    auth: Arc<dyn AuthProvider>,
}

impl SessionGate {
    pub fn new(auth: Arc<dyn AuthProvider>) -> Self {
        Self { auth }
    }

    /// Resolves the currently authenticated principal.
    ///
    /// `Ok(None)` means no session is active. An unreachable provider is
    /// surfaced as [`SessionError::Unavailable`] so callers can distinguish
    /// "signed out" from "cannot tell" — but for gating purposes both mean
    /// not authenticated.
    pub async fn current_principal(&self) -> Result<Option<Principal>, SessionError> {
        match self.auth.get_session().await {
            Ok(principal) => Ok(principal),
            Err(AuthError::Unavailable(msg)) | Err(AuthError::ProviderError(msg)) => {
                warn!(error = %msg, "session provider unreachable, failing closed");
                Err(SessionError::Unavailable(msg))
            }
        }
    }

    /// Gating check: `true` only when a principal is positively resolved.
    pub async fn is_authenticated(&self) -> bool {
        matches!(self.current_principal().await, Ok(Some(_)))
    }

    /// Ends the active session at the provider.
    pub async fn sign_out(&self) -> Result<(), SessionError> {
        self.auth
            .sign_out()
            .await
            .map_err(|e| SessionError::SignOutFailed(e.to_string()))
    }
}
