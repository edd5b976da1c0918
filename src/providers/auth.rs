use async_trait::async_trait;

use crate::types::errors::AuthError;
use crate::types::principal::Principal;

/// Trait defining the session provider contract.
///
/// `get_session` answers "who is signed in right now", `None` meaning no
/// active session. Both operations may fail with [`AuthError::Unavailable`]
/// when the provider cannot be reached; callers decide what that means for
/// them (the session gate fails closed).
#[async_trait]
pub trait AuthProvider: Send + Sync {
    async fn get_session(&self) -> Result<Option<Principal>, AuthError>;
    async fn sign_out(&self) -> Result<(), AuthError>;
}
