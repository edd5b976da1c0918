use std::fmt;

// === ValidationError ===

/// Client-side input rejection. Raised before any store call is made.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A required field was empty after trimming whitespace.
    MissingField(String),
    /// The provided URL is not a well-formed absolute URL.
    MalformedUrl(String),
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::MissingField(field) => write!(f, "Missing required field: {}", field),
            ValidationError::MalformedUrl(url) => write!(f, "Malformed URL: {}", url),
        }
    }
}

impl std::error::Error for ValidationError {}

// === SyncError ===

/// Errors surfaced by the bookmark sync core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncError {
    /// No authenticated principal at operation time.
    Unauthenticated,
    /// Input was rejected before reaching the store.
    Validation(ValidationError),
    /// A store call failed or returned an error payload.
    Persistence(String),
    /// The auth provider could not be reached.
    SessionUnavailable(String),
}

impl fmt::Display for SyncError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyncError::Unauthenticated => write!(f, "Not authenticated"),
            SyncError::Validation(err) => write!(f, "Validation failed: {}", err),
            SyncError::Persistence(msg) => write!(f, "Persistence error: {}", msg),
            SyncError::SessionUnavailable(msg) => write!(f, "Session unavailable: {}", msg),
        }
    }
}

impl std::error::Error for SyncError {}

impl From<ValidationError> for SyncError {
    fn from(err: ValidationError) -> Self {
        SyncError::Validation(err)
    }
}

// === SessionError ===

/// Errors related to session gate operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// The auth provider could not be reached or answered abnormally.
    Unavailable(String),
    /// The provider rejected or failed the sign-out request.
    SignOutFailed(String),
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionError::Unavailable(msg) => write!(f, "Session provider unavailable: {}", msg),
            SessionError::SignOutFailed(msg) => write!(f, "Sign-out failed: {}", msg),
        }
    }
}

impl std::error::Error for SessionError {}

// === AuthError ===

/// Errors reported by an auth provider implementation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// The provider could not be reached.
    Unavailable(String),
    /// The provider answered with an error.
    ProviderError(String),
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthError::Unavailable(msg) => write!(f, "Auth provider unavailable: {}", msg),
            AuthError::ProviderError(msg) => write!(f, "Auth provider error: {}", msg),
        }
    }
}

impl std::error::Error for AuthError {}

// === StoreError ===

/// Errors reported by a bookmark store implementation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The caller's principal lacks rights to the target row(s).
    Unauthorized(String),
    /// The backing store failed.
    Backend(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Unauthorized(msg) => write!(f, "Store access denied: {}", msg),
            StoreError::Backend(msg) => write!(f, "Store backend error: {}", msg),
        }
    }
}

impl std::error::Error for StoreError {}
