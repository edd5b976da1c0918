//! Shelfmark local backend.
//!
//! In-process implementations of the three collaborator contracts: a SQLite
//! bookmark store, a broadcast-based change feed hub, and a single-session
//! auth provider. Together they let the sync core run end-to-end without any
//! hosted service.
//!
//! # Usage
//!
//! ```no_run
//! use shelfmark::backend::Database;
//!
//! // Open a persistent database
//! let db = Database::open("shelfmark.db").expect("failed to open database");
//!
//! // Or use an in-memory database for testing
//! let db = Database::open_in_memory().expect("failed to open in-memory database");
//! ```

pub mod connection;
pub mod feed_hub;
pub mod local_auth;
pub mod local_store;
pub mod migrations;

pub use connection::Database;
pub use feed_hub::FeedHub;
pub use local_auth::LocalAuth;
pub use local_store::LocalStore;
