//! Authentication module for managing admin sessions and credentials.
//!
//! This module provides:
//! - `SessionStore`: load/save/clear of the access/refresh token pair,
//!   with in-memory and file-backed (optionally encrypted) implementations
//! - `AuthState`: signed-in / login-required notifications for the shell
//! - `CredentialStore`: Secure OS-level password storage via keyring

pub mod cipher;
pub mod credentials;
pub mod session;
pub mod state;

pub use cipher::SessionCipher;
pub use credentials::CredentialStore;
pub use session::{FileSessionStore, MemorySessionStore, SessionData, SessionStore};
pub use state::AuthState;
