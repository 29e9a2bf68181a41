//! affdash core - authenticated client for the affiliate admin backend.
//!
//! The pieces fit together like this:
//!
//! - `config::Config` says where the backend lives.
//! - An `auth::SessionStore` holds the access/refresh token pair.
//! - `api::ApiClient` injects the bearer token, refreshes it once on 401
//!   and publishes `auth::AuthState` changes.
//! - `services` wraps each admin resource in typed calls.

pub mod api;
pub mod auth;
pub mod config;
pub mod models;
pub mod services;
pub mod utils;

pub use api::{ApiClient, ApiError, ApiResponse};
pub use auth::{AuthState, FileSessionStore, MemorySessionStore, SessionData, SessionStore};
pub use config::Config;
