//! REST API client module for the admin backend.
//!
//! This module provides the `ApiClient` used by every service. Calls are
//! described by an immutable `RequestDescriptor`, authenticated with the
//! bearer token held in the session store, and transparently retried once
//! after a token refresh when the backend answers 401.

pub mod client;
pub mod error;
pub mod request;

pub use client::{ApiClient, ApiResponse};
pub use error::{ApiError, ErrorBody};
pub use request::{
    query_pairs, MultipartField, MultipartPayload, Payload, RequestDescriptor, RequestOptions,
};
