//! REST API client module for the Tasklane service.
//!
//! This module provides the `ApiClient` for communicating with the
//! Tasklane API: account creation, session management, and the task
//! list.
//!
//! The API uses bearer token authentication; when an access token is
//! rejected the client refreshes the session once and resubmits the
//! original request, so callers never see a recoverable 401.

pub mod client;
pub mod error;
pub mod response;

pub use client::ApiClient;
pub use error::ApiError;
