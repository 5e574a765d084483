//! Tasklane client library - sessions, auth, tasks, offline cache.
//!
//! This crate wraps the Tasklane task-management REST API behind a
//! typed client. The centerpiece is the authenticated session
//! lifecycle: the [`ApiClient`] attaches the stored bearer token to
//! every request and, when the server rejects an expired access token,
//! silently exchanges the refresh token for a new pair and resubmits
//! the request exactly once. A recovered request is indistinguishable
//! from one that never failed; a dead refresh token surfaces as
//! [`ApiError::SessionExpired`] and the consumer treats the user as
//! signed out.
//!
//! ```no_run
//! use std::sync::Arc;
//! use tasklane::{ApiClient, Config, TokenStore};
//!
//! # async fn run() -> anyhow::Result<()> {
//! let config = Config::load()?;
//! let tokens = Arc::new(TokenStore::new(config.data_dir()?));
//! tokens.load()?;
//!
//! let client = ApiClient::new(config.base_url(), tokens)?;
//! if !client.is_authenticated() {
//!     client.sign_in("ada@example.com", "secret").await?;
//! }
//! for task in client.list_tasks().await? {
//!     println!("{}", task.content);
//! }
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod auth;
pub mod cache;
pub mod config;
pub mod models;

pub use api::{ApiClient, ApiError};
pub use auth::{CredentialPair, CredentialStore, TokenStore};
pub use cache::CacheManager;
pub use config::Config;
pub use models::{CreatedUser, NewTask, Registration, Task, TaskUpdate, User};
