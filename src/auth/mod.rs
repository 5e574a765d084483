//! Authentication module for managing session tokens and credentials.
//!
//! This module provides:
//! - `TokenStore`: the access/refresh token pair, persisted across restarts
//! - `CredentialStore`: optional OS-keychain storage of the sign-in password
//!
//! The token pair is replaced atomically on sign-in and refresh and
//! cleared on sign-out or terminal refresh failure.

pub mod credentials;
pub mod session;

pub use credentials::CredentialStore;
pub use session::{CredentialPair, TokenStore};
