//! Local caching module for offline data access.
//!
//! This module provides the `CacheManager` for storing and retrieving
//! Tasklane data locally. Data is cached in JSON format and considered
//! stale after 15 minutes.
//!
//! Cached data types include the task list and the user profile.

pub mod manager;

pub use manager::{CacheManager, CachedData};
