//! Data models for Tasklane entities.
//!
//! This module contains the data structures exchanged with the
//! Tasklane API:
//!
//! - `Task`, `NewTask`, `TaskUpdate`: the task list and its mutation payloads
//! - `User`, `Registration`, `CreatedUser`: account and profile types

pub mod task;
pub mod user;

pub use task::{NewTask, Task, TaskUpdate};
pub use user::{CreatedUser, Registration, User};
