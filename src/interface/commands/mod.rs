//! # Command Handlers
//!
//! Contains specific handler functions for each supported command
//! (repos, repo, search, create, help). These handlers are invoked by the
//! Router and reply exactly once per interaction.

pub mod create;
pub mod form;
pub mod get;
pub mod help;
pub mod list;
pub mod search;
