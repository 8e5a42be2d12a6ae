//! # Strings
//!
//! Centralizes user-facing text: help pages and message templates.

pub mod help;
pub mod messages;
