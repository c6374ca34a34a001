//! unread-sync - Unread-state reconciliation for chat clients.
//!
//! Tracks per-conversation unread counts, marks conversations read once the
//! user has actually seen new content, and reconciles local estimates with
//! the authoritative values returned by the backend.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

/// Application layer containing the unread tracking services.
pub mod application;
/// Domain layer containing entities, errors, events and port definitions.
pub mod domain;
/// Infrastructure layer containing adapters, configuration and replay.
pub mod infrastructure;

/// Current version of the application.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name.
pub const NAME: &str = "unread-sync";
