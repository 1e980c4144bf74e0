//! Real-time form analytics server.
//!
//! Stores form submissions, recomputes per-field statistics on every new
//! response and pushes them over WebSocket to every dashboard subscribed to
//! that form.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;

pub mod config;
