//! Shared utilities for the Formpulse workspace.

pub mod logger;
pub mod time;
