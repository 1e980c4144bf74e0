//! UI layer: the axum router, HTTP handlers and the WebSocket protocol loop.

mod handler;
mod server;
mod signal;
pub mod state;

pub use server::{Server, router};
pub use state::AppState;
