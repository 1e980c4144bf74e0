//! HTTP and WebSocket handlers.

mod http;
mod websocket;

pub use http::{
    create_form, get_analytics, get_form, get_public_form, health_check, list_forms,
    list_responses, submit_public_response, submit_response, update_form,
};
pub use websocket::websocket_handler;
