//! Server runtime configuration.

use std::time::Duration;

/// Runtime settings, built from the command line by the binary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Host address to bind to
    pub host: String,
    /// Port to bind to (`0` picks a free port)
    pub port: u16,
    /// Upper bound for a single push to one client; a slower client is evicted
    pub send_timeout: Duration,
    /// Capacity of each connection's outbound queue
    pub outbound_buffer: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            send_timeout: Duration::from_millis(1000),
            outbound_buffer: 64,
        }
    }
}
