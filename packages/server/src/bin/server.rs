//! Real-time form analytics server.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin formpulse-server
//! cargo run --bin formpulse-server -- --host 0.0.0.0 --port 3000 --send-timeout-ms 500
//! ```

use std::time::Duration;

use clap::Parser;
use formpulse_server::{
    config::ServerConfig,
    ui::{AppState, Server},
};
use formpulse_shared::logger::setup_logger;

#[derive(Parser, Debug)]
#[command(name = "formpulse-server")]
#[command(about = "Real-time form analytics server with WebSocket fan-out", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, default_value = "127.0.0.1")]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, default_value = "8080")]
    port: u16,

    /// Per-client send timeout in milliseconds; slower clients are evicted
    #[arg(long, default_value = "1000")]
    send_timeout_ms: u64,

    /// Capacity of each connection's outbound queue
    #[arg(long, default_value = "64")]
    outbound_buffer: usize,

    /// Default log level when RUST_LOG is not set
    #[arg(long, default_value = "info")]
    log_level: String,
}

impl From<Args> for ServerConfig {
    fn from(args: Args) -> Self {
        Self {
            host: args.host,
            port: args.port,
            send_timeout: Duration::from_millis(args.send_timeout_ms),
            outbound_buffer: args.outbound_buffer,
        }
    }
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), &args.log_level);

    let config = ServerConfig::from(args);
    tracing::info!(
        "Starting with send timeout {:?}, outbound buffer {}",
        config.send_timeout,
        config.outbound_buffer
    );

    let server = Server::new(AppState::in_memory(&config));
    if let Err(e) = server.run(config.host, config.port).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
