//! Inbox API Server entry point
//!
//! Run with:
//! ```bash
//! cargo run -p inbox-api
//! ```
//!
//! Configuration is loaded from environment variables and an optional `.env` file.

use inbox_common::{try_init_tracing_with_config, AppConfig, TracingConfig};
use tracing::{error, info};

#[tokio::main]
async fn main() {
    // Configuration decides the log format, so read it before tracing is up
    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    let tracing_config = TracingConfig::for_environment(config.app.env);
    if let Err(e) = try_init_tracing_with_config(&tracing_config) {
        eprintln!("Warning: Failed to initialize tracing: {e}");
    }

    info!(
        app = %config.app.name,
        env = ?config.app.env,
        port = config.api.port,
        history_policy = %config.messaging.history_policy,
        "Configuration loaded"
    );

    if let Err(e) = inbox_api::run(config).await {
        error!(error = %e, "Server failed to start");
        std::process::exit(1);
    }
}
