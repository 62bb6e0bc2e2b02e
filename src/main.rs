//! # httplet - Entry Point
//! src/main.rs

use httplet::config::Config;
use httplet::server::Server;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "httplet=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::new();

    if let Err(e) = config.validate() {
        tracing::error!(error = %e, "invalid configuration");
        std::process::exit(2);
    }

    tracing::info!(
        address = %config.address(),
        directory = ?config.directory,
        confine_paths = config.confine_paths,
        max_header_bytes = config.max_header_bytes,
        max_body_bytes = config.max_body_bytes,
        "configuration loaded"
    );

    let server = match Server::bind(&config) {
        Ok(server) => server,
        Err(e) => {
            tracing::error!(error = %e, address = %config.address(), "failed to bind");
            std::process::exit(1);
        }
    };

    if let Err(e) = server.run() {
        tracing::error!(error = %e, "server stopped");
        std::process::exit(1);
    }
}
