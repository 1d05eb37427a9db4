use std::sync::Arc;
use tictactoe::{app, AppState, Config, InMemoryConnectionManager, RoomRegistry};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.log_filter.clone().into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!(config = ?config, "Starting tic-tac-toe server");

    // One registry for the whole process, shared by every connection
    let app_state = AppState::new(
        Arc::new(RoomRegistry::new()),
        Arc::new(InMemoryConnectionManager::new()),
    );

    let listener = match tokio::net::TcpListener::bind(config.bind_address).await {
        Ok(listener) => listener,
        Err(e) => {
            error!(bind_address = %config.bind_address, error = %e, "Failed to bind listener");
            std::process::exit(1);
        }
    };
    info!("Server running on http://{}", config.bind_address);

    if let Err(e) = axum::serve(listener, app(app_state)).await {
        error!(error = %e, "Server error");
        std::process::exit(1);
    }
}
