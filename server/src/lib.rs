//! RSVP service: shows an event, takes attendance sign-ups from a form,
//! tracks anonymous attendees by a `client_id` cookie and logged-in ones by
//! their account, and lets administrators edit the underlying records.

pub mod config;
pub mod db;
pub mod extract;
pub mod handlers;
pub mod models;
pub mod repository;
pub mod routes;
pub mod services;
pub mod state;
pub mod utils;

use tokio::net::TcpListener;
use tokio::signal;
use tracing::info;

pub use config::Config;
pub use routes::create_routes;
pub use state::AppState;
pub use utils::error::{AppError, StartupError};

pub async fn start_server(config: Config) -> Result<(), StartupError> {
    let pool = db::connect(&config.database_url, config.max_connections).await?;
    info!("Successfully connected to database");

    let addr = config.bind_addr.clone();
    let app = create_routes(AppState::new(pool, config));

    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|source| StartupError::Bind {
            addr: addr.clone(),
            source,
        })?;
    info!("Server running at http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(StartupError::Serve)?;

    info!("Server shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {e}");
            std::future::pending::<()>().await;
        }
        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                tracing::error!("Failed to install signal handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
