use std::process::ExitCode;

use dotenvy::dotenv;
use tracing_subscriber::EnvFilter;

use attend_server::{start_server, Config};

#[tokio::main]
async fn main() -> ExitCode {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Invalid configuration: {e}");
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = start_server(config).await {
        tracing::error!("{e}");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}
