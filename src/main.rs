use std::process::ExitCode;

use tracing::{error, info};

use filekeep::{AppState, Config, Database, WebServer};

#[tokio::main]
async fn main() -> ExitCode {
    // Load configuration
    let config = match Config::load_with_env("config.toml") {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load config.toml: {e}");
            eprintln!("Using default configuration.");
            let mut config = Config::default();
            config.apply_env_overrides();
            config
        }
    };

    // Initialize logging
    if let Err(e) = filekeep::logging::init(&config.logging) {
        eprintln!("Failed to initialize logging: {e}");
        // Fall back to console-only logging
        filekeep::logging::init_console_only(&config.logging.level);
    }

    info!("Filekeep - authenticated file manager");

    if let Err(e) = run(config).await {
        error!("Fatal error: {e}");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

async fn run(config: Config) -> filekeep::Result<()> {
    config.validate()?;

    let db = Database::open(&config.database.path).await?;
    let state = AppState::from_config(&config, db).await?;
    info!(
        storage = %config.files.storage_path,
        enforce_ownership = config.files.enforce_ownership,
        "File namespace ready"
    );

    let server = WebServer::new(&config.server, state)?;
    info!("Server configured on {}", server.addr());

    server.run().await
}
