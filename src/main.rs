use tracing::info;

use valley::{BoardService, Config, Database};

#[tokio::main]
async fn main() {
    // Load configuration
    let config = match Config::load_with_env("config.toml") {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load config.toml: {e}");
            eprintln!("Using default configuration.");
            Config::default()
        }
    };

    if let Err(e) = config.validate() {
        eprintln!("Invalid configuration: {e}");
        std::process::exit(1);
    }

    // Initialize logging
    if let Err(e) = valley::logging::init(&config.logging) {
        eprintln!("Failed to initialize logging: {e}");
        // Fall back to console-only logging
        valley::logging::init_console_only(&config.logging.level);
    }

    info!("Valley - board catalog and subscription core");

    let db = match Database::open(&config.database.path).await {
        Ok(db) => db,
        Err(e) => {
            eprintln!("Failed to open database at {}: {e}", config.database.path);
            std::process::exit(1);
        }
    };

    match db.schema_version().await {
        Ok(version) => info!(version, "Database ready"),
        Err(e) => {
            eprintln!("Failed to read schema version: {e}");
            std::process::exit(1);
        }
    }

    match BoardService::new(&db).list_boards().await {
        Ok(boards) => info!(board_count = boards.len(), "Catalog loaded"),
        Err(e) => {
            eprintln!("Failed to load board catalog: {e}");
            std::process::exit(1);
        }
    }
}
