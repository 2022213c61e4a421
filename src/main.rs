use std::process::ExitCode;

use tracing::{error, info};

use housebot::{Bot, Config, Database, TelegramTransport};

#[tokio::main]
async fn main() -> ExitCode {
    // A missing .env file is fine
    let _ = dotenvy::dotenv();

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
    if let Err(e) = housebot::logging::init(&config.logging) {
        eprintln!("Failed to initialize logging: {e}");
        // Fall back to console-only logging
        housebot::logging::init_console_only(&config.logging.level);
    }

    if let Err(e) = config.validate_for_bot() {
        error!("Invalid configuration: {}", e);
        return ExitCode::FAILURE;
    }

    info!("Housebot - household chat bot");
    info!(
        "Household of {} (rent day {}, timezone {})",
        config.household.participant_count, config.household.rent_day, config.household.timezone
    );

    let db = match Database::open(&config.database.path).await {
        Ok(db) => db,
        Err(e) => {
            error!("Failed to open database: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let transport = match TelegramTransport::new(&config.bot) {
        Ok(transport) => transport,
        Err(e) => {
            error!("Failed to create transport: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let username = match transport.get_me().await {
        Ok(username) => username,
        Err(e) => {
            error!("Failed to look up bot username: {}", e);
            return ExitCode::FAILURE;
        }
    };
    info!("Connected as @{}", username);

    let mut bot = Bot::new(transport, db.clone(), config.household.clone()).with_username(username);
    bot.run(async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
        info!("Shutdown requested");
    })
    .await;

    db.close().await;
    ExitCode::SUCCESS
}
