mod bot;
mod config;
mod data;
mod error;
mod model;
mod scheduler;
mod service;
mod startup;
mod state;
mod util;

use std::sync::Arc;

use crate::config::Config;
use crate::error::AppError;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let config = Config::from_env()?;
    let levels = Arc::new(config.load_level_tables()?);

    let db = startup::connect_to_database(&config).await?;

    let http_client = reqwest::Client::new();
    let roblox = service::roblox::client_from_config(&config, http_client)?;

    let state = AppState {
        db: db.clone(),
        roblox,
        levels,
        roblox_group_id: config.roblox_group_id,
        announcement_channel_id: config.announcement_channel_id,
        points_log_channel_id: config.points_log_channel_id,
    };

    tracing::info!("Starting mooncrest");

    let (client, discord_http) = bot::start::init_bot(&config, state).await?;

    // Weekly/monthly reset scheduler
    let reset_db = db.clone();
    let reset_http = discord_http.clone();
    let announce_channel_id = config.announcement_channel_id;
    tokio::spawn(async move {
        if let Err(e) =
            scheduler::period_reset::start_scheduler(reset_db, reset_http, announce_channel_id)
                .await
        {
            tracing::error!("Period reset scheduler error: {}", e);
        }
    });

    // Giveaway sweep scheduler
    let sweep_db = db.clone();
    let sweep_http = discord_http.clone();
    tokio::spawn(async move {
        if let Err(e) = scheduler::giveaway_sweep::start_scheduler(sweep_db, sweep_http).await {
            tracing::error!("Giveaway sweep scheduler error: {}", e);
        }
    });

    // Blocks until the gateway connection shuts down.
    bot::start::start_bot(client).await
}
