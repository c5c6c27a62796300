use crate::error::{config::ConfigError, AppError};
use crate::model::level::LevelTables;

pub struct Config {
    pub database_url: String,

    pub discord_bot_token: String,
    pub announcement_channel_id: u64,
    pub points_log_channel_id: u64,

    pub roblox_group_id: u64,
    pub roblox_cookie: Option<String>,
    pub roblox_open_cloud_api_key: Option<String>,

    pub levels_file: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        Ok(Self {
            database_url: require("DATABASE_URL")?,
            discord_bot_token: require("DISCORD_BOT_TOKEN")?,
            announcement_channel_id: require_u64("ANNOUNCEMENT_CHANNEL_ID")?,
            points_log_channel_id: require_u64("POINTS_LOG_CHANNEL_ID")?,
            roblox_group_id: require_u64("ROBLOX_GROUP_ID")?,
            roblox_cookie: std::env::var("ROBLOX_COOKIE").ok().filter(|v| !v.is_empty()),
            roblox_open_cloud_api_key: std::env::var("ROBLOX_OPENCLOUD_API_KEY")
                .ok()
                .filter(|v| !v.is_empty()),
            levels_file: std::env::var("LEVELS_FILE").ok().filter(|v| !v.is_empty()),
        })
    }

    /// Loads the level tables from the configured file, falling back to the
    /// built-in ladders when no file is named.
    pub fn load_level_tables(&self) -> Result<LevelTables, AppError> {
        let Some(path) = &self.levels_file else {
            return Ok(LevelTables::default());
        };

        let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::LevelTable {
            path: path.clone(),
            reason: e.to_string(),
        })?;

        let tables = serde_json::from_str(&contents).map_err(|e| ConfigError::LevelTable {
            path: path.clone(),
            reason: e.to_string(),
        })?;

        Ok(tables)
    }
}

fn require(name: &str) -> Result<String, AppError> {
    std::env::var(name)
        .map_err(|_| ConfigError::MissingEnvVar(name.to_string()).into())
}

fn require_u64(name: &str) -> Result<u64, AppError> {
    let value = require(name)?;
    value.parse().map_err(|_| {
        ConfigError::InvalidEnvVar {
            name: name.to_string(),
            value,
        }
        .into()
    })
}
