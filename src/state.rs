//! Application state shared across bot event handlers.
//!
//! Holds the resources every handler needs: the database connection pool,
//! the Roblox platform client, the configured level tables, and the channel
//! and group IDs operations report to. Initialized once during startup and
//! cloned cheaply per event (every field is a pool, an `Arc`, or a scalar).

use sea_orm::DatabaseConnection;
use std::sync::Arc;

use crate::model::level::LevelTables;
use crate::service::roblox::RobloxClient;

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool for the ledger and giveaway stores.
    pub db: DatabaseConnection,

    /// Roblox platform client (cookie or Open Cloud, chosen at startup).
    pub roblox: Arc<dyn RobloxClient>,

    /// Climbing and guide level ladders.
    pub levels: Arc<LevelTables>,

    /// Community Roblox group ID for membership checks and rank sync.
    pub roblox_group_id: u64,

    /// Channel for period champion announcements.
    pub announcement_channel_id: u64,

    /// Operator channel receiving audit logs and side-effect failure reports.
    pub points_log_channel_id: u64,
}
