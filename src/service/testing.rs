//! Test doubles for the external surfaces.
//!
//! `StubGateway` and `StubRoblox` record every call so service tests can
//! assert on side effects without touching Discord or Roblox.

use serenity::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

use crate::error::AppError;
use crate::model::period::{Period, PeriodSnapshot};
use crate::service::gateway::DiscordGateway;
use crate::service::roblox::{GroupRank, RobloxClient, RobloxProfile};

/// Recording stub for the Discord gateway.
pub struct StubGateway {
    /// Whether `message_exists` reports the announcement as present.
    pub message_present: bool,
    /// Whether announcement sends fail with an external error.
    pub fail_announcements: bool,
    /// Member role IDs by user ID; absent users are not members.
    pub member_roles: HashMap<u64, Vec<u64>>,
    /// Every count passed to `update_entrant_count`.
    pub entrant_counts: Mutex<Vec<u64>>,
    /// Winner lists passed to `announce_giveaway_result`.
    pub announced_results: Mutex<Vec<Vec<String>>>,
    /// Winner lists passed to `finalize_giveaway_message`.
    pub finalized: Mutex<Vec<Vec<String>>>,
    /// Winner lists passed to `announce_reroll`.
    pub announced_rerolls: Mutex<Vec<Vec<String>>>,
    /// Snapshots passed to `announce_period_champions`.
    pub champion_announcements: Mutex<Vec<(Period, PeriodSnapshot)>>,
    /// Messages passed to `report_operator`.
    pub operator_reports: Mutex<Vec<String>>,
}

impl Default for StubGateway {
    fn default() -> Self {
        Self {
            message_present: true,
            fail_announcements: false,
            member_roles: HashMap::new(),
            entrant_counts: Mutex::new(Vec::new()),
            announced_results: Mutex::new(Vec::new()),
            finalized: Mutex::new(Vec::new()),
            announced_rerolls: Mutex::new(Vec::new()),
            champion_announcements: Mutex::new(Vec::new()),
            operator_reports: Mutex::new(Vec::new()),
        }
    }
}

impl StubGateway {
    fn maybe_fail(&self) -> Result<(), AppError> {
        if self.fail_announcements {
            return Err(AppError::ExternalService("stubbed send failure".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl DiscordGateway for StubGateway {
    async fn message_exists(&self, _channel_id: u64, _message_id: u64) -> Result<bool, AppError> {
        Ok(self.message_present)
    }

    async fn member_role_ids(
        &self,
        _guild_id: u64,
        user_id: u64,
    ) -> Result<Option<Vec<u64>>, AppError> {
        Ok(self.member_roles.get(&user_id).cloned())
    }

    async fn update_entrant_count(
        &self,
        _channel_id: u64,
        _message_id: u64,
        count: u64,
    ) -> Result<(), AppError> {
        self.maybe_fail()?;
        self.entrant_counts.lock().unwrap().push(count);
        Ok(())
    }

    async fn announce_giveaway_result(
        &self,
        _channel_id: u64,
        _reply_to: u64,
        _prize: &str,
        winners: &[String],
    ) -> Result<(), AppError> {
        self.maybe_fail()?;
        self.announced_results.lock().unwrap().push(winners.to_vec());
        Ok(())
    }

    async fn finalize_giveaway_message(
        &self,
        _channel_id: u64,
        _message_id: u64,
        _prize: &str,
        winners: &[String],
    ) -> Result<(), AppError> {
        self.maybe_fail()?;
        self.finalized.lock().unwrap().push(winners.to_vec());
        Ok(())
    }

    async fn announce_reroll(
        &self,
        _channel_id: u64,
        _prize: &str,
        winners: &[String],
    ) -> Result<(), AppError> {
        self.maybe_fail()?;
        self.announced_rerolls.lock().unwrap().push(winners.to_vec());
        Ok(())
    }

    async fn announce_period_champions(
        &self,
        _channel_id: u64,
        period: Period,
        snapshot: &PeriodSnapshot,
    ) -> Result<(), AppError> {
        self.maybe_fail()?;
        self.champion_announcements
            .lock()
            .unwrap()
            .push((period, snapshot.clone()));
        Ok(())
    }

    async fn report_operator(&self, _channel_id: u64, message: &str) -> Result<(), AppError> {
        self.operator_reports.lock().unwrap().push(message.to_string());
        Ok(())
    }
}

/// Recording stub for the Roblox platform client.
#[derive(Default)]
pub struct StubRoblox {
    /// Profiles by username.
    pub profiles: HashMap<String, RobloxProfile>,
    /// Group ranks by user ID; absent users are not group members.
    pub ranks: HashMap<u64, GroupRank>,
    /// Whether `set_rank` fails with an external error.
    pub fail_set_rank: bool,
    /// Every (user_id, group_id, role_id) passed to `set_rank`.
    pub set_rank_calls: Mutex<Vec<(u64, u64, u64)>>,
}

#[async_trait]
impl RobloxClient for StubRoblox {
    async fn get_user_by_username(
        &self,
        username: &str,
    ) -> Result<Option<RobloxProfile>, AppError> {
        Ok(self.profiles.get(username).cloned())
    }

    async fn get_rank_in_group(
        &self,
        user_id: u64,
        _group_id: u64,
    ) -> Result<Option<GroupRank>, AppError> {
        Ok(self.ranks.get(&user_id).cloned())
    }

    async fn set_rank(&self, user_id: u64, group_id: u64, role_id: u64) -> Result<(), AppError> {
        if self.fail_set_rank {
            return Err(AppError::ExternalService("stubbed rank failure".to_string()));
        }
        self.set_rank_calls
            .lock()
            .unwrap()
            .push((user_id, group_id, role_id));
        Ok(())
    }
}
