//! Best-effort Roblox group rank sync.
//!
//! Pushes the tier a member earned onto the community group. Dispatched as a
//! detached task after a ledger write that crossed a tier boundary: it can
//! never block or fail the write that triggered it. Failures are logged and
//! reported to the operator channel, never swallowed.

use std::sync::Arc;

use crate::error::AppError;
use crate::model::level::LevelTable;
use crate::service::gateway::DiscordGateway;
use crate::service::roblox::RobloxClient;

/// What a sync attempt did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    /// The group role was moved to the earned tier.
    Updated { from: String, to: String },
    /// The member already holds the earned tier's role.
    AlreadyCorrect,
    /// The member's current group rank is outside the ladder's numeric
    /// range - a staff/booster/donor role the ladder does not own. Skipped
    /// by policy, never overwritten.
    OutsideLadder,
    /// The account is not a member of the community group.
    NotInGroup,
}

/// Service syncing earned tiers onto the Roblox group.
pub struct RankSyncService {
    roblox: Arc<dyn RobloxClient>,
    gateway: Arc<dyn DiscordGateway>,
    ladder: LevelTable,
    group_id: u64,
    operator_channel_id: u64,
}

impl RankSyncService {
    /// Creates a new RankSyncService instance.
    ///
    /// # Arguments
    /// - `roblox` - Platform client (cookie or Open Cloud)
    /// - `gateway` - Outbound Discord surface for operator reports
    /// - `ladder` - The climbing level table ranks are derived from
    /// - `group_id` - Community group ID
    /// - `operator_channel_id` - Channel that receives failure reports
    ///
    /// # Returns
    /// - `RankSyncService` - New service instance
    pub fn new(
        roblox: Arc<dyn RobloxClient>,
        gateway: Arc<dyn DiscordGateway>,
        ladder: LevelTable,
        group_id: u64,
        operator_channel_id: u64,
    ) -> Self {
        Self {
            roblox,
            gateway,
            ladder,
            group_id,
            operator_channel_id,
        }
    }

    /// Syncs one member's group role to the tier their points earn.
    ///
    /// Skip policy: members outside the group are left alone, as are members
    /// whose current rank lies outside the ladder's numeric span - those
    /// hold roles the ladder does not manage.
    ///
    /// # Arguments
    /// - `roblox_id` - Roblox user ID
    /// - `points` - Cumulative points after the triggering action
    ///
    /// # Returns
    /// - `Ok(SyncOutcome)` - What happened
    /// - `Err(AppError::ExternalService)` - Platform unreachable or rejected
    pub async fn sync(&self, roblox_id: u64, points: i64) -> Result<SyncOutcome, AppError> {
        let target = self.ladder.level_for(points);

        let Some(current) = self.roblox.get_rank_in_group(roblox_id, self.group_id).await? else {
            return Ok(SyncOutcome::NotInGroup);
        };

        let (min_rank, max_rank) = self.ladder.rank_span();
        if current.rank < min_rank || current.rank > max_rank {
            tracing::debug!(
                "skipping rank sync for {}: {} (rank {}) is outside the ladder",
                roblox_id,
                current.role_name,
                current.rank
            );
            return Ok(SyncOutcome::OutsideLadder);
        }

        if current.role_id == target.role_id {
            return Ok(SyncOutcome::AlreadyCorrect);
        }

        self.roblox
            .set_rank(roblox_id, self.group_id, target.role_id)
            .await?;

        Ok(SyncOutcome::Updated {
            from: current.role_name,
            to: target.name.clone(),
        })
    }

    /// Runs a sync inside its own error boundary.
    ///
    /// Outcomes are logged; failures are additionally reported to the
    /// operator channel. Never returns an error - this is the body of the
    /// detached task.
    pub async fn sync_and_report(&self, roblox_id: u64, points: i64) {
        match self.sync(roblox_id, points).await {
            Ok(SyncOutcome::Updated { from, to }) => {
                tracing::info!("synced roblox user {}: {} -> {}", roblox_id, from, to);
            }
            Ok(outcome) => {
                tracing::debug!("rank sync for {} resolved as {:?}", roblox_id, outcome);
            }
            Err(e) => {
                tracing::error!("rank sync failed for roblox user {}: {}", roblox_id, e);
                let report = format!("⚠️ Rank sync failed for Roblox user `{}`: {}", roblox_id, e);
                if let Err(report_err) = self
                    .gateway
                    .report_operator(self.operator_channel_id, &report)
                    .await
                {
                    tracing::error!("failed to report rank sync failure: {}", report_err);
                }
            }
        }
    }

    /// Fires a sync as a detached task.
    ///
    /// The caller's operation is already durable; this never blocks it and
    /// never surfaces an error to it.
    pub fn spawn(self: &Arc<Self>, roblox_id: u64, points: i64) {
        let service = Arc::clone(self);
        tokio::spawn(async move {
            service.sync_and_report(roblox_id, points).await;
        });
    }
}
