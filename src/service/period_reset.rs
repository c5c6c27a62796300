//! Period reset: announce the elapsed period's champions and zero the
//! rolling windows.
//!
//! Runs once per period boundary. The persisted period marker guards against
//! double-firing around a process restart; the reset itself touches only
//! dirty rows and only the fields scoped to the period. The three metric
//! resets are batched per metric, not wrapped in one transaction - a crash
//! mid-run can leave some metrics reset and others not, which the next
//! successful run repairs.

use chrono::{DateTime, FixedOffset, Utc};
use sea_orm::DatabaseConnection;
use std::sync::Arc;

use crate::data::hall_of_fame::HallOfFameRepository;
use crate::data::period_marker::PeriodMarkerRepository;
use crate::data::user::UserRepository;
use crate::error::AppError;
use crate::model::period::{Champion, Period, PeriodSnapshot, RollingMetric};
use crate::model::user::UserRecord;
use crate::service::gateway::DiscordGateway;

/// What a reset run did.
#[derive(Debug, Clone)]
pub struct ResetReport {
    /// True when the period marker showed this period already ran.
    pub skipped: bool,
    /// Champions computed before the reset.
    pub snapshot: PeriodSnapshot,
    /// Total dirty rows zeroed across the three metrics.
    pub rows_reset: u64,
}

/// Service running the weekly and monthly resets.
pub struct PeriodResetService<'a> {
    db: &'a DatabaseConnection,
    gateway: Arc<dyn DiscordGateway>,
    announce_channel_id: u64,
}

/// Reads the rolling value a metric ranks by.
fn rolling_value(record: &UserRecord, period: Period, metric: RollingMetric) -> i64 {
    match (period, metric) {
        (Period::Weekly, RollingMetric::ClimbingPoints) => record.weekly_xp,
        (Period::Weekly, RollingMetric::GuidePoints) => record.weekly_guide_points,
        (Period::Weekly, RollingMetric::Expeditions) => record.weekly_expeditions,
        (Period::Monthly, RollingMetric::ClimbingPoints) => record.monthly_xp,
        (Period::Monthly, RollingMetric::GuidePoints) => record.monthly_guide_points,
        (Period::Monthly, RollingMetric::Expeditions) => record.monthly_expeditions,
    }
}

impl<'a> PeriodResetService<'a> {
    /// Creates a new PeriodResetService instance.
    ///
    /// # Arguments
    /// - `db` - Reference to the database connection
    /// - `gateway` - Outbound Discord surface for the announcement
    /// - `announce_channel_id` - Channel the champions embed goes to
    ///
    /// # Returns
    /// - `PeriodResetService` - New service instance
    pub fn new(
        db: &'a DatabaseConnection,
        gateway: Arc<dyn DiscordGateway>,
        announce_channel_id: u64,
    ) -> Self {
        Self {
            db,
            gateway,
            announce_channel_id,
        }
    }

    /// Runs one reset for the given period.
    ///
    /// `now` must already be in the scheduler timezone; the period key, the
    /// elapsed-period hall record and the double-fire guard all derive from
    /// it.
    ///
    /// Order of effects: guard check, champion snapshot, announcement
    /// (best-effort), hall-of-fame write, per-metric dirty reset, marker
    /// write. The marker is only written after the resets so a failed run
    /// retries on the next trigger.
    ///
    /// # Arguments
    /// - `period` - Weekly or monthly
    /// - `now` - Current time in the scheduler timezone
    ///
    /// # Returns
    /// - `Ok(ResetReport)` - What the run did (including a guarded skip)
    /// - `Err(AppError)` - Database error; the run stops where it failed
    pub async fn run(
        &self,
        period: Period,
        now: DateTime<FixedOffset>,
    ) -> Result<ResetReport, AppError> {
        let key = period.key(&now);

        let marker_repo = PeriodMarkerRepository::new(self.db);
        if marker_repo.last_run_key(period).await?.as_deref() == Some(key.as_str()) {
            tracing::info!("{} reset already ran for {}, skipping", period.as_str(), key);
            return Ok(ResetReport {
                skipped: true,
                snapshot: PeriodSnapshot::default(),
                rows_reset: 0,
            });
        }

        tracing::info!("running {} reset for {}", period.as_str(), key);

        let snapshot = self.compute_snapshot(period).await?;

        // The announcement is a side effect of the reset, not a precondition;
        // a send failure must not leave the period un-reset.
        if let Err(e) = self
            .gateway
            .announce_period_champions(self.announce_channel_id, period, &snapshot)
            .await
        {
            tracing::error!("failed to announce {} champions: {}", period.as_str(), e);
        }

        if !snapshot.is_empty() {
            let record_id = period.elapsed_record_id(&now);
            HallOfFameRepository::new(self.db)
                .record_champions(
                    &record_id,
                    period,
                    period.elapsed_year(&now),
                    Utc::now(),
                    &snapshot,
                )
                .await?;
        }

        let user_repo = UserRepository::new(self.db);
        let mut rows_reset = 0;
        for metric in RollingMetric::ALL {
            rows_reset += user_repo.reset_rolling(period, metric).await?;
        }

        marker_repo.set_last_run(period, &key).await?;

        tracing::info!(
            "{} reset complete: {} dirty row(s) zeroed",
            period.as_str(),
            rows_reset
        );

        Ok(ResetReport {
            skipped: false,
            snapshot,
            rows_reset,
        })
    }

    /// Computes the period's champions, one per rolling metric.
    ///
    /// A top row whose metric value is zero reports no champion for that
    /// metric rather than a spurious leader.
    async fn compute_snapshot(&self, period: Period) -> Result<PeriodSnapshot, AppError> {
        let repo = UserRepository::new(self.db);
        let mut snapshot = PeriodSnapshot::default();

        for metric in RollingMetric::ALL {
            let champion = repo
                .top_by(period, metric)
                .await?
                .filter(|record| rolling_value(record, period, metric) > 0)
                .map(|record| Champion {
                    value: rolling_value(&record, period, metric),
                    roblox_id: record.roblox_id,
                    roblox_username: record.roblox_username,
                    discord_id: record.discord_id,
                });

            match metric {
                RollingMetric::ClimbingPoints => snapshot.climber = champion,
                RollingMetric::GuidePoints => snapshot.host = champion,
                RollingMetric::Expeditions => snapshot.explorer = champion,
            }
        }

        Ok(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::testing::StubGateway;
    use chrono::TimeZone;
    use test_utils::{builder::TestBuilder, factory::user::UserFactory};

    fn monday_morning() -> DateTime<FixedOffset> {
        // Monday 2026-08-03 05:00 in the reset timezone.
        FixedOffset::east_opt(7 * 3600)
            .unwrap()
            .with_ymd_and_hms(2026, 8, 3, 5, 0, 0)
            .unwrap()
    }

    /// Tests the full weekly run: champion snapshot, dirty reset, marker,
    /// hall-of-fame record, announcement.
    ///
    /// User A has weekly points on a larger cumulative total; user B is
    /// clean.
    ///
    /// Expected: A announced as weekly climber with 50, A's weekly window
    /// zeroed with the cumulative total intact, B untouched
    #[tokio::test]
    async fn announces_and_resets_weekly() {
        let test = TestBuilder::new().with_ledger_tables().build().await.unwrap();
        let db = test.db.as_ref().unwrap();

        UserFactory::new(db)
            .roblox_id("a")
            .xp(500)
            .weekly_xp(50)
            .build()
            .await
            .unwrap();
        UserFactory::new(db)
            .roblox_id("b")
            .xp(300)
            .weekly_xp(0)
            .build()
            .await
            .unwrap();
        UserFactory::new(db)
            .roblox_id("c")
            .weekly_guide_points(30)
            .weekly_expeditions(4)
            .build()
            .await
            .unwrap();

        let gateway = Arc::new(StubGateway::default());
        let service = PeriodResetService::new(db, gateway.clone(), 4242);

        let report = service.run(Period::Weekly, monday_morning()).await.unwrap();

        assert!(!report.skipped);
        let climber = report.snapshot.climber.as_ref().unwrap();
        assert_eq!(climber.roblox_id, "a");
        assert_eq!(climber.value, 50);
        assert_eq!(report.snapshot.host.as_ref().unwrap().roblox_id, "c");
        assert_eq!(report.snapshot.explorer.as_ref().unwrap().value, 4);
        // a.weekly_xp, c.weekly_guide_points, c.weekly_expeditions
        assert_eq!(report.rows_reset, 3);

        let repo = UserRepository::new(db);
        let a = repo.find_by_roblox_id("a").await.unwrap().unwrap();
        assert_eq!(a.weekly_xp, 0);
        assert_eq!(a.xp, 500);
        let b = repo.find_by_roblox_id("b").await.unwrap().unwrap();
        assert_eq!(b.xp, 300);

        assert_eq!(gateway.champion_announcements.lock().unwrap().len(), 1);

        let hall = HallOfFameRepository::new(db);
        let record = hall.find_by_id("weekly-2026-07-27").await.unwrap().unwrap();
        assert_eq!(record.period, "weekly");
        assert!(record.climber.is_some());
    }

    /// Tests the double-fire guard.
    ///
    /// Expected: the second run inside the same period is a skip with no
    /// second announcement
    #[tokio::test]
    async fn second_run_in_same_period_skips() {
        let test = TestBuilder::new().with_ledger_tables().build().await.unwrap();
        let db = test.db.as_ref().unwrap();

        UserFactory::new(db).roblox_id("a").weekly_xp(10).build().await.unwrap();

        let gateway = Arc::new(StubGateway::default());
        let service = PeriodResetService::new(db, gateway.clone(), 4242);

        let first = service.run(Period::Weekly, monday_morning()).await.unwrap();
        assert!(!first.skipped);

        let second = service.run(Period::Weekly, monday_morning()).await.unwrap();
        assert!(second.skipped);
        assert_eq!(second.rows_reset, 0);
        assert_eq!(gateway.champion_announcements.lock().unwrap().len(), 1);
    }

    /// Tests the zero-leader rule.
    ///
    /// Expected: an all-zero ledger announces with no champions and writes
    /// no hall-of-fame record
    #[tokio::test]
    async fn zero_values_report_no_champions() {
        let test = TestBuilder::new().with_ledger_tables().build().await.unwrap();
        let db = test.db.as_ref().unwrap();

        UserFactory::new(db).roblox_id("a").build().await.unwrap();

        let gateway = Arc::new(StubGateway::default());
        let service = PeriodResetService::new(db, gateway.clone(), 4242);

        let report = service.run(Period::Weekly, monday_morning()).await.unwrap();

        assert!(report.snapshot.is_empty());
        assert_eq!(report.rows_reset, 0);
        // The announcement still goes out, reporting "none" per category.
        assert_eq!(gateway.champion_announcements.lock().unwrap().len(), 1);

        let hall = HallOfFameRepository::new(db);
        assert!(hall.find_by_id("weekly-2026-07-27").await.unwrap().is_none());
    }

    /// Tests window isolation between cadences.
    ///
    /// Expected: a monthly reset zeroes monthly counters and leaves the
    /// weekly window alone
    #[tokio::test]
    async fn monthly_reset_leaves_weekly_window() {
        let test = TestBuilder::new().with_ledger_tables().build().await.unwrap();
        let db = test.db.as_ref().unwrap();

        UserFactory::new(db)
            .roblox_id("a")
            .weekly_xp(50)
            .monthly_xp(70)
            .build()
            .await
            .unwrap();

        let gateway = Arc::new(StubGateway::default());
        let service = PeriodResetService::new(db, gateway, 4242);

        let first_of_month = FixedOffset::east_opt(7 * 3600)
            .unwrap()
            .with_ymd_and_hms(2026, 8, 1, 5, 0, 0)
            .unwrap();
        service.run(Period::Monthly, first_of_month).await.unwrap();

        let repo = UserRepository::new(db);
        let a = repo.find_by_roblox_id("a").await.unwrap().unwrap();
        assert_eq!(a.monthly_xp, 0);
        assert_eq!(a.weekly_xp, 50);
    }

    /// Tests that an announcement failure does not block the reset.
    ///
    /// Expected: windows zeroed and marker written despite the failed send
    #[tokio::test]
    async fn announcement_failure_does_not_block_reset() {
        let test = TestBuilder::new().with_ledger_tables().build().await.unwrap();
        let db = test.db.as_ref().unwrap();

        UserFactory::new(db).roblox_id("a").weekly_xp(50).build().await.unwrap();

        let gateway = Arc::new(StubGateway {
            fail_announcements: true,
            ..Default::default()
        });
        let service = PeriodResetService::new(db, gateway, 4242);

        let report = service.run(Period::Weekly, monday_morning()).await.unwrap();
        assert!(!report.skipped);
        assert_eq!(report.rows_reset, 1);

        let repo = UserRepository::new(db);
        assert_eq!(repo.find_by_roblox_id("a").await.unwrap().unwrap().weekly_xp, 0);

        let markers = PeriodMarkerRepository::new(db);
        assert_eq!(
            markers.last_run_key(Period::Weekly).await.unwrap().as_deref(),
            Some("2026-W32")
        );
    }
}
