use chrono::Utc;
use sea_orm::DatabaseConnection;
use serenity::http::Http;
use std::sync::Arc;
use tokio_cron_scheduler::{Job, JobScheduler};

use crate::error::AppError;
use crate::model::period::Period;
use crate::service::gateway::SerenityGateway;
use crate::service::period_reset::PeriodResetService;

/// Fixed zone the reset boundaries are evaluated in.
pub const RESET_TIMEZONE: chrono_tz::Tz = chrono_tz::Asia::Jakarta;

/// Monday 05:00.
const WEEKLY_SCHEDULE: &str = "0 0 5 * * Mon";
/// 1st of the month, 05:00.
const MONTHLY_SCHEDULE: &str = "0 0 5 1 * *";

/// Starts the weekly and monthly reset scheduler
///
/// Both jobs evaluate their cron expression in the fixed reset timezone.
/// Each firing announces the elapsed period's champions and zeroes the dirty
/// rolling counters; the persisted period marker keeps a restart near the
/// boundary from running the same period twice.
///
/// # Arguments
/// - `db`: Database connection
/// - `discord_http`: Discord HTTP client for the announcements
/// - `announce_channel_id`: Channel the champion embeds go to
pub async fn start_scheduler(
    db: DatabaseConnection,
    discord_http: Arc<Http>,
    announce_channel_id: u64,
) -> Result<(), AppError> {
    let scheduler = JobScheduler::new().await?;

    // Clone resources for the jobs
    let weekly_db = db.clone();
    let weekly_http = discord_http.clone();

    let weekly = Job::new_async_tz(WEEKLY_SCHEDULE, RESET_TIMEZONE, move |_uuid, _lock| {
        let db = weekly_db.clone();
        let http = weekly_http.clone();

        Box::pin(async move {
            if let Err(e) = run_reset(&db, http, announce_channel_id, Period::Weekly).await {
                tracing::error!("Error running weekly reset: {}", e);
            }
        })
    })?;

    let monthly_db = db.clone();
    let monthly_http = discord_http.clone();

    let monthly = Job::new_async_tz(MONTHLY_SCHEDULE, RESET_TIMEZONE, move |_uuid, _lock| {
        let db = monthly_db.clone();
        let http = monthly_http.clone();

        Box::pin(async move {
            if let Err(e) = run_reset(&db, http, announce_channel_id, Period::Monthly).await {
                tracing::error!("Error running monthly reset: {}", e);
            }
        })
    })?;

    scheduler.add(weekly).await?;
    scheduler.add(monthly).await?;
    scheduler.start().await?;

    tracing::info!("Period reset scheduler started");

    Ok(())
}

/// Runs one reset at the current wall-clock time.
async fn run_reset(
    db: &DatabaseConnection,
    discord_http: Arc<Http>,
    announce_channel_id: u64,
    period: Period,
) -> Result<(), AppError> {
    let gateway = Arc::new(SerenityGateway::new(discord_http));
    let now = Utc::now().with_timezone(&RESET_TIMEZONE).fixed_offset();

    let service = PeriodResetService::new(db, gateway, announce_channel_id);
    let report = service.run(period, now).await?;

    if !report.skipped {
        tracing::info!(
            "{} reset zeroed {} row(s)",
            period.as_str(),
            report.rows_reset
        );
    }

    Ok(())
}
