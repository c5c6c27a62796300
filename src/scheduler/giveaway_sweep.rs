use chrono::Utc;
use sea_orm::DatabaseConnection;
use serenity::http::Http;
use std::sync::Arc;
use tokio_cron_scheduler::{Job, JobScheduler};

use crate::error::AppError;
use crate::service::gateway::SerenityGateway;
use crate::service::giveaway::GiveawayService;

/// Starts the giveaway sweep scheduler
///
/// Runs every minute and ends every open giveaway whose deadline has
/// passed. Each due giveaway is ended independently; one failure never
/// stops the rest, and a giveaway whose announcement was deleted is closed
/// without a draw rather than retried forever.
///
/// # Arguments
/// - `db`: Database connection
/// - `discord_http`: Discord HTTP client for announcements and embed edits
pub async fn start_scheduler(
    db: DatabaseConnection,
    discord_http: Arc<Http>,
) -> Result<(), AppError> {
    let scheduler = JobScheduler::new().await?;

    let job_db = db.clone();
    let job_http = discord_http.clone();

    // Every minute
    let job = Job::new_async("0 * * * * *", move |_uuid, _lock| {
        let db = job_db.clone();
        let http = job_http.clone();

        Box::pin(async move {
            let gateway = Arc::new(SerenityGateway::new(http));
            let service = GiveawayService::new(&db, gateway);

            match service.sweep(Utc::now().timestamp_millis()).await {
                Ok(0) => {}
                Ok(ended) => tracing::info!("sweep ended {} giveaway(s)", ended),
                Err(e) => tracing::error!("Error sweeping giveaways: {}", e),
            }
        })
    })?;

    scheduler.add(job).await?;
    scheduler.start().await?;

    tracing::info!("Giveaway sweep scheduler started");

    Ok(())
}
