use super::*;
use chrono::Utc;

fn param(duration: &str, winner_count: u32) -> StartGiveawayParam {
    StartGiveawayParam {
        message_id: "900001".to_string(),
        channel_id: "100".to_string(),
        guild_id: "200".to_string(),
        prize: "1000 Robux".to_string(),
        winner_count,
        duration: duration.to_string(),
        sponsor_id: None,
        required_role_id: None,
    }
}

/// Tests starting a giveaway with a valid duration.
///
/// Expected: OPEN record persisted with an end time one hour out
#[tokio::test]
async fn creates_open_record_with_computed_end_time() {
    let test = TestBuilder::new().with_giveaway_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();
    let gateway = Arc::new(StubGateway::default());

    let service = GiveawayService::new(db, gateway);
    let before = Utc::now().timestamp_millis();
    let giveaway = service.start(param("1h", 2)).await.unwrap();
    let after = Utc::now().timestamp_millis();

    assert!(!giveaway.ended);
    assert!(giveaway.winners.is_empty());
    assert!(giveaway.end_time_ms >= before + 3_600_000);
    assert!(giveaway.end_time_ms <= after + 3_600_000);

    let repo = GiveawayRepository::new(db);
    assert!(repo.find_by_message_id("900001").await.unwrap().is_some());
}

/// Tests that a malformed duration rejects before any record is created.
///
/// Expected: InvalidArgument and an empty giveaway table
#[tokio::test]
async fn bad_duration_creates_nothing() {
    let test = TestBuilder::new().with_giveaway_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();
    let gateway = Arc::new(StubGateway::default());

    let service = GiveawayService::new(db, gateway);
    let result = service.start(param("tomorrow", 1)).await;

    assert!(matches!(result, Err(AppError::InvalidArgument(_))));

    let repo = GiveawayRepository::new(db);
    assert!(repo.find_by_message_id("900001").await.unwrap().is_none());
}

/// Tests the winner-count floor.
///
/// Expected: InvalidArgument for zero winners
#[tokio::test]
async fn zero_winner_count_is_rejected() {
    let test = TestBuilder::new().with_giveaway_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();
    let gateway = Arc::new(StubGateway::default());

    let service = GiveawayService::new(db, gateway);
    let result = service.start(param("1h", 0)).await;

    assert!(matches!(result, Err(AppError::InvalidArgument(_))));
}
