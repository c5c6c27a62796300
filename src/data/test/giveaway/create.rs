use super::*;

/// Tests inserting a new giveaway in the OPEN state.
///
/// Expected: Ok with the row readable back, not ended, no winners
#[tokio::test]
async fn creates_open_giveaway() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_giveaway_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let repo = GiveawayRepository::new(db);

    let giveaway = Giveaway {
        message_id: "900001".to_string(),
        channel_id: "100".to_string(),
        guild_id: "200".to_string(),
        prize: "1000 Robux".to_string(),
        winner_count: 2,
        end_time_ms: 1_700_000_000_000,
        sponsor_id: Some("42".to_string()),
        required_role_id: None,
        ended: false,
        winners: Vec::new(),
    };

    let created = repo.create(giveaway.clone()).await.unwrap();
    assert_eq!(created, giveaway);

    let found = repo.find_by_message_id("900001").await.unwrap().unwrap();
    assert!(!found.ended);
    assert!(found.winners.is_empty());
    assert_eq!(found.winner_count, 2);

    Ok(())
}

/// Tests the lookup miss path.
///
/// Expected: Ok(None) for an unknown message ID
#[tokio::test]
async fn missing_giveaway_is_none() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_giveaway_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let repo = GiveawayRepository::new(db);
    assert!(repo.find_by_message_id("nope").await.unwrap().is_none());

    Ok(())
}
