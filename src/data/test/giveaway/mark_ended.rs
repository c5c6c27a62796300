use super::*;

/// Tests persisting the terminal state with drawn winners.
///
/// Expected: ended flag set and winners stored in draw order
#[tokio::test]
async fn mark_ended_stores_winners() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_giveaway_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let giveaway = GiveawayFactory::new(db).build().await?;
    let repo = GiveawayRepository::new(db);

    repo.mark_ended(&giveaway.message_id, &["u2".to_string(), "u1".to_string()])
        .await
        .unwrap();

    let found = repo
        .find_by_message_id(&giveaway.message_id)
        .await
        .unwrap()
        .unwrap();
    assert!(found.ended);
    assert_eq!(found.winners, vec!["u2".to_string(), "u1".to_string()]);

    Ok(())
}

/// Tests the fail-closed path for a deleted announcement message.
///
/// Expected: ended flag set while the winner list stays empty
#[tokio::test]
async fn force_ended_leaves_winners_untouched() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_giveaway_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let giveaway = GiveawayFactory::new(db).build().await?;
    let repo = GiveawayRepository::new(db);

    repo.force_ended(&giveaway.message_id).await.unwrap();

    let found = repo
        .find_by_message_id(&giveaway.message_id)
        .await
        .unwrap()
        .unwrap();
    assert!(found.ended);
    assert!(found.winners.is_empty());

    Ok(())
}

/// Tests the winner-list overwrite used after a reroll.
///
/// Expected: the stored list matches the appended list exactly
#[tokio::test]
async fn set_winners_overwrites_the_list() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_giveaway_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let giveaway = GiveawayFactory::new(db)
        .ended(true)
        .winners(vec!["u1".to_string()])
        .build()
        .await?;
    let repo = GiveawayRepository::new(db);

    repo.set_winners(&giveaway.message_id, &["u1".to_string(), "u3".to_string()])
        .await
        .unwrap();

    let found = repo
        .find_by_message_id(&giveaway.message_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(found.winners, vec!["u1".to_string(), "u3".to_string()]);

    Ok(())
}
