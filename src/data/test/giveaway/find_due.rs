use super::*;

/// Tests the sweep query.
///
/// Expected: only open giveaways whose deadline passed are returned; a future
/// giveaway and an already-ended one are both excluded
#[tokio::test]
async fn returns_only_due_open_giveaways() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_giveaway_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let now_ms = 1_700_000_000_000;

    let due = GiveawayFactory::new(db).end_time(now_ms - 1_000).build().await?;
    GiveawayFactory::new(db).end_time(now_ms + 60_000).build().await?;
    GiveawayFactory::new(db)
        .end_time(now_ms - 5_000)
        .ended(true)
        .build()
        .await?;

    let repo = GiveawayRepository::new(db);
    let found = repo.find_due(now_ms).await.unwrap();

    assert_eq!(found.len(), 1);
    assert_eq!(found[0].message_id, due.message_id);

    Ok(())
}
