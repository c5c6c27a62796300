use super::*;

/// Tests that the entrant append is idempotent per entrant.
///
/// Expected: first insert reports true, the duplicate reports false, and the
/// set holds exactly one entry
#[tokio::test]
async fn appends_each_entrant_once() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_giveaway_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let giveaway = GiveawayFactory::new(db).build().await?;
    let repo = GiveawayRepository::new(db);

    assert!(repo.add_entrant(&giveaway.message_id, "u1").await.unwrap());
    assert!(!repo.add_entrant(&giveaway.message_id, "u1").await.unwrap());

    assert_eq!(repo.entrant_count(&giveaway.message_id).await.unwrap(), 1);
    assert_eq!(
        repo.entrants(&giveaway.message_id).await.unwrap(),
        vec!["u1".to_string()]
    );

    Ok(())
}

/// Tests that entrant sets are scoped per giveaway.
///
/// Expected: the same entrant can join two different giveaways
#[tokio::test]
async fn entrant_sets_are_independent() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_giveaway_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let first = GiveawayFactory::new(db).build().await?;
    let second = GiveawayFactory::new(db).build().await?;
    let repo = GiveawayRepository::new(db);

    assert!(repo.add_entrant(&first.message_id, "u1").await.unwrap());
    assert!(repo.add_entrant(&second.message_id, "u1").await.unwrap());

    assert_eq!(repo.entrant_count(&first.message_id).await.unwrap(), 1);
    assert_eq!(repo.entrant_count(&second.message_id).await.unwrap(), 1);

    Ok(())
}
