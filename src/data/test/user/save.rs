use super::*;

/// Tests saving a freshly mutated record and reading it back.
///
/// Verifies the whole-row upsert path end to end, including the JSON history
/// maps.
///
/// Expected: Ok with an identical record on read-back
#[tokio::test]
async fn saves_and_reads_whole_record() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_ledger_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let repo = UserRepository::new(db);

    let mut record = UserRecord::new("1001", "Aldi");
    record.apply_points(
        PointsAction::Add,
        100,
        &ActionContext {
            mountain: Some("Everest".to_string()),
            difficulty: Some(Difficulty::Hard),
        },
    );

    let saved = repo.save(record.clone()).await.unwrap();
    assert_eq!(saved, record);

    let found = repo.find_by_roblox_id("1001").await.unwrap();
    assert_eq!(found, Some(record));

    Ok(())
}

/// Tests that a save replaces the row instead of merging columns.
///
/// A remove action prunes history keys in memory; persisting the record must
/// drop them from storage too. A merge write would leave the old key behind.
///
/// Expected: pruned keys absent after the second save
#[tokio::test]
async fn save_replaces_row_so_pruned_keys_disappear() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_ledger_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let repo = UserRepository::new(db);
    let ctx = ActionContext {
        mountain: Some("Everest".to_string()),
        difficulty: Some(Difficulty::Hard),
    };

    let mut record = UserRecord::new("1001", "Aldi");
    record.apply_points(PointsAction::Add, 100, &ctx);
    repo.save(record.clone()).await.unwrap();

    record.apply_points(PointsAction::Remove, 100, &ctx);
    repo.save(record).await.unwrap();

    let found = repo.find_by_roblox_id("1001").await.unwrap().unwrap();
    assert!(found.expedition_history.is_empty());
    assert!(found.difficulty_stats.is_empty());
    assert_eq!(found.xp, 0);

    Ok(())
}

/// Tests looking a record up by its linked Discord account.
///
/// Expected: Ok(Some) for the linked account, Ok(None) for an unknown one
#[tokio::test]
async fn finds_by_linked_discord_id() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_ledger_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    UserFactory::new(db)
        .roblox_id("1001")
        .discord_id("555001")
        .build()
        .await?;

    let repo = UserRepository::new(db);

    let found = repo.find_by_discord_id("555001").await.unwrap();
    assert_eq!(found.unwrap().roblox_id, "1001");

    let missing = repo.find_by_discord_id("999999").await.unwrap();
    assert!(missing.is_none());

    Ok(())
}

/// Tests the explicit unlink delete.
///
/// Expected: row gone after delete; deleting again is a no-op
#[tokio::test]
async fn delete_removes_the_row() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_ledger_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    UserFactory::new(db).roblox_id("1001").build().await?;

    let repo = UserRepository::new(db);
    repo.delete("1001").await.unwrap();

    assert!(repo.find_by_roblox_id("1001").await.unwrap().is_none());

    // Deleting a missing row does not error.
    repo.delete("1001").await.unwrap();

    Ok(())
}
