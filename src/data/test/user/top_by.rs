use super::*;

/// Tests ranking by weekly climbing points.
///
/// Expected: the row with the highest weekly_xp comes back
#[tokio::test]
async fn returns_highest_weekly_climber() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_ledger_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    UserFactory::new(db).roblox_id("1").weekly_xp(50).build().await?;
    UserFactory::new(db).roblox_id("2").weekly_xp(120).build().await?;
    UserFactory::new(db).roblox_id("3").weekly_xp(90).build().await?;

    let repo = UserRepository::new(db);
    let top = repo
        .top_by(Period::Weekly, RollingMetric::ClimbingPoints)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(top.roblox_id, "2");
    assert_eq!(top.weekly_xp, 120);

    Ok(())
}

/// Tests that each metric ranks by its own column.
///
/// Expected: the guide leader differs from the climbing leader
#[tokio::test]
async fn metrics_rank_independently() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_ledger_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    UserFactory::new(db)
        .roblox_id("1")
        .weekly_xp(100)
        .build()
        .await?;
    UserFactory::new(db)
        .roblox_id("2")
        .weekly_guide_points(40)
        .build()
        .await?;
    UserFactory::new(db)
        .roblox_id("3")
        .monthly_expeditions(7)
        .build()
        .await?;

    let repo = UserRepository::new(db);

    let climber = repo
        .top_by(Period::Weekly, RollingMetric::ClimbingPoints)
        .await
        .unwrap()
        .unwrap();
    let host = repo
        .top_by(Period::Weekly, RollingMetric::GuidePoints)
        .await
        .unwrap()
        .unwrap();
    let explorer = repo
        .top_by(Period::Monthly, RollingMetric::Expeditions)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(climber.roblox_id, "1");
    assert_eq!(host.roblox_id, "2");
    assert_eq!(explorer.roblox_id, "3");

    Ok(())
}

/// Tests ranking over an empty ledger.
///
/// Expected: Ok(None) rather than an error
#[tokio::test]
async fn empty_ledger_has_no_leader() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_ledger_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let repo = UserRepository::new(db);
    let top = repo
        .top_by(Period::Weekly, RollingMetric::ClimbingPoints)
        .await
        .unwrap();

    assert!(top.is_none());

    Ok(())
}
