use super::*;

/// Tests that a weekly reset zeroes only dirty rows and only that column.
///
/// User A has weekly points and a cumulative total; user B is already clean.
///
/// Expected: one row touched, A's weekly window zeroed with the cumulative
/// total unchanged, B untouched
#[tokio::test]
async fn zeroes_only_dirty_rows() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_ledger_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    UserFactory::new(db)
        .roblox_id("a")
        .xp(500)
        .weekly_xp(50)
        .build()
        .await?;
    UserFactory::new(db)
        .roblox_id("b")
        .xp(300)
        .weekly_xp(0)
        .build()
        .await?;

    let repo = UserRepository::new(db);
    let touched = repo
        .reset_rolling(Period::Weekly, RollingMetric::ClimbingPoints)
        .await
        .unwrap();

    assert_eq!(touched, 1);

    let a = repo.find_by_roblox_id("a").await.unwrap().unwrap();
    assert_eq!(a.weekly_xp, 0);
    assert_eq!(a.xp, 500);

    let b = repo.find_by_roblox_id("b").await.unwrap().unwrap();
    assert_eq!(b.weekly_xp, 0);
    assert_eq!(b.xp, 300);

    Ok(())
}

/// Tests that resetting one window leaves the other window alone.
///
/// Expected: weekly reset leaves monthly counters as they were, and the
/// untouched metrics keep their values
#[tokio::test]
async fn leaves_other_window_and_metrics_untouched() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_ledger_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    UserFactory::new(db)
        .roblox_id("a")
        .weekly_xp(50)
        .monthly_xp(200)
        .weekly_guide_points(10)
        .weekly_expeditions(3)
        .build()
        .await?;

    let repo = UserRepository::new(db);
    repo.reset_rolling(Period::Weekly, RollingMetric::ClimbingPoints)
        .await
        .unwrap();

    let a = repo.find_by_roblox_id("a").await.unwrap().unwrap();
    assert_eq!(a.weekly_xp, 0);
    assert_eq!(a.monthly_xp, 200);
    assert_eq!(a.weekly_guide_points, 10);
    assert_eq!(a.weekly_expeditions, 3);

    Ok(())
}
