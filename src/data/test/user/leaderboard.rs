use super::*;

/// Tests leaderboard ordering and pagination.
///
/// Expected: rows descend by the metric and pages split at per_page
#[tokio::test]
async fn orders_descending_with_pages() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_ledger_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    for (id, points) in [("1", 10), ("2", 30), ("3", 20)] {
        UserFactory::new(db).roblox_id(id).weekly_xp(points).build().await?;
    }

    let repo = UserRepository::new(db);
    let (page, total_pages) = repo
        .leaderboard(Period::Weekly, RollingMetric::ClimbingPoints, 0, 2)
        .await
        .unwrap();

    assert_eq!(total_pages, 2);
    assert_eq!(page.len(), 2);
    assert_eq!(page[0].roblox_id, "2");
    assert_eq!(page[1].roblox_id, "3");

    let (page, _) = repo
        .leaderboard(Period::Weekly, RollingMetric::ClimbingPoints, 1, 2)
        .await
        .unwrap();
    assert_eq!(page.len(), 1);
    assert_eq!(page[0].roblox_id, "1");

    Ok(())
}
