use super::*;

fn champion(id: &str, value: i64) -> Champion {
    Champion {
        roblox_id: id.to_string(),
        roblox_username: format!("Climber{}", id),
        discord_id: None,
        value,
    }
}

/// Tests recording champions for a fresh period.
///
/// Expected: row created with the snapshot's categories serialized
#[tokio::test]
async fn records_new_period() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_ledger_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let repo = HallOfFameRepository::new(db);
    let snapshot = PeriodSnapshot {
        climber: Some(champion("1", 50)),
        host: None,
        explorer: Some(champion("2", 7)),
    };

    repo.record_champions("weekly-2026-07-27", Period::Weekly, 2026, Utc::now(), &snapshot)
        .await
        .unwrap();

    let record = repo.find_by_id("weekly-2026-07-27").await.unwrap().unwrap();
    assert_eq!(record.period, "weekly");
    assert_eq!(record.year, 2026);
    assert!(record.climber.is_some());
    assert!(record.host.is_none());
    assert!(record.explorer.is_some());

    Ok(())
}

/// Tests the column-merge contract on conflict.
///
/// Recording the host for a period must not clobber the climber already
/// stored for the same period.
///
/// Expected: both categories present after the second write
#[tokio::test]
async fn merge_preserves_other_categories() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_ledger_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let repo = HallOfFameRepository::new(db);

    let climber_only = PeriodSnapshot {
        climber: Some(champion("1", 50)),
        host: None,
        explorer: None,
    };
    repo.record_champions("monthly-2026-07", Period::Monthly, 2026, Utc::now(), &climber_only)
        .await
        .unwrap();

    let host_only = PeriodSnapshot {
        climber: None,
        host: Some(champion("2", 30)),
        explorer: None,
    };
    repo.record_champions("monthly-2026-07", Period::Monthly, 2026, Utc::now(), &host_only)
        .await
        .unwrap();

    let record = repo.find_by_id("monthly-2026-07").await.unwrap().unwrap();
    assert!(record.climber.is_some());
    assert!(record.host.is_some());

    let climber: Champion = serde_json::from_value(record.climber.unwrap()).unwrap();
    assert_eq!(climber.roblox_id, "1");

    Ok(())
}
