use super::*;

/// Tests marker round trip and overwrite.
///
/// Expected: None before any run, the stored key afterwards, and the newest
/// key after a later period completes
#[tokio::test]
async fn stores_and_overwrites_marker() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_ledger_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let repo = PeriodMarkerRepository::new(db);

    assert!(repo.last_run_key(Period::Weekly).await.unwrap().is_none());

    repo.set_last_run(Period::Weekly, "2026-W31").await.unwrap();
    assert_eq!(
        repo.last_run_key(Period::Weekly).await.unwrap().as_deref(),
        Some("2026-W31")
    );

    repo.set_last_run(Period::Weekly, "2026-W32").await.unwrap();
    assert_eq!(
        repo.last_run_key(Period::Weekly).await.unwrap().as_deref(),
        Some("2026-W32")
    );

    Ok(())
}

/// Tests that the two cadences track separate markers.
///
/// Expected: weekly and monthly keys never interfere
#[tokio::test]
async fn cadences_are_independent() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_ledger_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let repo = PeriodMarkerRepository::new(db);

    repo.set_last_run(Period::Weekly, "2026-W32").await.unwrap();
    repo.set_last_run(Period::Monthly, "2026-08").await.unwrap();

    assert_eq!(
        repo.last_run_key(Period::Weekly).await.unwrap().as_deref(),
        Some("2026-W32")
    );
    assert_eq!(
        repo.last_run_key(Period::Monthly).await.unwrap().as_deref(),
        Some("2026-08")
    );

    Ok(())
}
