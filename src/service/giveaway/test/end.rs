use super::*;

async fn add_entrants(db: &sea_orm::DatabaseConnection, message_id: &str, ids: &[&str]) {
    let repo = GiveawayRepository::new(db);
    for id in ids {
        repo.add_entrant(message_id, id).await.unwrap();
    }
}

/// Tests the basic draw: five entrants, two winners.
///
/// Expected: exactly two distinct winners from the entrant set, the entrant
/// set itself untouched by the draw, and the terminal state persisted
#[tokio::test]
async fn draws_winner_count_distinct_winners() {
    let test = TestBuilder::new().with_giveaway_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();
    let giveaway = GiveawayFactory::new(db).winner_count(2).build().await.unwrap();
    let entrants = ["700001", "700002", "700003", "700004", "700005"];
    add_entrants(db, &giveaway.message_id, &entrants).await;

    let gateway = Arc::new(StubGateway::default());
    let service = GiveawayService::new(db, gateway.clone());

    let outcome = service.end(&giveaway.message_id).await.unwrap();

    let EndOutcome::Drawn { winners } = outcome else {
        panic!("expected a draw");
    };
    assert_eq!(winners.len(), 2);
    assert_ne!(winners[0], winners[1]);
    for winner in &winners {
        assert!(entrants.contains(&winner.as_str()));
    }

    let repo = GiveawayRepository::new(db);
    let stored = repo
        .find_by_message_id(&giveaway.message_id)
        .await
        .unwrap()
        .unwrap();
    assert!(stored.ended);
    assert_eq!(stored.winners, winners);
    // The draw consumes a copy; the entrant set is unaffected.
    assert_eq!(repo.entrant_count(&giveaway.message_id).await.unwrap(), 5);

    assert_eq!(*gateway.announced_results.lock().unwrap(), vec![winners.clone()]);
    assert_eq!(*gateway.finalized.lock().unwrap(), vec![winners]);
}

/// Tests the final eligibility re-check.
///
/// Entrants joined while holding the role, but only two still have it at
/// draw time.
///
/// Expected: winners drawn exclusively from the still-eligible pair
#[tokio::test]
async fn revalidates_eligibility_at_draw_time() {
    let test = TestBuilder::new().with_giveaway_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();
    let giveaway = GiveawayFactory::new(db)
        .winner_count(2)
        .required_role_id("555")
        .build()
        .await
        .unwrap();
    add_entrants(
        db,
        &giveaway.message_id,
        &["700001", "700002", "700003", "700004", "700005"],
    )
    .await;

    let gateway = Arc::new(StubGateway {
        member_roles: [(700002, vec![555]), (700004, vec![555, 999])]
            .into_iter()
            .collect(),
        ..Default::default()
    });
    let service = GiveawayService::new(db, gateway);

    let EndOutcome::Drawn { mut winners } = service.end(&giveaway.message_id).await.unwrap()
    else {
        panic!("expected a draw");
    };

    winners.sort();
    assert_eq!(winners, vec!["700002".to_string(), "700004".to_string()]);
}

/// Tests the empty-eligible-subset announcement.
///
/// Expected: NoValidEntrants, terminal state persisted with no winners, and
/// the "no valid participants" announcement sent
#[tokio::test]
async fn announces_no_valid_participants() {
    let test = TestBuilder::new().with_giveaway_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();
    let giveaway = GiveawayFactory::new(db)
        .required_role_id("555")
        .build()
        .await
        .unwrap();
    add_entrants(db, &giveaway.message_id, &["700001", "700002"]).await;

    // Nobody holds the role anymore.
    let gateway = Arc::new(StubGateway::default());
    let service = GiveawayService::new(db, gateway.clone());

    let outcome = service.end(&giveaway.message_id).await.unwrap();
    assert_eq!(outcome, EndOutcome::NoValidEntrants);

    let repo = GiveawayRepository::new(db);
    let stored = repo
        .find_by_message_id(&giveaway.message_id)
        .await
        .unwrap()
        .unwrap();
    assert!(stored.ended);
    assert!(stored.winners.is_empty());

    assert_eq!(
        *gateway.announced_results.lock().unwrap(),
        vec![Vec::<String>::new()]
    );
}

/// Tests the fail-closed policy for a deleted announcement.
///
/// Expected: MessageMissing, ended flag forced true, nothing announced
#[tokio::test]
async fn deleted_message_fails_closed() {
    let test = TestBuilder::new().with_giveaway_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();
    let giveaway = GiveawayFactory::new(db).build().await.unwrap();
    add_entrants(db, &giveaway.message_id, &["700001"]).await;

    let gateway = Arc::new(StubGateway {
        message_present: false,
        ..Default::default()
    });
    let service = GiveawayService::new(db, gateway.clone());

    let outcome = service.end(&giveaway.message_id).await.unwrap();
    assert_eq!(outcome, EndOutcome::MessageMissing);

    let repo = GiveawayRepository::new(db);
    let stored = repo
        .find_by_message_id(&giveaway.message_id)
        .await
        .unwrap()
        .unwrap();
    assert!(stored.ended);
    assert!(gateway.announced_results.lock().unwrap().is_empty());
}

/// Tests the terminal-state precondition.
///
/// Expected: AlreadyEnded on a second end
#[tokio::test]
async fn ending_twice_is_rejected() {
    let test = TestBuilder::new().with_giveaway_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();
    let giveaway = GiveawayFactory::new(db).build().await.unwrap();

    let gateway = Arc::new(StubGateway::default());
    let service = GiveawayService::new(db, gateway);

    service.end(&giveaway.message_id).await.unwrap();
    let result = service.end(&giveaway.message_id).await;

    assert!(matches!(result, Err(AppError::AlreadyEnded)));
}

/// Tests manual early termination.
///
/// Expected: a giveaway whose deadline is still in the future ends cleanly
#[tokio::test]
async fn manual_end_before_deadline_is_supported() {
    let test = TestBuilder::new().with_giveaway_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();
    let giveaway = GiveawayFactory::new(db)
        .end_time(chrono::Utc::now().timestamp_millis() + 86_400_000)
        .build()
        .await
        .unwrap();
    add_entrants(db, &giveaway.message_id, &["700001"]).await;

    let gateway = Arc::new(StubGateway::default());
    let service = GiveawayService::new(db, gateway);

    let outcome = service.end(&giveaway.message_id).await.unwrap();
    assert_eq!(
        outcome,
        EndOutcome::Drawn {
            winners: vec!["700001".to_string()]
        }
    );
}

/// Tests local-effect-first persistence.
///
/// Expected: the terminal state survives an announcement failure
#[tokio::test]
async fn persists_even_when_announcement_fails() {
    let test = TestBuilder::new().with_giveaway_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();
    let giveaway = GiveawayFactory::new(db).build().await.unwrap();
    add_entrants(db, &giveaway.message_id, &["700001"]).await;

    let gateway = Arc::new(StubGateway {
        fail_announcements: true,
        ..Default::default()
    });
    let service = GiveawayService::new(db, gateway);

    let outcome = service.end(&giveaway.message_id).await.unwrap();
    assert_eq!(
        outcome,
        EndOutcome::Drawn {
            winners: vec!["700001".to_string()]
        }
    );

    let repo = GiveawayRepository::new(db);
    let stored = repo
        .find_by_message_id(&giveaway.message_id)
        .await
        .unwrap()
        .unwrap();
    assert!(stored.ended);
    assert_eq!(stored.winners, vec!["700001".to_string()]);
}
