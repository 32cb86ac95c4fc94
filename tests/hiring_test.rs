///! Tests for the hiring coordinator.
///!
///! These run against SeaORM's MockDatabase: each test scripts the rows the
///! coordinator will read and the outcomes of its writes, then checks the
///! resulting state transition, error, and notification. The mock also
///! proves no writes happen on a failed precondition — an unexpected
///! statement would drain an empty result queue and surface as a DB error
///! instead of the asserted variant.
use chrono::Utc;
use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
use uuid::Uuid;

use gigbid_backend::hiring::{self, HireError};
use gigbid_backend::models::{bids, gigs, users};
use gigbid_backend::notify::protocol::ServerEvent;
use gigbid_backend::notify::server::NotificationServer;

fn gig(owner: Uuid, status: gigs::Status) -> gigs::Model {
    gigs::Model {
        id: Uuid::new_v4(),
        title: "Build a landing page".to_string(),
        description: "Responsive, two sections".to_string(),
        budget: 500.0,
        status,
        user_id: owner,
        created_at: Utc::now(),
    }
}

fn bid(gig: &gigs::Model, freelancer: Uuid, price: f64, status: bids::Status) -> bids::Model {
    bids::Model {
        id: Uuid::new_v4(),
        gig_id: gig.id,
        freelancer_id: freelancer,
        message: "I can do this in three days".to_string(),
        price,
        status,
        created_at: Utc::now(),
    }
}

fn freelancer(id: Uuid) -> users::Model {
    users::Model {
        id,
        email: "f1@example.com".to_string(),
        display_name: Some("Frida Lancer".to_string()),
        auth_provider: "jwt".to_string(),
        role: users::Roles::Freelancer,
        created_at: Utc::now(),
    }
}

fn exec_ok(rows_affected: u64) -> MockExecResult {
    MockExecResult {
        rows_affected,
        ..Default::default()
    }
}

#[tokio::test]
async fn hire_commits_the_three_part_update_and_notifies_the_winner() {
    let owner = Uuid::new_v4();
    let winner = Uuid::new_v4();
    let g = gig(owner, gigs::Status::Open);
    let b = bid(&g, winner, 400.0, bids::Status::Pending);

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![b.clone()]]) // bid lookup
        .append_query_results([vec![g.clone()]]) // gig lookup
        .append_exec_results([
            exec_ok(1), // gig open -> assigned (conditional update matched)
            exec_ok(1), // chosen bid -> hired
            exec_ok(1), // one sibling -> rejected
        ])
        .append_query_results([vec![freelancer(winner)]]) // display fields
        .into_connection();

    let notifications = NotificationServer::new();
    let (_conn, mut rx) = notifications.register(winner).await;

    let hired = hiring::hire(&db, &notifications, owner, b.id)
        .await
        .expect("hire should succeed");

    assert_eq!(hired.id, b.id);
    assert_eq!(hired.status, bids::Status::Hired);
    assert_eq!(hired.price, 400.0);
    assert_eq!(hired.gig_title, "Build a landing page");
    assert_eq!(hired.freelancer_email.as_deref(), Some("f1@example.com"));
    assert_eq!(hired.freelancer_name.as_deref(), Some("Frida Lancer"));

    // Exactly one event on the winner's live channel, carrying title + price.
    let event = rx.try_recv().expect("winner should be notified");
    let ServerEvent::Hired {
        message,
        gig: gig_ref,
        bid: bid_ref,
    } = event;
    assert!(message.contains("Build a landing page"));
    assert_eq!(gig_ref.id, g.id);
    assert_eq!(bid_ref.id, b.id);
    assert_eq!(bid_ref.price, 400.0);
    assert!(rx.try_recv().is_err(), "at most one event per hire");

    // All three writes happened inside one transaction.
    let log = format!("{:?}", db.into_transaction_log());
    assert!(log.contains("BEGIN"));
    assert!(log.contains("COMMIT"));
    assert!(log.contains("assigned"));
    assert!(log.contains("hired"));
    assert!(log.contains("rejected"));
}

#[tokio::test]
async fn hire_succeeds_without_a_live_connection() {
    let owner = Uuid::new_v4();
    let winner = Uuid::new_v4();
    let g = gig(owner, gigs::Status::Open);
    let b = bid(&g, winner, 450.0, bids::Status::Pending);

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![b.clone()]])
        .append_query_results([vec![g.clone()]])
        .append_exec_results([exec_ok(1), exec_ok(1), exec_ok(0)])
        .append_query_results([vec![freelancer(winner)]])
        .into_connection();

    // Nobody registered: delivery is best-effort, the hire must still land.
    let notifications = NotificationServer::new();

    let hired = hiring::hire(&db, &notifications, owner, b.id)
        .await
        .expect("hire must not depend on notification delivery");
    assert_eq!(hired.status, bids::Status::Hired);
}

#[tokio::test]
async fn hire_by_non_owner_is_forbidden_and_writes_nothing() {
    let owner = Uuid::new_v4();
    let stranger = Uuid::new_v4();
    let g = gig(owner, gigs::Status::Open);
    let b = bid(&g, Uuid::new_v4(), 400.0, bids::Status::Pending);

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![b.clone()]])
        .append_query_results([vec![g.clone()]])
        .into_connection();

    let notifications = NotificationServer::new();
    let err = hiring::hire(&db, &notifications, stranger, b.id)
        .await
        .expect_err("stranger must not hire");
    assert!(matches!(err, HireError::NotOwner));
}

#[tokio::test]
async fn hire_on_assigned_gig_is_a_conflict() {
    let owner = Uuid::new_v4();
    let g = gig(owner, gigs::Status::Assigned);
    let b = bid(&g, Uuid::new_v4(), 400.0, bids::Status::Pending);

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![b.clone()]])
        .append_query_results([vec![g.clone()]])
        .into_connection();

    let notifications = NotificationServer::new();
    let err = hiring::hire(&db, &notifications, owner, b.id)
        .await
        .expect_err("assigned gig cannot be hired again");
    assert!(matches!(err, HireError::GigNotOpen));
}

#[tokio::test]
async fn rehiring_a_processed_bid_is_a_conflict() {
    let owner = Uuid::new_v4();
    // Gig already assigned and bid already hired: retrying the same hire
    // must come back as a conflict, not a second hire.
    let g = gig(owner, gigs::Status::Assigned);
    let b = bid(&g, Uuid::new_v4(), 400.0, bids::Status::Hired);

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![b.clone()]])
        .append_query_results([vec![g.clone()]])
        .into_connection();

    let notifications = NotificationServer::new();
    let err = hiring::hire(&db, &notifications, owner, b.id)
        .await
        .expect_err("hired bid cannot be hired twice");
    assert!(matches!(err, HireError::GigNotOpen));
}

#[tokio::test]
async fn rejected_bid_on_open_gig_is_a_conflict() {
    let owner = Uuid::new_v4();
    let g = gig(owner, gigs::Status::Open);
    let b = bid(&g, Uuid::new_v4(), 400.0, bids::Status::Rejected);

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![b.clone()]])
        .append_query_results([vec![g.clone()]])
        .into_connection();

    let notifications = NotificationServer::new();
    let err = hiring::hire(&db, &notifications, owner, b.id)
        .await
        .expect_err("processed bid cannot be hired");
    assert!(matches!(err, HireError::BidNotPending));
}

#[tokio::test]
async fn hire_of_missing_bid_is_not_found() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([Vec::<bids::Model>::new()])
        .into_connection();

    let notifications = NotificationServer::new();
    let bid_id = Uuid::new_v4();
    let err = hiring::hire(&db, &notifications, Uuid::new_v4(), bid_id)
        .await
        .expect_err("missing bid");
    assert!(matches!(err, HireError::BidNotFound(id) if id == bid_id));
}

#[tokio::test]
async fn losing_a_concurrent_hire_race_surfaces_a_conflict() {
    let owner = Uuid::new_v4();
    let winner_of_other_race = Uuid::new_v4();
    let g_open = gig(owner, gigs::Status::Open);
    let b = bid(&g_open, winner_of_other_race, 400.0, bids::Status::Pending);

    // The fresh read after the failed conditional update sees the gig
    // already assigned and the bid already rejected by the other committer.
    let g_assigned = gigs::Model {
        status: gigs::Status::Assigned,
        ..g_open.clone()
    };
    let b_rejected = bids::Model {
        status: bids::Status::Rejected,
        ..b.clone()
    };

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![b.clone()]]) // first precondition read
        .append_query_results([vec![g_open.clone()]])
        .append_exec_results([exec_ok(0)]) // conditional update lost the race
        .append_query_results([vec![b_rejected]]) // re-read after rollback
        .append_query_results([vec![g_assigned]])
        .into_connection();

    let notifications = NotificationServer::new();
    let (_conn, mut rx) = notifications.register(winner_of_other_race).await;

    let err = hiring::hire(&db, &notifications, owner, b.id)
        .await
        .expect_err("losing racer must observe a conflict");
    assert!(matches!(err, HireError::GigNotOpen));

    // The loser must not notify anyone.
    assert!(rx.try_recv().is_err());

    // The aborted attempt rolled back instead of committing.
    let log = format!("{:?}", db.into_transaction_log());
    assert!(log.contains("BEGIN"));
    assert!(log.contains("ROLLBACK"));
    assert!(!log.contains("COMMIT"));
}
