///! Tests for the notification connection registry.
///!
///! The registry is a plain in-memory structure, so these tests exercise it
///! directly: register channels, emit, and check what each channel received.
use uuid::Uuid;

use gigbid_backend::notify::protocol::ServerEvent;
use gigbid_backend::notify::server::NotificationServer;

fn hired_event() -> ServerEvent {
    ServerEvent::hired(Uuid::new_v4(), "Build a landing page", Uuid::new_v4(), 400.0)
}

#[tokio::test]
async fn emit_reaches_every_connection_of_the_user() {
    let server = NotificationServer::new();
    let user = Uuid::new_v4();

    // Same user connected twice (two tabs).
    let (_c1, mut rx1) = server.register(user).await;
    let (_c2, mut rx2) = server.register(user).await;

    let delivered = server.emit_to_user(user, hired_event()).await;
    assert_eq!(delivered, 2);

    for rx in [&mut rx1, &mut rx2] {
        let event = rx.try_recv().expect("connection should have received the event");
        let ServerEvent::Hired { message, gig, bid } = event;
        assert!(message.contains("Build a landing page"));
        assert_eq!(gig.title, "Build a landing page");
        assert_eq!(bid.price, 400.0);
    }
}

#[tokio::test]
async fn emit_to_unknown_user_delivers_nothing() {
    let server = NotificationServer::new();
    let user = Uuid::new_v4();
    let (_c, mut rx) = server.register(user).await;

    let delivered = server.emit_to_user(Uuid::new_v4(), hired_event()).await;
    assert_eq!(delivered, 0);
    assert!(rx.try_recv().is_err(), "registered user must not see someone else's event");
}

#[tokio::test]
async fn unregister_removes_only_the_targeted_connection() {
    let server = NotificationServer::new();
    let user = Uuid::new_v4();

    let (c1, mut rx1) = server.register(user).await;
    let (_c2, mut rx2) = server.register(user).await;

    server.unregister(user, c1).await;

    let delivered = server.emit_to_user(user, hired_event()).await;
    assert_eq!(delivered, 1);
    assert!(rx1.try_recv().is_err());
    assert!(rx2.try_recv().is_ok());
}

#[tokio::test]
async fn online_tracking_follows_registration() {
    let server = NotificationServer::new();
    let user = Uuid::new_v4();
    assert!(!server.is_user_online(user).await);

    let (c, _rx) = server.register(user).await;
    assert!(server.is_user_online(user).await);

    server.unregister(user, c).await;
    assert!(!server.is_user_online(user).await);
}
