use super::*;
use shapes::{RoomEvent, Shape, encode_envelope};
use tokio::time::{Duration, timeout};

fn test_session() -> (Session, mpsc::Receiver<String>) {
    let (tx, rx) = mpsc::channel(OUTBOUND_BUFFER);
    let session = Session { conn_id: Uuid::new_v4(), room: None, tx, malformed: 0 };
    (session, rx)
}

async fn join(state: &AppState, session: &mut Session, room: &str) {
    dispatch_text(state, session, &encode_envelope(&Envelope::join(room)))
        .await
        .expect("join should succeed");
}

fn pencil(n: f64) -> Shape {
    Shape::Pencil {
        start_x: n,
        start_y: 0.0,
        end_x: n,
        end_y: 1.0,
        stroke: "#fff".to_owned(),
        fill: None,
    }
}

fn shape_text(room: &str, n: f64) -> String {
    encode_envelope(&Envelope::message(room, &RoomEvent::Shape(pencil(n))))
}

async fn recv_delivery(rx: &mut mpsc::Receiver<String>) -> String {
    timeout(Duration::from_millis(500), rx.recv())
        .await
        .expect("delivery receive timed out")
        .expect("delivery channel closed unexpectedly")
}

async fn assert_no_delivery(rx: &mut mpsc::Receiver<String>) {
    assert!(
        timeout(Duration::from_millis(80), rx.recv()).await.is_err(),
        "expected no delivery"
    );
}

// =============================================================
// Join
// =============================================================

#[tokio::test]
async fn join_registers_the_session_with_the_hub() {
    let state = AppState::new();
    let (mut session, _rx) = test_session();

    join(&state, &mut session, "r").await;

    assert_eq!(session.room.as_deref(), Some("r"));
    assert_eq!(state.hub.member_count("r").await, 1);
}

#[tokio::test]
async fn second_join_is_rejected_and_the_room_is_kept() {
    let state = AppState::new();
    let (mut session, _rx) = test_session();
    join(&state, &mut session, "first").await;

    let err = dispatch_text(&state, &mut session, &encode_envelope(&Envelope::join("second")))
        .await
        .expect_err("second join should be rejected");

    assert!(matches!(err, HubError::AlreadyJoined(room) if room == "first"));
    assert_eq!(session.room.as_deref(), Some("first"));
    assert_eq!(state.hub.member_count("second").await, 0);
}

// =============================================================
// Relay
// =============================================================

#[tokio::test]
async fn relay_reaches_peers_but_never_the_sender() {
    let state = AppState::new();
    let (mut alice, mut rx_alice) = test_session();
    let (mut bob, mut rx_bob) = test_session();
    join(&state, &mut alice, "r").await;
    join(&state, &mut bob, "r").await;

    let text = shape_text("r", 1.0);
    dispatch_text(&state, &mut alice, &text)
        .await
        .expect("relay should succeed");

    assert_eq!(recv_delivery(&mut rx_bob).await, text);
    assert_no_delivery(&mut rx_alice).await;
}

#[tokio::test]
async fn peers_observe_the_senders_shapes_in_order() {
    let state = AppState::new();
    let (mut alice, _rx_alice) = test_session();
    let (mut bob, mut rx_bob) = test_session();
    join(&state, &mut alice, "r").await;
    join(&state, &mut bob, "r").await;

    for n in [1.0, 2.0, 3.0] {
        dispatch_text(&state, &mut alice, &shape_text("r", n))
            .await
            .expect("relay should succeed");
    }

    for n in [1.0, 2.0, 3.0] {
        let raw = recv_delivery(&mut rx_bob).await;
        let Envelope::MessageRoom { message, .. } =
            shapes::decode_envelope(&raw).expect("well-formed envelope")
        else {
            panic!("delivery should be a room message");
        };
        assert_eq!(
            RoomEvent::decode(&message).expect("well-formed event"),
            RoomEvent::Shape(pencil(n))
        );
    }
}

#[tokio::test]
async fn relayed_payload_bytes_are_untouched() {
    let state = AppState::new();
    let (mut alice, _rx_alice) = test_session();
    let (mut bob, mut rx_bob) = test_session();
    join(&state, &mut alice, "r").await;
    join(&state, &mut bob, "r").await;

    // Field order and whitespace belong to the sender; the hub must not
    // re-encode what it relays.
    let text = r#"{"message":"{\"shape\":\"clear\"}","room":"r","type":"messageRoom"}"#;
    dispatch_text(&state, &mut alice, text)
        .await
        .expect("relay should succeed");

    assert_eq!(recv_delivery(&mut rx_bob).await, text);
}

#[tokio::test]
async fn clear_relays_like_any_room_message() {
    let state = AppState::new();
    let (mut alice, _rx_alice) = test_session();
    let (mut bob, mut rx_bob) = test_session();
    join(&state, &mut alice, "r").await;
    join(&state, &mut bob, "r").await;

    let text = encode_envelope(&Envelope::message("r", &RoomEvent::Clear));
    dispatch_text(&state, &mut alice, &text)
        .await
        .expect("relay should succeed");

    assert_eq!(recv_delivery(&mut rx_bob).await, text);
}

// =============================================================
// Rejections
// =============================================================

#[tokio::test]
async fn drawing_before_join_is_rejected() {
    let state = AppState::new();
    let (mut session, _rx) = test_session();

    let err = dispatch_text(&state, &mut session, &shape_text("r", 1.0))
        .await
        .expect_err("pre-join traffic should be rejected");

    assert!(matches!(err, HubError::NotJoined(room) if room == "r"));
}

#[tokio::test]
async fn message_to_a_foreign_room_is_rejected_and_not_relayed() {
    let state = AppState::new();
    let (mut alice, _rx_alice) = test_session();
    let (mut eve, _rx_eve) = test_session();
    let (mut bob, mut rx_bob) = test_session();
    join(&state, &mut alice, "a").await;
    join(&state, &mut eve, "a").await;
    join(&state, &mut bob, "b").await;

    let err = dispatch_text(&state, &mut alice, &shape_text("b", 1.0))
        .await
        .expect_err("foreign-room traffic should be rejected");

    assert!(matches!(err, HubError::NotJoined(room) if room == "b"));
    assert_no_delivery(&mut rx_bob).await;
}

// =============================================================
// End to end
// =============================================================

#[tokio::test]
async fn relay_works_over_real_sockets() {
    use futures_util::{SinkExt, StreamExt};
    use tokio_tungstenite::connect_async;
    use tokio_tungstenite::tungstenite;

    let state = AppState::new();
    let app = crate::routes::app(state);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("serve");
    });

    let url = format!("ws://{addr}/ws");
    let (mut alice, _) = connect_async(&url).await.expect("connect alice");
    let (mut bob, _) = connect_async(&url).await.expect("connect bob");

    for ws in [&mut alice, &mut bob] {
        ws.send(tungstenite::Message::Text(
            encode_envelope(&Envelope::join("r")).into(),
        ))
        .await
        .expect("join");
    }

    // Bob's join races Alice's first shape across connections; give the hub
    // a beat to register both sessions.
    tokio::time::sleep(Duration::from_millis(100)).await;

    let text = shape_text("r", 42.0);
    alice
        .send(tungstenite::Message::Text(text.clone().into()))
        .await
        .expect("send shape");

    let delivered = timeout(Duration::from_secs(2), bob.next())
        .await
        .expect("delivery timed out")
        .expect("stream ended")
        .expect("ws error");
    assert_eq!(delivered.into_text().expect("text frame").to_string(), text);
}

#[tokio::test]
async fn malformed_envelope_is_counted_and_the_session_survives() {
    let state = AppState::new();
    let (mut session, _rx) = test_session();

    for raw in ["not json", r#"{"type":"leaveRoom","room":"r"}"#, "{}"] {
        dispatch_text(&state, &mut session, raw)
            .await
            .expect("malformed input should be dropped, not errored");
    }
    assert_eq!(session.malformed, 3);

    // The connection is still usable afterwards.
    join(&state, &mut session, "r").await;
    assert_eq!(state.hub.member_count("r").await, 1);
}
