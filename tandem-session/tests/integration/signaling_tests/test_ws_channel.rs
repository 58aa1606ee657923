use futures::{SinkExt, StreamExt};
use tandem_core::{EventKind, ParticipantId, SignalingMessage};
use tandem_session::{SessionError, SignalingConnector, WsSignalingConnector};
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tokio_tungstenite::accept_async;
use tokio_tungstenite::tungstenite::Message;

use crate::integration::init_tracing;
use crate::utils::{SIGNAL_TIMEOUT_MS, remote_offer};

/// Single-connection WebSocket server. Frames received from the client come
/// out of the returned receiver; frames pushed into the sender go to the client.
async fn spawn_ws_server() -> (
    String,
    mpsc::UnboundedReceiver<Message>,
    mpsc::UnboundedSender<Message>,
) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = format!("ws://{}", listener.local_addr().unwrap());
    let (received_tx, received_rx) = mpsc::unbounded_channel();
    let (push_tx, mut push_rx) = mpsc::unbounded_channel::<Message>();

    tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        let socket = accept_async(stream).await.unwrap();
        let (mut sink, mut source) = socket.split();

        tokio::spawn(async move {
            while let Some(msg) = push_rx.recv().await {
                if sink.send(msg).await.is_err() {
                    break;
                }
            }
        });

        while let Some(Ok(msg)) = source.next().await {
            if received_tx.send(msg).is_err() {
                break;
            }
        }
    });

    (address, received_rx, push_tx)
}

async fn next_text(rx: &mut mpsc::UnboundedReceiver<Message>) -> String {
    let deadline = std::time::Duration::from_millis(SIGNAL_TIMEOUT_MS);
    loop {
        match tokio::time::timeout(deadline, rx.recv()).await {
            Ok(Some(Message::Text(text))) => return text,
            Ok(Some(_)) => continue,
            other => panic!("expected a text frame, got {other:?}"),
        }
    }
}

#[tokio::test]
async fn test_messages_travel_both_ways() {
    init_tracing();

    let (address, mut received, push) = spawn_ws_server().await;
    let mut link = WsSignalingConnector.open(&address).await.unwrap();

    let alice = ParticipantId::from("alice");
    link.channel.send(SignalingMessage::join(&alice)).await.unwrap();

    let text = next_text(&mut received).await;
    let join = SignalingMessage::from_json(&text).unwrap();
    assert_eq!(join.event, EventKind::Join);
    assert_eq!(join.from, alice);

    push.send(Message::Text("not json".into())).unwrap();
    push.send(Message::Text(remote_offer("bob").to_json().unwrap()))
        .unwrap();

    let deadline = std::time::Duration::from_millis(SIGNAL_TIMEOUT_MS);
    let inbound = tokio::time::timeout(deadline, link.inbound.recv())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(inbound.event, EventKind::Offer);
    assert_eq!(inbound.from.as_str(), "bob");

    link.channel.close().await;
}

#[tokio::test]
async fn test_unknown_events_are_delivered() {
    init_tracing();

    let (address, _received, push) = spawn_ws_server().await;
    let mut link = WsSignalingConnector.open(&address).await.unwrap();

    push.send(Message::Text(r#"{"event":"room_full","from":""}"#.into()))
        .unwrap();

    let deadline = std::time::Duration::from_millis(SIGNAL_TIMEOUT_MS);
    let inbound = tokio::time::timeout(deadline, link.inbound.recv())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(inbound.event, EventKind::Unknown("room_full".into()));

    link.channel.close().await;
}

#[tokio::test]
async fn test_close_frame_ends_inbound_stream() {
    init_tracing();

    let (address, _received, push) = spawn_ws_server().await;
    let mut link = WsSignalingConnector.open(&address).await.unwrap();

    push.send(Message::Close(None)).unwrap();

    let deadline = std::time::Duration::from_millis(SIGNAL_TIMEOUT_MS);
    let ended = tokio::time::timeout(deadline, link.inbound.recv())
        .await
        .unwrap();
    assert!(ended.is_none());
}

#[tokio::test]
async fn test_send_after_close_fails() {
    init_tracing();

    let (address, mut received, _push) = spawn_ws_server().await;
    let link = WsSignalingConnector.open(&address).await.unwrap();

    link.channel.close().await;
    link.channel.close().await;

    let result = link
        .channel
        .send(SignalingMessage::leave(&ParticipantId::from("alice")))
        .await;
    assert!(matches!(result, Err(SessionError::Transport(_))));

    let deadline = std::time::Duration::from_millis(SIGNAL_TIMEOUT_MS);
    let frame = tokio::time::timeout(deadline, received.recv()).await.unwrap();
    assert!(matches!(frame, Some(Message::Close(_)) | None));
}

#[tokio::test]
async fn test_open_unreachable_address_fails() {
    init_tracing();

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = format!("ws://{}", listener.local_addr().unwrap());
    drop(listener);

    let result = WsSignalingConnector.open(&address).await;
    assert!(matches!(result, Err(SessionError::Transport(_))));
}

#[tokio::test]
async fn test_secure_address_attempts_a_connection() {
    init_tracing();

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = format!("wss://{}", listener.local_addr().unwrap());
    drop(listener);

    // A refused TCP connect, not a missing TLS backend.
    match WsSignalingConnector.open(&address).await {
        Err(SessionError::Transport(reason)) => {
            assert!(!reason.to_lowercase().contains("tls"), "{reason}");
        }
        Err(other) => panic!("expected a transport error, got {other}"),
        Ok(_) => panic!("connected to a closed port"),
    }
}
