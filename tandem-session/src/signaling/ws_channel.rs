use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use futures::{SinkExt, StreamExt};
use tandem_core::SignalingMessage;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, info, warn};

use crate::error::SessionError;
use crate::signaling::{SignalingChannel, SignalingConnector, SignalingLink};

const INBOUND_BUFFER: usize = 256;

/// Opens JSON-over-WebSocket signaling channels.
#[derive(Debug, Clone, Copy, Default)]
pub struct WsSignalingConnector;

pub struct WsSignalingChannel {
    outbound: mpsc::UnboundedSender<Message>,
    recv_task: JoinHandle<()>,
    closed: AtomicBool,
}

#[async_trait]
impl SignalingConnector for WsSignalingConnector {
    async fn open(&self, address: &str) -> Result<SignalingLink, SessionError> {
        let (socket, _response) = connect_async(address)
            .await
            .map_err(|e| SessionError::Transport(format!("cannot reach {address}: {e}")))?;
        info!("Signaling channel open: {}", address);

        let (mut sender, mut receiver) = socket.split();
        let (out_tx, mut out_rx) = mpsc::unbounded_channel::<Message>();
        let (in_tx, in_rx) = mpsc::channel::<SignalingMessage>(INBOUND_BUFFER);

        tokio::spawn(async move {
            while let Some(msg) = out_rx.recv().await {
                let is_close = matches!(msg, Message::Close(_));
                if sender.send(msg).await.is_err() || is_close {
                    break;
                }
            }
            let _ = sender.close().await;
        });

        let recv_task = tokio::spawn(async move {
            while let Some(Ok(msg)) = receiver.next().await {
                match msg {
                    Message::Text(text) => match SignalingMessage::from_json(&text) {
                        Ok(signal) => {
                            if in_tx.send(signal).await.is_err() {
                                break;
                            }
                        }
                        Err(e) => warn!("Invalid signaling frame: {}. Text: {}", e, text),
                    },
                    Message::Close(_) => break,
                    _ => {}
                }
            }
            debug!("Signaling receive loop finished");
        });

        Ok(SignalingLink {
            channel: Box::new(WsSignalingChannel {
                outbound: out_tx,
                recv_task,
                closed: AtomicBool::new(false),
            }),
            inbound: in_rx,
        })
    }
}

#[async_trait]
impl SignalingChannel for WsSignalingChannel {
    async fn send(&self, msg: SignalingMessage) -> Result<(), SessionError> {
        if self.closed.load(Ordering::Acquire) {
            return Err(SessionError::transport("signaling channel is closed"));
        }
        let json = msg.to_json()?;
        self.outbound
            .send(Message::Text(json))
            .map_err(|_| SessionError::transport("signaling socket is gone"))
    }

    async fn close(&self) {
        if self.closed.swap(true, Ordering::AcqRel) {
            return;
        }
        let _ = self.outbound.send(Message::Close(None));
        self.recv_task.abort();
        info!("Signaling channel closed");
    }
}

impl Drop for WsSignalingChannel {
    fn drop(&mut self) {
        self.recv_task.abort();
    }
}
