use async_trait::async_trait;
use tandem_core::SignalingMessage;
use tokio::sync::mpsc;

use crate::error::SessionError;

/// Outbound half of the signaling pipe.
#[async_trait]
pub trait SignalingChannel: Send + Sync {
    async fn send(&self, msg: SignalingMessage) -> Result<(), SessionError>;

    /// Close the pipe. Calling it more than once is harmless.
    async fn close(&self);
}

/// An opened signaling pipe: the outbound channel plus the ordered inbound stream.
pub struct SignalingLink {
    pub channel: Box<dyn SignalingChannel>,
    pub inbound: mpsc::Receiver<SignalingMessage>,
}

#[async_trait]
pub trait SignalingConnector: Send + Sync {
    async fn open(&self, address: &str) -> Result<SignalingLink, SessionError>;
}
