use async_trait::async_trait;
use tandem_core::{IceCandidate, SessionDescription};
use tokio::sync::mpsc;

use crate::SessionConfig;
use crate::connection::ConnectionEvent;
use crate::error::SessionError;

/// A group of tracks sharing one stream id (local capture or remote media).
pub trait MediaStream: Send + Sync + 'static {
    type Track: Send + 'static;

    fn id(&self) -> &str;

    fn tracks(&self) -> Vec<Self::Track>;
}

/// The negotiable transport a session drives.
///
/// Implementations report asynchronous happenings (negotiation needed, local
/// candidates, remote tracks, state changes) through the event channel they
/// were created with, never by calling back into the session.
#[async_trait]
pub trait ConnectionCapability: Send + Sync + 'static {
    type LocalStream: MediaStream;
    type RemoteStream: MediaStream;

    /// Creates an offer or an answer depending on the signaling state, applies
    /// it locally and returns it.
    async fn set_local_description(&self) -> Result<SessionDescription, SessionError>;

    async fn set_remote_description(
        &self,
        description: SessionDescription,
    ) -> Result<(), SessionError>;

    async fn add_ice_candidate(&self, candidate: IceCandidate) -> Result<(), SessionError>;

    async fn add_track(
        &self,
        track: <Self::LocalStream as MediaStream>::Track,
        stream: &Self::LocalStream,
    ) -> Result<(), SessionError>;

    async fn close(&self) -> Result<(), SessionError>;
}

pub type RemoteStreamOf<C> = <C as ConnectionCapability>::RemoteStream;

/// Builds one connection per session.
#[async_trait]
pub trait ConnectionFactory: Send + Sync {
    type Connection: ConnectionCapability;

    async fn create(
        &self,
        config: &SessionConfig,
        events: mpsc::Sender<ConnectionEvent<RemoteStreamOf<Self::Connection>>>,
    ) -> Result<Self::Connection, SessionError>;
}
