mod config;
mod error;

pub mod connection;
pub mod negotiation;
pub mod session;
pub mod signaling;

pub use config::SessionConfig;
pub use error::SessionError;

pub use connection::{
    ConnectionCapability, ConnectionEvent, ConnectionFactory, LocalMedia, MediaStream,
    RemoteMedia, RtcConnection, RtcConnectionFactory, TransportState,
};
pub use negotiation::{NegotiationState, NegotiationStateMachine, PendingCandidateQueue};
pub use session::{LocalMediaSource, SessionController, SessionHooks};
pub use signaling::{SignalingChannel, SignalingConnector, SignalingLink, WsSignalingConnector};
