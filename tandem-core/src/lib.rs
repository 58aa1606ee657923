pub mod model;
pub mod utils;

pub use model::{
    EventKind, IceCandidate, IceServerConfig, JoinBody, ParticipantId, SdpType,
    SessionDescription, SessionId, SignalingMessage,
};
