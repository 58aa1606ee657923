mod candidate;
mod description;
mod participant;
mod session;
mod signaling;

pub use candidate::IceCandidate;
pub use description::{SdpType, SessionDescription};
pub use participant::ParticipantId;
pub use session::SessionId;
pub use signaling::{EventKind, IceServerConfig, JoinBody, SignalingMessage};
