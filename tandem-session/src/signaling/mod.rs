mod signaling_channel;
mod ws_channel;

pub use signaling_channel::{SignalingChannel, SignalingConnector, SignalingLink};
pub use ws_channel::{WsSignalingChannel, WsSignalingConnector};
