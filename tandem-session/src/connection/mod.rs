mod capability;
mod connection_event;
mod rtc_connection;
mod rtc_media;

pub use capability::{ConnectionCapability, ConnectionFactory, MediaStream, RemoteStreamOf};
pub use connection_event::{ConnectionEvent, TransportState};
pub use rtc_connection::{RtcConnection, RtcConnectionFactory};
pub use rtc_media::{LocalMedia, RemoteMedia};
