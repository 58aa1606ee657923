use tandem_core::IceCandidate;

/// Coarse peer-connection state as reported by the connection engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportState {
    New,
    Connecting,
    Connected,
    Disconnected,
    Failed,
    Closed,
}

/// Events a connection pushes into the session loop.
#[derive(Debug)]
pub enum ConnectionEvent<R> {
    NegotiationNeeded,
    /// `None` once local gathering is complete.
    IceCandidate(Option<IceCandidate>),
    /// A remote track started delivering media. `R` is the stream it belongs to.
    TrackUnmuted(R),
    StateChanged(TransportState),
}
