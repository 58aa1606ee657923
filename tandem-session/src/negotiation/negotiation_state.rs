use std::fmt;

/// Where a session stands in the offer/answer exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NegotiationState {
    /// Created, `join` not sent yet.
    Idle,
    /// `join` sent, no acknowledgement from the room.
    Joining,
    /// In the room, no offer/answer exchange started.
    WaitingForPeer,
    /// An offer or answer has been sent and the exchange is not complete.
    Negotiating,
    Connected,
    /// Terminal. Both collaborators have been released.
    Closed,
}

impl fmt::Display for NegotiationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}
