use std::collections::HashSet;

use tandem_core::{ParticipantId, SessionId};
use tokio::sync::watch;
use tracing::debug;

use crate::connection::ConnectionCapability;
use crate::session::SessionHooks;
use crate::signaling::SignalingChannel;

mod candidate_queue;
mod handle_ice_impl;
mod handle_remote_answer_impl;
mod handle_remote_offer_impl;
mod handle_signal_impl;
mod lifecycle_impl;
mod local_media_impl;
mod negotiation_needed_impl;
mod negotiation_state;

pub use candidate_queue::PendingCandidateQueue;
pub use negotiation_state::NegotiationState;

/// Offer/answer/ICE state machine for one local and one remote participant.
///
/// Every entry point runs to completion before the next one is invoked (the
/// session loop owns the machine), so no internal locking is needed. After
/// every await the handlers re-check [`NegotiationStateMachine::is_closed`],
/// and once closed every entry point is a no-op.
pub struct NegotiationStateMachine<C: ConnectionCapability> {
    session_id: SessionId,
    local_id: ParticipantId,
    remote_id: Option<ParticipantId>,
    state: NegotiationState,
    state_tx: watch::Sender<NegotiationState>,
    signaling: Box<dyn SignalingChannel>,
    connection: C,
    pending_candidates: PendingCandidateQueue,
    has_remote_description: bool,
    offer_in_flight: bool,
    negotiation_deferred: bool,
    local_media_attached: bool,
    transport_connected: bool,
    surfaced_streams: HashSet<String>,
    hooks: SessionHooks<C::LocalStream, C::RemoteStream>,
}

impl<C: ConnectionCapability> NegotiationStateMachine<C> {
    pub fn new(
        local_id: ParticipantId,
        signaling: Box<dyn SignalingChannel>,
        connection: C,
        hooks: SessionHooks<C::LocalStream, C::RemoteStream>,
    ) -> Self {
        let (state_tx, _) = watch::channel(NegotiationState::Idle);

        Self {
            session_id: SessionId::new(),
            local_id,
            remote_id: None,
            state: NegotiationState::Idle,
            state_tx,
            signaling,
            connection,
            pending_candidates: PendingCandidateQueue::new(),
            has_remote_description: false,
            offer_in_flight: false,
            negotiation_deferred: false,
            local_media_attached: false,
            transport_connected: false,
            surfaced_streams: HashSet::new(),
            hooks,
        }
    }

    pub fn session_id(&self) -> SessionId {
        self.session_id
    }

    pub fn local_id(&self) -> &ParticipantId {
        &self.local_id
    }

    /// The peer seen in `joined` or in the first offer.
    pub fn remote_id(&self) -> Option<&ParticipantId> {
        self.remote_id.as_ref()
    }

    pub fn state(&self) -> NegotiationState {
        self.state
    }

    pub fn subscribe_state(&self) -> watch::Receiver<NegotiationState> {
        self.state_tx.subscribe()
    }

    pub fn is_closed(&self) -> bool {
        self.state == NegotiationState::Closed
    }

    /// True until a local stream has been attached to the connection.
    pub fn needs_local_media(&self) -> bool {
        !self.local_media_attached
    }

    pub fn has_remote_description(&self) -> bool {
        self.has_remote_description
    }

    pub fn has_offer_in_flight(&self) -> bool {
        self.offer_in_flight
    }

    pub fn pending_candidate_count(&self) -> usize {
        self.pending_candidates.len()
    }

    fn transition(&mut self, next: NegotiationState) {
        if self.state == next {
            return;
        }
        debug!("[{}] {} -> {}", self.session_id, self.state, next);
        self.state = next;
        self.state_tx.send_replace(next);
    }

    fn peer_label(&self) -> &str {
        self.remote_id.as_ref().map_or("peer", ParticipantId::as_str)
    }
}
