use tandem_core::SignalingMessage;
use tracing::{debug, info, warn};

use crate::connection::{ConnectionCapability, TransportState};
use crate::error::SessionError;
use crate::negotiation::{NegotiationState, NegotiationStateMachine};

impl<C: ConnectionCapability> NegotiationStateMachine<C> {
    /// Announces the local participant to the room.
    pub async fn start(&mut self) -> Result<(), SessionError> {
        if self.state != NegotiationState::Idle {
            return Err(SessionError::precondition("session already started"));
        }

        self.signaling
            .send(SignalingMessage::join(&self.local_id))
            .await?;
        info!("[{}] Joining as {}", self.session_id, self.local_id);
        self.transition(NegotiationState::Joining);
        Ok(())
    }

    /// Local hang-up: tell the room, then tear down.
    pub async fn leave(&mut self) {
        if self.is_closed() {
            return;
        }

        let leave = SignalingMessage::leave(&self.local_id);
        if let Err(e) = self.signaling.send(leave).await {
            warn!("Failed to send leave: {}", e);
        }
        self.teardown().await;
    }

    /// Closes both collaborators and fires `on_closed`. Idempotent.
    pub async fn teardown(&mut self) {
        if self.is_closed() {
            return;
        }

        self.release().await;
        if let Some(on_closed) = self.hooks.on_closed.take() {
            on_closed();
        }
        info!("[{}] Session closed", self.session_id);
    }

    /// Like [`Self::teardown`] without notifying anyone. Used when `join` fails half-way.
    pub(crate) async fn release(&mut self) {
        self.transition(NegotiationState::Closed);
        self.offer_in_flight = false;
        self.negotiation_deferred = false;
        self.pending_candidates.clear();

        if let Err(e) = self.connection.close().await {
            warn!("Failed to close peer connection: {}", e);
        }
        self.signaling.close().await;
    }

    pub fn on_transport_state(&mut self, state: TransportState) {
        if self.is_closed() {
            return;
        }

        match state {
            TransportState::Connected => {
                self.transport_connected = true;
                info!("Peer connection established with {}", self.peer_label());
                if self.state == NegotiationState::Negotiating && !self.offer_in_flight {
                    self.transition(NegotiationState::Connected);
                }
            }
            TransportState::Disconnected | TransportState::Failed => {
                self.transport_connected = false;
                warn!(
                    "[{}] Peer connection {:?}; waiting for a fresh negotiation",
                    self.session_id, state
                );
            }
            TransportState::Closed => {
                self.transport_connected = false;
                debug!("Peer connection closed by the engine");
            }
            TransportState::New | TransportState::Connecting => {
                debug!("Peer connection {:?}", state);
            }
        }
    }
}
