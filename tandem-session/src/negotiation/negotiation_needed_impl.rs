use tandem_core::{SdpType, SignalingMessage};
use tracing::{debug, info, warn};

use crate::connection::ConnectionCapability;
use crate::error::SessionError;
use crate::negotiation::{NegotiationState, NegotiationStateMachine};

impl<C: ConnectionCapability> NegotiationStateMachine<C> {
    /// The connection wants a fresh offer/answer exchange.
    ///
    /// At most one local offer is outstanding. Triggers arriving meanwhile are
    /// coalesced into a single deferred one that fires when the exchange
    /// resolves.
    pub async fn on_negotiation_needed(&mut self) {
        if self.is_closed() {
            debug!("[{}] Closed, ignoring negotiation request", self.session_id);
            return;
        }

        if self.offer_in_flight {
            if !self.negotiation_deferred {
                debug!("Offer already in flight, deferring negotiation");
            }
            self.negotiation_deferred = true;
            return;
        }

        self.start_negotiation().await;
    }

    pub(super) async fn flush_deferred_negotiation(&mut self) {
        if !self.negotiation_deferred || self.offer_in_flight || self.is_closed() {
            return;
        }
        self.negotiation_deferred = false;
        info!("Running deferred negotiation");
        self.start_negotiation().await;
    }

    async fn start_negotiation(&mut self) {
        self.offer_in_flight = true;
        if let Err(e) = self.send_offer().await {
            warn!("[{}] Negotiation abandoned: {}", self.session_id, e);
            self.offer_in_flight = false;
        }
    }

    async fn send_offer(&mut self) -> Result<(), SessionError> {
        let offer = self.connection.set_local_description().await?;
        if self.is_closed() {
            return Ok(());
        }
        if offer.sdp_type != SdpType::Offer {
            return Err(SessionError::negotiation(format!(
                "expected an offer, connection produced an {}",
                offer.sdp_type
            )));
        }

        self.signaling
            .send(SignalingMessage::offer(&self.local_id, &offer)?)
            .await?;
        info!("Sent offer to {}", self.peer_label());

        self.transition(NegotiationState::Negotiating);
        Ok(())
    }
}
