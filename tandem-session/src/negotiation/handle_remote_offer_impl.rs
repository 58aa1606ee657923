use tandem_core::{SdpType, SessionDescription, SignalingMessage};
use tracing::{info, warn};

use crate::connection::ConnectionCapability;
use crate::error::SessionError;
use crate::negotiation::{NegotiationState, NegotiationStateMachine};

impl<C: ConnectionCapability> NegotiationStateMachine<C> {
    pub(super) async fn handle_remote_offer(
        &mut self,
        msg: &SignalingMessage,
    ) -> Result<(), SessionError> {
        let offer = msg
            .parse_body::<SessionDescription>()?
            .filter(|desc| desc.sdp_type == SdpType::Offer)
            .ok_or_else(|| SessionError::precondition("offer body is not an offer description"))?;

        info!("Offer from {}", msg.from);
        if self.remote_id.is_none() && !msg.from.is_empty() {
            self.remote_id = Some(msg.from.clone());
        }

        // Our outstanding offer is dropped whether or not the remote one applies.
        if std::mem::take(&mut self.offer_in_flight) {
            warn!(
                "[{}] Remote offer arrived over our outstanding offer; ours is abandoned",
                self.session_id
            );
        }

        let applied = self.connection.set_remote_description(offer).await;
        if self.is_closed() {
            return Ok(());
        }
        if let Err(e) = applied {
            self.flush_deferred_negotiation().await;
            return Err(e);
        }
        self.has_remote_description = true;

        let result = self.answer_remote_offer().await;
        self.flush_deferred_negotiation().await;
        result
    }

    async fn answer_remote_offer(&mut self) -> Result<(), SessionError> {
        self.drain_pending_candidates().await;

        if self.needs_local_media() {
            self.acquire_local_media().await;
        }
        if self.is_closed() {
            return Ok(());
        }

        let answer = self.connection.set_local_description().await?;
        if self.is_closed() {
            return Ok(());
        }
        if answer.sdp_type != SdpType::Answer {
            return Err(SessionError::negotiation(format!(
                "expected an answer, connection produced an {}",
                answer.sdp_type
            )));
        }

        self.signaling
            .send(SignalingMessage::answer(&self.local_id, &answer)?)
            .await?;
        info!("Sent answer to {}", self.peer_label());

        self.transition(NegotiationState::Negotiating);
        if self.transport_connected {
            self.transition(NegotiationState::Connected);
        }
        Ok(())
    }
}
