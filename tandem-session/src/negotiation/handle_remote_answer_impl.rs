use tandem_core::{SdpType, SessionDescription, SignalingMessage};
use tracing::info;

use crate::connection::ConnectionCapability;
use crate::error::SessionError;
use crate::negotiation::{NegotiationState, NegotiationStateMachine};

impl<C: ConnectionCapability> NegotiationStateMachine<C> {
    pub(super) async fn handle_remote_answer(
        &mut self,
        msg: &SignalingMessage,
    ) -> Result<(), SessionError> {
        if self.state == NegotiationState::Idle || !self.offer_in_flight {
            return Err(SessionError::precondition(
                "answer received without an outstanding local offer",
            ));
        }

        let answer = msg
            .parse_body::<SessionDescription>()?
            .filter(|desc| desc.sdp_type == SdpType::Answer)
            .ok_or_else(|| SessionError::precondition("answer body is not an answer description"))?;

        info!("Answer from {}", msg.from);

        let applied = self.connection.set_remote_description(answer).await;
        if self.is_closed() {
            return Ok(());
        }
        self.offer_in_flight = false;

        if let Err(e) = applied {
            self.flush_deferred_negotiation().await;
            return Err(e);
        }

        self.has_remote_description = true;
        self.drain_pending_candidates().await;
        if self.is_closed() {
            return Ok(());
        }

        self.transition(NegotiationState::Connected);
        self.flush_deferred_negotiation().await;
        Ok(())
    }
}
