use tandem_core::{IceCandidate, SignalingMessage};
use tracing::{debug, info, warn};

use crate::connection::ConnectionCapability;
use crate::error::SessionError;
use crate::negotiation::NegotiationStateMachine;

impl<C: ConnectionCapability> NegotiationStateMachine<C> {
    pub(super) async fn handle_remote_candidate(
        &mut self,
        msg: &SignalingMessage,
    ) -> Result<(), SessionError> {
        let candidate = match msg.parse_body::<IceCandidate>()? {
            Some(candidate) if !candidate.is_end_of_candidates() => candidate,
            _ => {
                debug!("End of candidates from {}", msg.from);
                return Ok(());
            }
        };

        if !self.has_remote_description {
            debug!(
                "No remote description yet, queueing candidate from {} ({} pending)",
                msg.from,
                self.pending_candidates.len() + 1
            );
            self.pending_candidates.push(candidate);
            return Ok(());
        }

        debug!("Adding ICE candidate from {}: {}", msg.from, candidate.candidate);
        self.connection.add_ice_candidate(candidate).await
    }

    /// Applies candidates queued before the first remote description. Runs once.
    pub(super) async fn drain_pending_candidates(&mut self) {
        let Some(candidates) = self.pending_candidates.drain() else {
            return;
        };
        if candidates.is_empty() {
            return;
        }

        info!("Applying {} queued ICE candidates", candidates.len());
        for candidate in candidates {
            if self.is_closed() {
                return;
            }
            if let Err(e) = self.connection.add_ice_candidate(candidate).await {
                warn!("Failed to add queued ICE candidate: {}", e);
            }
        }
    }

    /// Forwards a locally gathered candidate; `None` marks the end of gathering.
    pub async fn on_local_ice_candidate(&mut self, candidate: Option<IceCandidate>) {
        if self.is_closed() {
            return;
        }

        let result = match SignalingMessage::ice_candidate(&self.local_id, candidate.as_ref()) {
            Ok(msg) => self.signaling.send(msg).await,
            Err(e) => Err(e.into()),
        };
        if let Err(e) = result {
            warn!("Failed to forward local ICE candidate: {}", e);
        }
    }
}
