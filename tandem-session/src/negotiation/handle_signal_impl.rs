use tandem_core::{EventKind, JoinBody, ParticipantId, SignalingMessage};
use tracing::{debug, info, warn};

use crate::connection::ConnectionCapability;
use crate::negotiation::{NegotiationState, NegotiationStateMachine};

impl<C: ConnectionCapability> NegotiationStateMachine<C> {
    /// Entry point for everything the signaling channel delivers.
    ///
    /// Failures are logged and the offending message is dropped; the session
    /// keeps going. Only `leave`/`left` end it.
    pub async fn on_signaling_message(&mut self, msg: SignalingMessage) {
        if self.is_closed() {
            debug!(
                "[{}] Closed, ignoring '{}' from {}",
                self.session_id, msg.event, msg.from
            );
            return;
        }

        let result = match &msg.event {
            EventKind::Join | EventKind::Joined => {
                self.handle_peer_joined(&msg);
                Ok(())
            }
            EventKind::Offer => self.handle_remote_offer(&msg).await,
            EventKind::Answer => self.handle_remote_answer(&msg).await,
            EventKind::IceCandidate => self.handle_remote_candidate(&msg).await,
            EventKind::Leave | EventKind::Left => {
                info!("{} left", msg.from);
                self.teardown().await;
                Ok(())
            }
            EventKind::NoMembers => {
                info!("No members in the room. Waiting for someone to join.");
                Ok(())
            }
            EventKind::Unknown(name) => {
                debug!("Ignoring unknown signaling event '{}'", name);
                Ok(())
            }
        };

        if let Err(e) = result {
            warn!(
                "[{}] Dropped '{}' from {}: {}",
                self.session_id, msg.event, msg.from, e
            );
        }
    }

    fn handle_peer_joined(&mut self, msg: &SignalingMessage) {
        let name = match msg.parse_body::<JoinBody>() {
            Ok(Some(body)) if !body.username.is_empty() => ParticipantId::from(body.username),
            _ => msg.from.clone(),
        };
        info!("{} joined", name);

        if !name.is_empty() && name != self.local_id {
            self.remote_id = Some(name);
        }

        if self.state == NegotiationState::Joining {
            self.transition(NegotiationState::WaitingForPeer);
        }
    }
}
