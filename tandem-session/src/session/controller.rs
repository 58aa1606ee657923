use tandem_core::{ParticipantId, SessionId};
use tokio::sync::{mpsc, oneshot, watch};
use tracing::{debug, info};

use crate::SessionConfig;
use crate::connection::{
    ConnectionCapability, ConnectionFactory, LocalMedia, MediaStream, RtcConnectionFactory,
};
use crate::error::SessionError;
use crate::negotiation::{NegotiationState, NegotiationStateMachine};
use crate::session::{Session, SessionCommand, SessionHooks};
use crate::signaling::{SignalingConnector, WsSignalingConnector};

type HooksOf<F> = SessionHooks<
    <<F as ConnectionFactory>::Connection as ConnectionCapability>::LocalStream,
    <<F as ConnectionFactory>::Connection as ConnectionCapability>::RemoteStream,
>;

/// Handle to a running session.
///
/// Dropping the controller leaves the room the same way [`SessionController::close`] does.
pub struct SessionController<L> {
    session_id: SessionId,
    participant: ParticipantId,
    command_tx: mpsc::Sender<SessionCommand<L>>,
    state_rx: watch::Receiver<NegotiationState>,
}

impl SessionController<LocalMedia> {
    /// Joins the room served at `address` over WebSocket with a `webrtc` peer connection.
    pub async fn join(
        participant: impl Into<ParticipantId>,
        address: &str,
        hooks: HooksOf<RtcConnectionFactory>,
    ) -> Result<Self, SessionError> {
        Self::join_with(
            &WsSignalingConnector,
            &RtcConnectionFactory,
            &SessionConfig::default(),
            participant,
            address,
            hooks,
        )
        .await
    }
}

impl<L: MediaStream> SessionController<L> {
    pub async fn join_with<S, F>(
        connector: &S,
        factory: &F,
        config: &SessionConfig,
        participant: impl Into<ParticipantId>,
        address: &str,
        hooks: HooksOf<F>,
    ) -> Result<Self, SessionError>
    where
        S: SignalingConnector + ?Sized,
        F: ConnectionFactory,
        F::Connection: ConnectionCapability<LocalStream = L>,
    {
        let participant = participant.into();
        let link = connector.open(address).await?;

        let (event_tx, event_rx) = mpsc::channel(256);
        let connection = match factory.create(config, event_tx).await {
            Ok(connection) => connection,
            Err(e) => {
                link.channel.close().await;
                return Err(e);
            }
        };

        let mut machine =
            NegotiationStateMachine::new(participant.clone(), link.channel, connection, hooks);
        if let Err(e) = machine.start().await {
            machine.release().await;
            return Err(e);
        }

        let session_id = machine.session_id();
        let state_rx = machine.subscribe_state();
        let (command_tx, command_rx) = mpsc::channel(32);

        let session = Session::new(machine, command_rx, link.inbound, event_rx);
        tokio::spawn(session.run());

        info!("[{}] {} joined {}", session_id, participant, address);

        Ok(Self {
            session_id,
            participant,
            command_tx,
            state_rx,
        })
    }

    /// Attaches a local stream. Fails with a precondition error once the session has ended.
    pub async fn add_media_stream(&self, stream: L) -> Result<(), SessionError> {
        let (done, result) = oneshot::channel();
        self.command_tx
            .send(SessionCommand::AddMediaStream { stream, done })
            .await
            .map_err(|_| SessionError::precondition("session has ended"))?;

        result
            .await
            .map_err(|_| SessionError::precondition("session has ended"))?
    }

    /// Sends `leave` and tears the session down. Resolves once teardown is done.
    pub async fn close(&self) {
        let (done, finished) = oneshot::channel();
        if self
            .command_tx
            .send(SessionCommand::Close { done })
            .await
            .is_err()
        {
            debug!("[{}] Session already finished", self.session_id);
            return;
        }
        let _ = finished.await;
    }

    pub fn state(&self) -> NegotiationState {
        *self.state_rx.borrow()
    }

    pub fn subscribe_state(&self) -> watch::Receiver<NegotiationState> {
        self.state_rx.clone()
    }

    pub fn is_closed(&self) -> bool {
        self.state() == NegotiationState::Closed
    }

    pub fn session_id(&self) -> SessionId {
        self.session_id
    }

    pub fn participant(&self) -> &ParticipantId {
        &self.participant
    }
}
