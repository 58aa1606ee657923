use tandem_core::SignalingMessage;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::connection::{ConnectionCapability, ConnectionEvent};
use crate::error::SessionError;
use crate::negotiation::NegotiationStateMachine;
use crate::session::SessionCommand;

type Events<C> = mpsc::Receiver<ConnectionEvent<<C as ConnectionCapability>::RemoteStream>>;

/// The task that owns one negotiation state machine.
pub(crate) struct Session<C: ConnectionCapability> {
    machine: NegotiationStateMachine<C>,
    command_rx: mpsc::Receiver<SessionCommand<C::LocalStream>>,
    signaling_rx: mpsc::Receiver<SignalingMessage>,
    event_rx: Events<C>,
}

impl<C: ConnectionCapability> Session<C> {
    pub fn new(
        machine: NegotiationStateMachine<C>,
        command_rx: mpsc::Receiver<SessionCommand<C::LocalStream>>,
        signaling_rx: mpsc::Receiver<SignalingMessage>,
        event_rx: Events<C>,
    ) -> Self {
        Self {
            machine,
            command_rx,
            signaling_rx,
            event_rx,
        }
    }

    pub async fn run(mut self) {
        let session_id = self.machine.session_id();
        info!("[{}] Session event loop started", session_id);

        let mut signaling_open = true;
        let mut events_open = true;

        while !self.machine.is_closed() {
            tokio::select! {
                cmd = self.command_rx.recv() => {
                    match cmd {
                        Some(c) => self.handle_command(c).await,
                        None => {
                            info!("Controller dropped. Leaving session.");
                            self.machine.leave().await;
                        }
                    }
                }

                msg = self.signaling_rx.recv(), if signaling_open => {
                    match msg {
                        Some(m) => self.machine.on_signaling_message(m).await,
                        None => {
                            let err = SessionError::transport("signaling stream ended");
                            warn!("[{}] {}", session_id, err);
                            signaling_open = false;
                        }
                    }
                }

                evt = self.event_rx.recv(), if events_open => {
                    match evt {
                        Some(e) => self.handle_connection_event(e).await,
                        None => {
                            debug!("Connection event stream ended");
                            events_open = false;
                        }
                    }
                }
            }
        }

        // Late commands still deserve an answer.
        self.command_rx.close();
        while let Some(cmd) = self.command_rx.recv().await {
            self.handle_command(cmd).await;
        }

        info!("[{}] Session event loop finished", session_id);
    }

    async fn handle_command(&mut self, cmd: SessionCommand<C::LocalStream>) {
        match cmd {
            SessionCommand::AddMediaStream { stream, done } => {
                let result = self.machine.attach_local_media(stream).await;
                let _ = done.send(result);
            }

            SessionCommand::Close { done } => {
                self.machine.leave().await;
                let _ = done.send(());
            }
        }
    }

    async fn handle_connection_event(&mut self, event: ConnectionEvent<C::RemoteStream>) {
        match event {
            ConnectionEvent::NegotiationNeeded => self.machine.on_negotiation_needed().await,
            ConnectionEvent::IceCandidate(candidate) => {
                self.machine.on_local_ice_candidate(candidate).await
            }
            ConnectionEvent::TrackUnmuted(stream) => self.machine.on_remote_track_unmuted(stream),
            ConnectionEvent::StateChanged(state) => self.machine.on_transport_state(state),
        }
    }
}
