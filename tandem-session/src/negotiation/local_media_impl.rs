use tracing::{debug, info, warn};

use crate::connection::{ConnectionCapability, MediaStream};
use crate::error::SessionError;
use crate::negotiation::NegotiationStateMachine;

impl<C: ConnectionCapability> NegotiationStateMachine<C> {
    /// Adds every track of `stream` to the connection. The connection usually
    /// answers with a negotiation-needed event.
    pub async fn attach_local_media(&mut self, stream: C::LocalStream) -> Result<(), SessionError> {
        if self.is_closed() {
            return Err(SessionError::precondition(
                "cannot add media to a closed session",
            ));
        }

        for track in stream.tracks() {
            self.connection.add_track(track, &stream).await?;
            if self.is_closed() {
                return Ok(());
            }
        }

        self.local_media_attached = true;
        info!("Attached local stream '{}'", stream.id());
        Ok(())
    }

    pub(super) async fn acquire_local_media(&mut self) {
        let acquired = match self.hooks.media_source.as_ref() {
            Some(source) => source.acquire().await,
            None => return,
        };

        match acquired {
            Ok(stream) => {
                if let Err(e) = self.attach_local_media(stream).await {
                    warn!("Failed to attach local media: {}", e);
                }
            }
            Err(e) => warn!("Failed to acquire local media, answering without it: {}", e),
        }
    }

    /// Surfaces a remote stream once, however many of its tracks unmute.
    pub fn on_remote_track_unmuted(&mut self, stream: C::RemoteStream) {
        if self.is_closed() {
            return;
        }

        if !self.surfaced_streams.insert(stream.id().to_owned()) {
            debug!("Remote stream '{}' already surfaced", stream.id());
            return;
        }

        info!("Remote stream '{}' available", stream.id());
        if let Some(on_remote_stream) = self.hooks.on_remote_stream.as_mut() {
            on_remote_stream(stream);
        }
    }
}
