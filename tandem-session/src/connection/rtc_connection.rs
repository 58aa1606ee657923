use std::sync::Arc;

use async_trait::async_trait;
use tandem_core::{IceCandidate, SdpType, SessionDescription};
use tokio::sync::mpsc;
use tracing::{debug, info};
use webrtc::api::APIBuilder;
use webrtc::api::interceptor_registry::register_default_interceptors;
use webrtc::api::media_engine::MediaEngine;
use webrtc::ice_transport::ice_candidate::{RTCIceCandidate, RTCIceCandidateInit};
use webrtc::ice_transport::ice_server::RTCIceServer;
use webrtc::interceptor::registry::Registry;
use webrtc::peer_connection::RTCPeerConnection;
use webrtc::peer_connection::configuration::RTCConfiguration;
use webrtc::peer_connection::peer_connection_state::RTCPeerConnectionState;
use webrtc::peer_connection::sdp::sdp_type::RTCSdpType;
use webrtc::peer_connection::sdp::session_description::RTCSessionDescription;
use webrtc::peer_connection::signaling_state::RTCSignalingState;
use webrtc::rtp_transceiver::RTCRtpTransceiver;
use webrtc::rtp_transceiver::rtp_receiver::RTCRtpReceiver;
use webrtc::track::track_remote::TrackRemote;

use crate::SessionConfig;
use crate::connection::rtc_media::LocalTrack;
use crate::connection::{
    ConnectionCapability, ConnectionEvent, ConnectionFactory, LocalMedia, MediaStream,
    RemoteMedia, TransportState,
};
use crate::error::SessionError;

/// [`ConnectionCapability`] backed by a `webrtc` peer connection.
pub struct RtcConnection {
    peer_connection: Arc<RTCPeerConnection>,
}

/// Creates [`RtcConnection`]s with default codecs and interceptors.
#[derive(Debug, Clone, Copy, Default)]
pub struct RtcConnectionFactory;

#[async_trait]
impl ConnectionFactory for RtcConnectionFactory {
    type Connection = RtcConnection;

    async fn create(
        &self,
        config: &SessionConfig,
        events: mpsc::Sender<ConnectionEvent<RemoteMedia>>,
    ) -> Result<RtcConnection, SessionError> {
        let mut media_engine = MediaEngine::default();
        media_engine
            .register_default_codecs()
            .map_err(SessionError::negotiation)?;
        let registry = register_default_interceptors(Registry::new(), &mut media_engine)
            .map_err(SessionError::negotiation)?;

        let api = APIBuilder::new()
            .with_media_engine(media_engine)
            .with_interceptor_registry(registry)
            .build();

        let rtc_config = RTCConfiguration {
            ice_servers: config
                .ice_servers
                .iter()
                .map(|server| RTCIceServer {
                    urls: server.urls.clone(),
                    username: server.username.clone().unwrap_or_default(),
                    credential: server.credential.clone().unwrap_or_default(),
                    ..Default::default()
                })
                .collect(),
            ..Default::default()
        };

        let peer_connection = Arc::new(
            api.new_peer_connection(rtc_config)
                .await
                .map_err(SessionError::negotiation)?,
        );

        Self::wire_events(&peer_connection, events);

        Ok(RtcConnection { peer_connection })
    }
}

impl RtcConnectionFactory {
    fn wire_events(
        peer_connection: &Arc<RTCPeerConnection>,
        event_tx: mpsc::Sender<ConnectionEvent<RemoteMedia>>,
    ) {
        let state_tx = event_tx.clone();
        peer_connection.on_peer_connection_state_change(Box::new(
            move |s: RTCPeerConnectionState| {
                let tx = state_tx.clone();
                Box::pin(async move {
                    debug!("Peer connection state changed: {:?}", s);
                    let _ = tx
                        .send(ConnectionEvent::StateChanged(transport_state(s)))
                        .await;
                })
            },
        ));

        let ice_tx = event_tx.clone();
        peer_connection.on_ice_candidate(Box::new(move |c: Option<RTCIceCandidate>| {
            let tx = ice_tx.clone();
            Box::pin(async move {
                let candidate = match c {
                    Some(candidate) => match candidate.to_json() {
                        Ok(init) => Some(from_rtc_candidate(init)),
                        Err(e) => {
                            debug!("Skipping unserializable local candidate: {}", e);
                            return;
                        }
                    },
                    None => None,
                };
                let _ = tx.send(ConnectionEvent::IceCandidate(candidate)).await;
            })
        }));

        let negotiation_tx = event_tx.clone();
        peer_connection.on_negotiation_needed(Box::new(move || {
            let tx = negotiation_tx.clone();
            Box::pin(async move {
                let _ = tx.send(ConnectionEvent::NegotiationNeeded).await;
            })
        }));

        let track_tx = event_tx;
        peer_connection.on_track(Box::new(
            move |track: Arc<TrackRemote>,
                  _receiver: Arc<RTCRtpReceiver>,
                  _transceiver: Arc<RTCRtpTransceiver>| {
                let tx = track_tx.clone();
                Box::pin(async move {
                    let media = RemoteMedia::new(track);
                    info!("Remote track arrived on stream '{}'", media.id());
                    let _ = tx.send(ConnectionEvent::TrackUnmuted(media)).await;
                })
            },
        ));
    }
}

#[async_trait]
impl ConnectionCapability for RtcConnection {
    type LocalStream = LocalMedia;
    type RemoteStream = RemoteMedia;

    async fn set_local_description(&self) -> Result<SessionDescription, SessionError> {
        let description = match self.peer_connection.signaling_state() {
            RTCSignalingState::HaveRemoteOffer => self.peer_connection.create_answer(None).await,
            _ => self.peer_connection.create_offer(None).await,
        }
        .map_err(SessionError::negotiation)?;

        self.peer_connection
            .set_local_description(description.clone())
            .await
            .map_err(SessionError::negotiation)?;

        from_rtc_description(description)
    }

    async fn set_remote_description(
        &self,
        description: SessionDescription,
    ) -> Result<(), SessionError> {
        let desc = to_rtc_description(description)?;
        self.peer_connection
            .set_remote_description(desc)
            .await
            .map_err(SessionError::negotiation)
    }

    async fn add_ice_candidate(&self, candidate: IceCandidate) -> Result<(), SessionError> {
        self.peer_connection
            .add_ice_candidate(to_rtc_candidate(candidate))
            .await
            .map_err(SessionError::negotiation)
    }

    async fn add_track(&self, track: LocalTrack, stream: &LocalMedia) -> Result<(), SessionError> {
        if track.stream_id() != stream.id() {
            debug!(
                "Track '{}' carries stream id '{}', expected '{}'",
                track.id(),
                track.stream_id(),
                stream.id()
            );
        }
        self.peer_connection
            .add_track(track)
            .await
            .map_err(SessionError::negotiation)?;
        Ok(())
    }

    async fn close(&self) -> Result<(), SessionError> {
        self.peer_connection
            .close()
            .await
            .map_err(SessionError::negotiation)
    }
}

fn transport_state(state: RTCPeerConnectionState) -> TransportState {
    match state {
        RTCPeerConnectionState::Connecting => TransportState::Connecting,
        RTCPeerConnectionState::Connected => TransportState::Connected,
        RTCPeerConnectionState::Disconnected => TransportState::Disconnected,
        RTCPeerConnectionState::Failed => TransportState::Failed,
        RTCPeerConnectionState::Closed => TransportState::Closed,
        _ => TransportState::New,
    }
}

fn to_rtc_description(
    description: SessionDescription,
) -> Result<RTCSessionDescription, SessionError> {
    let SessionDescription { sdp_type, sdp } = description;
    let desc = match sdp_type {
        SdpType::Offer => RTCSessionDescription::offer(sdp),
        SdpType::Answer => RTCSessionDescription::answer(sdp),
        SdpType::Pranswer => RTCSessionDescription::pranswer(sdp),
        SdpType::Rollback => {
            return Err(SessionError::negotiation(
                "rollback descriptions are not supported",
            ));
        }
    };
    desc.map_err(SessionError::negotiation)
}

fn from_rtc_description(
    description: RTCSessionDescription,
) -> Result<SessionDescription, SessionError> {
    let sdp_type = match description.sdp_type {
        RTCSdpType::Offer => SdpType::Offer,
        RTCSdpType::Answer => SdpType::Answer,
        RTCSdpType::Pranswer => SdpType::Pranswer,
        RTCSdpType::Rollback => SdpType::Rollback,
        other => {
            return Err(SessionError::negotiation(format!(
                "connection produced a {other} description"
            )));
        }
    };
    Ok(SessionDescription {
        sdp_type,
        sdp: description.sdp,
    })
}

fn to_rtc_candidate(candidate: IceCandidate) -> RTCIceCandidateInit {
    RTCIceCandidateInit {
        candidate: candidate.candidate,
        sdp_mid: candidate.sdp_mid,
        sdp_mline_index: candidate.sdp_m_line_index,
        username_fragment: candidate.username_fragment,
    }
}

fn from_rtc_candidate(init: RTCIceCandidateInit) -> IceCandidate {
    IceCandidate {
        candidate: init.candidate,
        sdp_mid: init.sdp_mid,
        sdp_m_line_index: init.sdp_mline_index,
        username_fragment: init.username_fragment,
    }
}
