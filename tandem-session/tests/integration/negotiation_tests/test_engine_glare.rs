use std::sync::Arc;

use tandem_core::{EventKind, ParticipantId, SignalingMessage};
use tandem_session::{
    ConnectionCapability, ConnectionFactory, LocalMedia, MediaStream, NegotiationStateMachine,
    RtcConnection, RtcConnectionFactory, SessionConfig, SessionHooks,
};
use tokio::sync::mpsc;
use webrtc::api::media_engine::MIME_TYPE_OPUS;
use webrtc::rtp_transceiver::rtp_codec::RTCRtpCodecCapability;
use webrtc::track::track_local::TrackLocal;
use webrtc::track::track_local::track_local_static_sample::TrackLocalStaticSample;

use crate::integration::init_tracing;
use crate::utils::MockSignaling;

fn audio_stream(stream_id: &str) -> LocalMedia {
    let track: Arc<dyn TrackLocal + Send + Sync> = Arc::new(TrackLocalStaticSample::new(
        RTCRtpCodecCapability {
            mime_type: MIME_TYPE_OPUS.to_owned(),
            ..Default::default()
        },
        "audio".to_owned(),
        stream_id.to_owned(),
    ));
    LocalMedia::new(stream_id, vec![track])
}

async fn engine_connection() -> RtcConnection {
    let (tx, _rx) = mpsc::channel(64);
    let config = SessionConfig {
        ice_servers: vec![],
    };
    RtcConnectionFactory
        .create(&config, tx)
        .await
        .expect("Failed to create connection")
}

#[tokio::test]
async fn test_engine_remote_offer_during_local_offer_keeps_negotiating() {
    init_tracing();

    let signaling = MockSignaling::new_stored_only();
    let mut machine = NegotiationStateMachine::new(
        ParticipantId::from("alice"),
        Box::new(signaling.clone()),
        engine_connection().await,
        SessionHooks::default(),
    );

    machine.start().await.unwrap();
    machine
        .attach_local_media(audio_stream("alice-mic"))
        .await
        .unwrap();
    machine.on_negotiation_needed().await;
    machine.on_negotiation_needed().await;
    assert_eq!(signaling.sent_of(EventKind::Offer).await.len(), 1);

    let bob = engine_connection().await;
    let bob_stream = audio_stream("bob-mic");
    for track in bob_stream.tracks() {
        bob.add_track(track, &bob_stream).await.unwrap();
    }
    let bob_offer = bob.set_local_description().await.unwrap();

    // Alice's engine is in have-local-offer and refuses Bob's offer.
    machine
        .on_signaling_message(
            SignalingMessage::offer(&ParticipantId::from("bob"), &bob_offer).unwrap(),
        )
        .await;

    assert!(!machine.is_closed());
    assert!(signaling.sent_of(EventKind::Answer).await.is_empty());
    // The deferred trigger went out instead of being swallowed.
    assert_eq!(signaling.sent_of(EventKind::Offer).await.len(), 2);
    assert!(machine.has_offer_in_flight());

    machine.teardown().await;
    bob.close().await.unwrap();
}
