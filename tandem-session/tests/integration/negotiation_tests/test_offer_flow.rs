use tandem_core::{EventKind, SdpType};
use tandem_session::NegotiationState;

use crate::integration::{create_test_machine, init_tracing};
use crate::utils::{ConnectionCall, MockStream, remote_answer, remote_offer};

#[tokio::test]
async fn test_media_then_negotiation_needed_sends_one_offer() {
    init_tracing();

    let mut t = create_test_machine("alice");
    t.machine.start().await.unwrap();

    t.machine
        .attach_local_media(MockStream::new("camera", &["audio-0"]))
        .await
        .unwrap();
    t.machine.on_negotiation_needed().await;

    let offers = t.signaling.sent_of(EventKind::Offer).await;
    assert_eq!(offers.len(), 1);
    assert_eq!(offers[0].from.as_str(), "alice");
    assert!(t.machine.has_offer_in_flight());
    assert_eq!(t.machine.state(), NegotiationState::Negotiating);
    assert_eq!(
        t.connection.count_of(&ConnectionCall::AddTrack("audio-0".into())).await,
        1
    );
}

#[tokio::test]
async fn test_remote_answer_completes_offer() {
    init_tracing();

    let mut t = create_test_machine("alice");
    t.machine.start().await.unwrap();
    t.machine.on_negotiation_needed().await;

    t.machine.on_signaling_message(remote_answer("bob")).await;

    assert!(!t.machine.has_offer_in_flight());
    assert!(t.machine.has_remote_description());
    assert_eq!(t.machine.state(), NegotiationState::Connected);
    assert_eq!(
        t.connection.count_of(&ConnectionCall::SetRemote(SdpType::Answer)).await,
        1
    );
}

#[tokio::test]
async fn test_negotiation_needed_during_offer_is_coalesced() {
    init_tracing();

    let mut t = create_test_machine("alice");
    t.machine.start().await.unwrap();
    t.machine.on_negotiation_needed().await;

    t.machine.on_negotiation_needed().await;
    t.machine.on_negotiation_needed().await;
    assert_eq!(t.signaling.sent_of(EventKind::Offer).await.len(), 1);

    t.machine.on_signaling_message(remote_answer("bob")).await;

    assert_eq!(t.signaling.sent_of(EventKind::Offer).await.len(), 2);
    assert!(t.machine.has_offer_in_flight());

    t.machine.on_signaling_message(remote_answer("bob")).await;
    assert_eq!(t.signaling.sent_of(EventKind::Offer).await.len(), 2);
    assert!(!t.machine.has_offer_in_flight());
}

#[tokio::test]
async fn test_rejected_answer_releases_deferred_offer() {
    init_tracing();

    let mut t = create_test_machine("alice");
    t.machine.start().await.unwrap();
    t.machine.on_negotiation_needed().await;
    t.machine.on_negotiation_needed().await;

    t.connection.reject_remote_descriptions().await;
    t.machine.on_signaling_message(remote_answer("bob")).await;

    assert!(!t.machine.has_remote_description());
    assert_eq!(t.signaling.sent_of(EventKind::Offer).await.len(), 2);
}

#[tokio::test]
async fn test_answer_without_outstanding_offer_is_dropped() {
    init_tracing();

    let mut t = create_test_machine("alice");
    t.machine.start().await.unwrap();

    t.machine.on_signaling_message(remote_answer("bob")).await;

    assert!(t.connection.calls().await.is_empty());
    assert_eq!(t.machine.state(), NegotiationState::Joining);
    assert!(!t.machine.is_closed());
}

#[tokio::test]
async fn test_rejected_remote_offer_abandons_local_offer() {
    init_tracing();

    let mut t = create_test_machine("alice");
    t.machine.start().await.unwrap();
    t.machine.on_negotiation_needed().await;

    // The connection sits in have-local-offer and refuses the remote offer.
    t.machine.on_signaling_message(remote_offer("bob")).await;

    assert!(t.signaling.sent_of(EventKind::Answer).await.is_empty());
    assert!(!t.machine.has_offer_in_flight());
    assert!(!t.machine.has_remote_description());

    t.machine.on_negotiation_needed().await;
    assert_eq!(t.signaling.sent_of(EventKind::Offer).await.len(), 2);
    assert!(t.machine.has_offer_in_flight());
}

#[tokio::test]
async fn test_rejected_remote_offer_fires_deferred_negotiation() {
    init_tracing();

    let mut t = create_test_machine("alice");
    t.machine.start().await.unwrap();
    t.machine.on_negotiation_needed().await;
    t.machine.on_negotiation_needed().await;

    t.machine.on_signaling_message(remote_offer("bob")).await;

    assert!(t.signaling.sent_of(EventKind::Answer).await.is_empty());
    assert_eq!(t.signaling.sent_of(EventKind::Offer).await.len(), 2);
    assert!(t.machine.has_offer_in_flight());

    // The replacement offer completes normally.
    t.machine.on_signaling_message(remote_answer("bob")).await;
    assert!(!t.machine.has_offer_in_flight());
    assert_eq!(t.machine.state(), NegotiationState::Connected);
}
