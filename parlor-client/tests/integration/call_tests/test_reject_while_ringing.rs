use crate::init_tracing;
use crate::utils::{SIGNAL_TIMEOUT_MS, TestClient, join};
use parlor_client::{CallEndReason, CallPhase, Notification};
use parlor_core::{PeerName, SessionDescription, SignalMessage};

/// Rejecting while ringing never creates a peer connection and lands back in
/// the room, with `callRejected` routed to the caller.
#[tokio::test]
async fn test_reject_while_ringing() {
    init_tracing();

    let bob = TestClient::spawn();
    join(&bob, "ram", "bob").await.expect("join");

    bob.deliver(SignalMessage::VideoOffer {
        offer: SessionDescription::new("remote-offer-sdp"),
        room: "ram".to_owned(),
        user_to_call: PeerName::from("bob"),
        caller: PeerName::from("alice"),
    })
    .await;

    bob.wait_for_notification(
        |n| matches!(n, Notification::IncomingCall { from } if *from == PeerName::from("alice")),
        SIGNAL_TIMEOUT_MS,
    )
    .await
    .expect("never rang");

    bob.handle.reject_call().await.expect("reject");

    let rejected = bob
        .transport
        .wait_for(
            |m| matches!(m, SignalMessage::CallRejected { .. }),
            SIGNAL_TIMEOUT_MS,
        )
        .await
        .expect("no callRejected emitted");
    match rejected {
        SignalMessage::CallRejected { caller, room } => {
            assert_eq!(caller, PeerName::from("alice"));
            assert_eq!(room, "ram");
        }
        _ => unreachable!(),
    }

    bob.wait_for_notification(
        |n| matches!(n, Notification::CallEnded { reason: CallEndReason::Rejected }),
        SIGNAL_TIMEOUT_MS,
    )
    .await
    .expect("no call-ended notification");

    // Back in the room after the ring, not just from the initial join.
    let notifications = bob.notifications().await;
    let ringing_at = notifications
        .iter()
        .position(|n| matches!(n, Notification::CallStatusChanged(CallPhase::RingingReceived)))
        .expect("ringing phase never reported");
    assert!(
        notifications[ringing_at..]
            .iter()
            .any(|n| matches!(n, Notification::CallStatusChanged(CallPhase::InRoom))),
        "never returned to in-room after reject"
    );
    assert_eq!(
        bob.connector.created().await,
        0,
        "reject must never create a peer connection"
    );
}
