use crate::init_tracing;
use crate::utils::{SIGNAL_TIMEOUT_MS, TestClient, join};
use parlor_client::{ClientError, Notification};
use parlor_core::{ConnectionId, PeerName, SignalMessage};

#[tokio::test]
async fn test_join_tracks_membership() {
    init_tracing();

    let alice = TestClient::spawn();

    // Empty room names are refused before anything hits the wire.
    alice.handle.join_room("", "alice").await.expect("intent send");
    alice
        .wait_for_notification(
            |n| matches!(n, Notification::Error(ClientError::EmptyRoomName)),
            SIGNAL_TIMEOUT_MS,
        )
        .await
        .expect("empty room name not refused");
    assert!(alice.transport.sent().await.is_empty());

    join(&alice, "ram", "alice").await.expect("join");
    let joined = alice
        .transport
        .wait_for(
            |m| matches!(m, SignalMessage::JoinRoom { .. }),
            SIGNAL_TIMEOUT_MS,
        )
        .await
        .expect("joinRoom not emitted");
    match joined {
        SignalMessage::JoinRoom { room, user } => {
            assert_eq!(room, "ram");
            assert_eq!(user, PeerName::from("alice"));
        }
        _ => unreachable!(),
    }

    // Another participant appears; a duplicate notification for the same
    // connection id is deduped.
    let bob_id = ConnectionId::new();
    alice
        .deliver(SignalMessage::UserJoined {
            user: PeerName::from("bob"),
            id: bob_id,
        })
        .await;
    alice
        .wait_for_notification(
            |n| {
                matches!(
                    n,
                    Notification::ParticipantsChanged(members)
                        if members.iter().any(|p| p.name == PeerName::from("bob"))
                )
            },
            SIGNAL_TIMEOUT_MS,
        )
        .await
        .expect("membership change not surfaced");

    alice
        .deliver(SignalMessage::UserJoined {
            user: PeerName::from("bob"),
            id: bob_id,
        })
        .await;
    tokio::time::sleep(std::time::Duration::from_millis(50)).await;

    assert_eq!(alice.handle.current_members().len(), 1);

    // A second join while already in a room is refused.
    alice.handle.join_room("other", "alice").await.expect("intent send");
    alice
        .wait_for_notification(
            |n| matches!(n, Notification::Error(ClientError::AlreadyInRoom)),
            SIGNAL_TIMEOUT_MS,
        )
        .await
        .expect("double join not refused");
}
