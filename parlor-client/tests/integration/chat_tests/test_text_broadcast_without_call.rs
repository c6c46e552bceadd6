use crate::init_tracing;
use crate::utils::{SIGNAL_TIMEOUT_MS, TestClient, join};
use parlor_client::Notification;
use parlor_core::{PeerName, SignalMessage};

/// Chat works with no call session anywhere in sight, and the receiver's own
/// history ordering is untouched by remote traffic.
#[tokio::test]
async fn test_text_broadcast_without_call() {
    init_tracing();

    let alice = TestClient::spawn();
    let bob = TestClient::spawn();
    join(&alice, "ram", "alice").await.expect("alice join");
    join(&bob, "ram", "bob").await.expect("bob join");

    // Bob has local history of his own first.
    bob.handle.send_text("i was here first").await.expect("send");

    alice.handle.send_text("hello").await.expect("send");

    // Optimistic append on the sender side, before any relay echo.
    let history = alice.handle.chat_history().await;
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].sender, PeerName::from("alice"));
    assert_eq!(history[0].text, "hello");

    let broadcast = alice
        .transport
        .wait_for(|m| matches!(m, SignalMessage::Chat { .. }), SIGNAL_TIMEOUT_MS)
        .await
        .expect("chat not emitted");
    bob.deliver(broadcast).await;

    let received = bob
        .wait_for_notification(
            |n| matches!(n, Notification::ChatReceived(m) if m.text == "hello"),
            SIGNAL_TIMEOUT_MS,
        )
        .await
        .expect("chat not delivered");
    match received {
        Notification::ChatReceived(message) => {
            assert_eq!(message.sender, PeerName::from("alice"));
        }
        _ => unreachable!(),
    }

    let bob_history = bob.handle.chat_history().await;
    let texts: Vec<_> = bob_history.iter().map(|m| m.text.as_str()).collect();
    assert_eq!(texts, vec!["i was here first", "hello"]);

    assert_eq!(
        alice.connector.created().await + bob.connector.created().await,
        0,
        "messaging must not touch the call machinery"
    );
}
