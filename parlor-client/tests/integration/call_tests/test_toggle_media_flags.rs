use crate::init_tracing;
use crate::utils::{SIGNAL_TIMEOUT_MS, TestClient, join};
use parlor_client::Notification;

#[tokio::test]
async fn test_toggle_media_flags() {
    init_tracing();

    let alice = TestClient::spawn();
    join(&alice, "ram", "alice").await.expect("join");

    alice.handle.toggle_mute().await.expect("mute");
    alice
        .wait_for_notification(
            |n| matches!(n, Notification::LocalMediaChanged { audio: false, video: true }),
            SIGNAL_TIMEOUT_MS,
        )
        .await
        .expect("mute not reflected");

    alice.handle.toggle_video().await.expect("video off");
    alice
        .wait_for_notification(
            |n| matches!(n, Notification::LocalMediaChanged { audio: false, video: false }),
            SIGNAL_TIMEOUT_MS,
        )
        .await
        .expect("camera toggle not reflected");

    alice.handle.toggle_mute().await.expect("unmute");
    alice
        .wait_for_notification(
            |n| matches!(n, Notification::LocalMediaChanged { audio: true, video: false }),
            SIGNAL_TIMEOUT_MS,
        )
        .await
        .expect("unmute not reflected");
}
