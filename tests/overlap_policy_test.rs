mod common;

use hospi_bridge::application::channels::NFC_CHANNEL;
use hospi_bridge::application::nfc_dispatcher::{CompletionStatus, DEFAULT_MAX_QUEUED, OverlapPolicy};
use hospi_bridge::domain::nfc::{NfcCompletion, NfcMode};
use hospi_bridge::domain::request::Request;
use hospi_bridge::domain::response::{Responder, Response};
use hospi_bridge::infrastructure::simulated_nfc::SimulatedNfcDevice;
use hospi_bridge::infrastructure::simulated_terminal::SimulatedTerminal;
use serde_json::json;
use std::time::Duration;

fn code(response: Response) -> String {
    match response {
        Response::Error { code, .. } => code,
        other => panic!("expected error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_reject_keeps_first_request() {
    let mut h = common::harness_with(OverlapPolicy::Reject, None, SimulatedTerminal::new());

    let (first, first_rx) = Responder::channel();
    h.bridge.router.dispatch(NFC_CHANNEL, Request::new("readTag"), first).await;
    let launch = h.launches.recv().await.unwrap();

    let second = h.bridge.router.call(NFC_CHANNEL, Request::new("eraseTag")).await;
    assert_eq!(code(second), "NFC_BUSY");
    assert!(h.launches.try_recv().is_err());

    h.bridge.nfc.complete(NfcCompletion::ok(&launch, "ROOM-101"));
    assert_eq!(first_rx.await.unwrap(), Response::Success(json!("ROOM-101")));
}

#[tokio::test]
async fn test_supersede_resolves_displaced_caller() {
    let mut h = common::harness_with(OverlapPolicy::Supersede, None, SimulatedTerminal::new());

    let (first, first_rx) = Responder::channel();
    h.bridge.router.dispatch(NFC_CHANNEL, Request::new("readTag"), first).await;
    let first_launch = h.launches.recv().await.unwrap();

    let (second, second_rx) = Responder::channel();
    h.bridge
        .router
        .dispatch(NFC_CHANNEL, Request::new("writeTag").arg("text", "B"), second)
        .await;
    let second_launch = h.launches.recv().await.unwrap();

    assert_eq!(code(first_rx.await.unwrap()), "NFC_SUPERSEDED");

    // The old operation reporting late must not hit the new caller.
    assert_eq!(
        h.bridge.nfc.complete(NfcCompletion::ok(&first_launch, "stale")),
        CompletionStatus::Dropped
    );

    h.bridge.nfc.complete(NfcCompletion::ok(&second_launch, "B"));
    assert_eq!(second_rx.await.unwrap(), Response::Success(json!("B")));
}

#[tokio::test]
async fn test_queue_launches_after_current_completes() {
    let mut h = common::harness_with(OverlapPolicy::Queue, None, SimulatedTerminal::new());

    let (first, first_rx) = Responder::channel();
    h.bridge.router.dispatch(NFC_CHANNEL, Request::new("readTag"), first).await;
    let first_launch = h.launches.recv().await.unwrap();

    let (second, second_rx) = Responder::channel();
    h.bridge.router.dispatch(NFC_CHANNEL, Request::new("eraseTag"), second).await;
    assert!(h.launches.try_recv().is_err());
    assert_eq!(h.bridge.nfc.queued(), 1);

    h.bridge.nfc.complete(NfcCompletion::ok(&first_launch, "one"));
    assert_eq!(first_rx.await.unwrap(), Response::Success(json!("one")));

    let second_launch = h.launches.recv().await.unwrap();
    assert_eq!(second_launch.mode, NfcMode::Erase);
    assert!(h.bridge.nfc.is_busy());
    assert_eq!(h.bridge.nfc.queued(), 0);

    h.bridge.nfc.complete(NfcCompletion::failed(&second_launch, "No tag detected"));
    assert_eq!(
        second_rx.await.unwrap(),
        Response::error("NFC_ERROR", "No tag detected")
    );
    assert!(!h.bridge.nfc.is_busy());
}

#[tokio::test(start_paused = true)]
async fn test_timeout_resolves_and_late_completion_is_dropped() {
    let mut h = common::harness_with(
        OverlapPolicy::Reject,
        Some(Duration::from_millis(500)),
        SimulatedTerminal::new(),
    );

    let (responder, rx) = Responder::channel();
    h.bridge.router.dispatch(NFC_CHANNEL, Request::new("readTag"), responder).await;
    let launch = h.launches.recv().await.unwrap();

    let response = rx.await.unwrap();
    assert_eq!(
        response,
        Response::error("NFC_TIMEOUT", "NFC operation timed out after 500 ms")
    );
    assert!(!h.bridge.nfc.is_busy());
    assert_eq!(
        h.bridge.nfc.complete(NfcCompletion::ok(&launch, "late")),
        CompletionStatus::Dropped
    );
}

#[tokio::test(start_paused = true)]
async fn test_completion_before_deadline_wins() {
    let mut h = common::harness_with(
        OverlapPolicy::Reject,
        Some(Duration::from_millis(500)),
        SimulatedTerminal::new(),
    );

    let (responder, rx) = Responder::channel();
    h.bridge.router.dispatch(NFC_CHANNEL, Request::new("readTag"), responder).await;
    let launch = h.launches.recv().await.unwrap();

    h.bridge.nfc.complete(NfcCompletion::ok(&launch, "fast"));
    assert_eq!(rx.await.unwrap(), Response::Success(json!("fast")));

    tokio::time::sleep(Duration::from_secs(1)).await;
    assert!(!h.bridge.nfc.is_busy());
}

#[tokio::test]
async fn test_queue_rejects_once_full() {
    let mut h = common::harness_with(OverlapPolicy::Queue, None, SimulatedTerminal::new());

    let (first, _first_rx) = Responder::channel();
    h.bridge.router.dispatch(NFC_CHANNEL, Request::new("readTag"), first).await;
    let first_launch = h.launches.recv().await.unwrap();

    let mut waiting = Vec::new();
    for _ in 0..DEFAULT_MAX_QUEUED {
        let (responder, rx) = Responder::channel();
        h.bridge.router.dispatch(NFC_CHANNEL, Request::new("readTag"), responder).await;
        waiting.push(rx);
    }
    assert_eq!(h.bridge.nfc.queued(), DEFAULT_MAX_QUEUED);

    let overflow = h.bridge.router.call(NFC_CHANNEL, Request::new("readTag")).await;
    assert_eq!(code(overflow), "NFC_BUSY");
    assert_eq!(h.bridge.nfc.queued(), DEFAULT_MAX_QUEUED);

    // Room frees up as soon as the head of the queue is promoted.
    h.bridge.nfc.complete(NfcCompletion::ok(&first_launch, "one"));
    assert_eq!(h.bridge.nfc.queued(), DEFAULT_MAX_QUEUED - 1);
    let (late, _late_rx) = Responder::channel();
    h.bridge.router.dispatch(NFC_CHANNEL, Request::new("readTag"), late).await;
    assert_eq!(h.bridge.nfc.queued(), DEFAULT_MAX_QUEUED);
}

#[tokio::test]
async fn test_superseded_write_never_reaches_the_tag() {
    let h = common::harness_with(OverlapPolicy::Supersede, None, SimulatedTerminal::new());
    let nfc = h.bridge.nfc.clone();
    let device = tokio::spawn(SimulatedNfcDevice::with_tag("ROOM-101").run(h.launches, nfc));

    // Both submissions land before the device task gets to run.
    let (write, write_rx) = Responder::channel();
    h.bridge
        .router
        .dispatch(NFC_CHANNEL, Request::new("writeTag").arg("text", "HIJACKED"), write)
        .await;
    let (read, read_rx) = Responder::channel();
    h.bridge.router.dispatch(NFC_CHANNEL, Request::new("readTag"), read).await;

    assert_eq!(code(write_rx.await.unwrap()), "NFC_SUPERSEDED");
    assert_eq!(read_rx.await.unwrap(), Response::Success(json!("ROOM-101")));

    let again = h.bridge.router.call(NFC_CHANNEL, Request::new("readTag")).await;
    assert_eq!(again, Response::Success(json!("ROOM-101")));
    device.abort();
}
