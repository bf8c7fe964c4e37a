//! End-to-end session loop test
//!
//! Drives a real `Session` through the event channel the monitor and the
//! control server normally feed, checking observable state via status
//! snapshots.

mod common;

use anamnesis_core::{
    BufferSurface, IgnoreList, NotesSync, Session, SessionEvent, SessionStatus,
};
use common::{note, wait_until, FixedSource, ManualStore};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};

async fn status_of(events: &mpsc::Sender<SessionEvent>) -> SessionStatus {
    let (tx, rx) = oneshot::channel();
    events.send(SessionEvent::Status(tx)).await.unwrap();
    tokio::time::timeout(Duration::from_secs(1), rx)
        .await
        .expect("timed out waiting for status")
        .expect("session dropped the status request")
}

#[tokio::test]
async fn test_session_displays_locks_and_unlocks() {
    let store = Arc::new(ManualStore::default());
    let (event_tx, event_rx) = mpsc::channel(16);
    let (completion_tx, completion_rx) = mpsc::channel(16);

    let sync = NotesSync::new(
        Arc::clone(&store) as Arc<dyn anamnesis_core::NotesStore>,
        Arc::new(FixedSource("Editor:ProjectY".to_string())),
        BufferSurface::default(),
        IgnoreList::default(),
        completion_tx,
    );
    let session = Session::new(sync, event_rx, completion_rx);
    let handle = tokio::spawn(session.run());

    // Display a first context.
    event_tx
        .send(SessionEvent::ContextChanged("Editor:ProjectX".to_string()))
        .await
        .unwrap();
    wait_until(|| store.pending_count("Editor:ProjectX") == 1).await;
    store.resolve_next("Editor:ProjectX", Ok(vec![note("<p>x</p>")]));

    wait_until_status(&event_tx, |status| {
        status.active_context == Some("Editor:ProjectX".into())
    })
    .await;

    // Lock, then watch a context change get held.
    event_tx.send(SessionEvent::ToggleLock).await.unwrap();
    event_tx
        .send(SessionEvent::ContextChanged("Terminal:bash".to_string()))
        .await
        .unwrap();

    let status = status_of(&event_tx).await;
    assert!(status.locked);
    assert_eq!(status.locked_context, Some("Editor:ProjectX".into()));
    assert_eq!(status.active_context, Some("Editor:ProjectX".into()));
    assert_eq!(store.pending_count("Terminal:bash"), 0);

    // Unlock: the session re-resolves against the source's current context.
    event_tx.send(SessionEvent::ToggleLock).await.unwrap();
    wait_until(|| store.pending_count("Editor:ProjectY") == 1).await;
    store.resolve_next("Editor:ProjectY", Ok(Vec::new()));

    wait_until_status(&event_tx, |status| {
        status.active_context == Some("Editor:ProjectY".into()) && !status.locked
    })
    .await;

    event_tx.send(SessionEvent::Shutdown).await.unwrap();
    tokio::time::timeout(Duration::from_secs(1), handle)
        .await
        .expect("session did not shut down")
        .unwrap();
}

async fn wait_until_status(
    events: &mpsc::Sender<SessionEvent>,
    accept: impl Fn(&SessionStatus) -> bool,
) {
    for _ in 0..100 {
        if accept(&status_of(events).await) {
            return;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    panic!("session never reached the expected status");
}
