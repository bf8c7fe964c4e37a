//! Editor session loop
//!
//! One task owns the sync engine and drains two channels: external events
//! (context changes, lock toggles, edits, control commands) and fetch
//! completions. Everything that mutates session state happens here, on a
//! single logical timeline.

use crate::surface::EditorSurface;
use crate::sync::{FetchCompletion, NotesSync};
use crate::types::Context;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::{mpsc, oneshot};
use tracing::info;

/// Events consumed by the session loop
#[derive(Debug)]
pub enum SessionEvent {
    /// The externally observed context changed
    ContextChanged(String),

    /// User toggled the context lock
    ToggleLock,

    /// User asked for the current context to be re-resolved
    Refresh,

    /// Editor content changed and should be persisted
    EditorChanged(String),

    /// Status snapshot request
    Status(oneshot::Sender<SessionStatus>),

    /// Stop the session loop
    Shutdown,
}

/// Point-in-time snapshot of a running session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionStatus {
    pub locked: bool,
    pub locked_context: Option<Context>,
    pub active_context: Option<Context>,
    pub last_valid_context: Option<Context>,
    pub started_at: DateTime<Utc>,
}

/// The session loop driving a [`NotesSync`]
pub struct Session<E: EditorSurface> {
    sync: NotesSync<E>,
    events: mpsc::Receiver<SessionEvent>,
    completions: mpsc::Receiver<FetchCompletion>,
    started_at: DateTime<Utc>,
}

impl<E: EditorSurface> Session<E> {
    pub fn new(
        sync: NotesSync<E>,
        events: mpsc::Receiver<SessionEvent>,
        completions: mpsc::Receiver<FetchCompletion>,
    ) -> Self {
        Self {
            sync,
            events,
            completions,
            started_at: Utc::now(),
        }
    }

    /// Drain events and fetch completions until shutdown.
    ///
    /// The sync engine keeps a completion sender alive, so the completions
    /// channel never closes while the session runs.
    pub async fn run(mut self) {
        info!("Session loop started");

        loop {
            tokio::select! {
                Some(completion) = self.completions.recv() => {
                    self.sync.apply_completion(completion);
                }
                event = self.events.recv() => match event {
                    Some(SessionEvent::ContextChanged(context)) => {
                        self.sync.handle_context_change(Some(&context));
                    }
                    Some(SessionEvent::ToggleLock) => self.sync.toggle_lock().await,
                    Some(SessionEvent::Refresh) => self.sync.refresh().await,
                    Some(SessionEvent::EditorChanged(content)) => self.sync.save(content).await,
                    Some(SessionEvent::Status(reply)) => {
                        let _ = reply.send(self.status());
                    }
                    Some(SessionEvent::Shutdown) | None => break,
                }
            }
        }

        info!("Session loop stopped");
    }

    fn status(&self) -> SessionStatus {
        let state = self.sync.state();
        SessionStatus {
            locked: state.lock.is_locked(),
            locked_context: state.lock.locked_context().cloned(),
            active_context: self.sync.editor().active_context(),
            last_valid_context: state.last_valid.clone(),
            started_at: self.started_at,
        }
    }
}
