//! Notes synchronization engine
//!
//! Turns resolver decisions into editor state changes. Fetches run as
//! spawned tasks tagged with a monotonically increasing sequence number;
//! a single apply step consumes their completions and discards anything
//! superseded by a newer fetch or by an engaged lock. All state lives here,
//! mutated only on the session loop's timeline.

use crate::context::ContextSource;
use crate::error::Result;
use crate::resolver::resolve;
use crate::store::NotesStore;
use crate::surface::EditorSurface;
use crate::types::{Context, IgnoreList, LockState, Note, Resolution, SessionState, ERROR_SENTINEL};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Completion of a spawned fetch, tagged for the staleness check
#[derive(Debug)]
pub struct FetchCompletion {
    /// Sequence number assigned when the fetch was issued
    pub seq: u64,

    /// Context the fetch was issued for
    pub context: Context,

    /// Whether a successful apply should advance `last_valid`.
    /// True only for fetches originating from a `Display` decision.
    pub record_valid: bool,

    /// What the store returned
    pub result: Result<Vec<Note>>,
}

/// Orchestrates fetching and clearing editor content for resolved contexts
pub struct NotesSync<E: EditorSurface> {
    store: Arc<dyn NotesStore>,
    source: Arc<dyn ContextSource>,
    editor: E,
    ignore: IgnoreList,
    state: SessionState,
    seq: u64,
    completions: mpsc::Sender<FetchCompletion>,
}

impl<E: EditorSurface> NotesSync<E> {
    pub fn new(
        store: Arc<dyn NotesStore>,
        source: Arc<dyn ContextSource>,
        editor: E,
        ignore: IgnoreList,
        completions: mpsc::Sender<FetchCompletion>,
    ) -> Self {
        Self {
            store,
            source,
            editor,
            ignore,
            state: SessionState::default(),
            seq: 0,
            completions,
        }
    }

    /// Current session state
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// The editor surface being synchronized
    pub fn editor(&self) -> &E {
        &self.editor
    }

    /// Entry point for a context-change signal.
    ///
    /// Resolves the signal against current state and either issues a fetch,
    /// clears the editor, or leaves everything alone.
    pub fn handle_context_change(&mut self, incoming: Option<&str>) {
        match resolve(incoming, &self.state, &self.ignore) {
            Resolution::Display(context) => {
                debug!("Context updated to: {}", context);
                self.dispatch_fetch(context, true);
            }
            Resolution::FallBack(context) => {
                warn!(
                    "Context unusable ({}); falling back to {}",
                    incoming.unwrap_or("absent"),
                    context
                );
                self.dispatch_fetch(context, false);
            }
            Resolution::Hold => {
                debug!(
                    "Notes locked to {}; ignoring context update",
                    self.state
                        .lock
                        .locked_context()
                        .map(Context::as_str)
                        .unwrap_or_default()
                );
            }
            Resolution::Clear => {
                warn!("No valid context to fall back to; clearing editor");
                self.editor.clear();
                self.editor.set_active_context(None);
            }
        }
    }

    /// Issue a fetch for the context as a spawned task.
    ///
    /// Each fetch gets the next sequence number; the apply step only honors
    /// the completion carrying the latest one.
    fn dispatch_fetch(&mut self, context: Context, record_valid: bool) {
        self.seq += 1;
        let seq = self.seq;
        let store = Arc::clone(&self.store);
        let completions = self.completions.clone();

        tokio::spawn(async move {
            let result = store.fetch_notes(&context).await;
            // A closed channel means the session loop is gone; nothing to do.
            let _ = completions
                .send(FetchCompletion {
                    seq,
                    context,
                    record_valid,
                    result,
                })
                .await;
        });
    }

    /// Apply step for fetch completions.
    ///
    /// Discards the completion when a newer fetch has been issued since, or
    /// when the session locked while it was in flight. A discarded failure
    /// is not logged as one; the request it belonged to no longer matters.
    pub fn apply_completion(&mut self, completion: FetchCompletion) {
        if completion.seq != self.seq {
            debug!(
                "Discarding stale fetch result for {} (seq {}, now at {})",
                completion.context, completion.seq, self.seq
            );
            return;
        }
        if self.state.lock.is_locked() {
            debug!(
                "Lock engaged while fetch for {} was in flight; discarding",
                completion.context
            );
            return;
        }

        match completion.result {
            Ok(notes) => {
                if notes.is_empty() {
                    self.editor.clear();
                } else {
                    let combined: String = notes
                        .iter()
                        .map(|note| note.content.as_str())
                        .collect();
                    self.editor.set_content(&combined);
                }
                self.editor.set_active_context(Some(completion.context.clone()));
                if completion.record_valid {
                    self.state.last_valid = Some(completion.context);
                }
            }
            Err(err) => {
                warn!(
                    "Failed to fetch notes for {}: {}",
                    completion.context, err
                );
                self.editor.clear();
            }
        }
    }

    /// Toggle the context lock.
    ///
    /// Locking freezes the editor to the currently displayed context;
    /// without one the request is ignored. Unlocking re-resolves against
    /// whatever context is currently known.
    pub async fn toggle_lock(&mut self) {
        match &self.state.lock {
            LockState::Unlocked => match self.editor.active_context() {
                Some(context) => {
                    info!("Notes locked to context: {}", context);
                    self.state.lock = LockState::Locked(context);
                }
                None => warn!("No context is displayed; lock request ignored"),
            },
            LockState::Locked(context) => {
                info!("Notes unlocked from {}; resuming dynamic updates", context);
                self.state.lock = LockState::Unlocked;
                self.resync().await;
            }
        }
    }

    /// Re-resolve the current context on demand
    pub async fn refresh(&mut self) {
        debug!("Refreshing current context");
        self.resync().await;
    }

    /// Persist edited content for the currently displayed context.
    ///
    /// Save failures are absorbed; a later fetch simply shows the backend's
    /// last accepted state.
    pub async fn save(&mut self, content: String) {
        let Some(context) = self.editor.active_context() else {
            warn!("Context is missing; unable to save notes");
            return;
        };

        self.editor.set_content(&content);
        match self.store.save_notes(&context, &[content]).await {
            Ok(()) => debug!("Notes updated for context: {}", context),
            Err(err) => warn!("Failed to update notes for {}: {}", context, err),
        }
    }

    /// One-time resolution against the context source, used after unlocking
    /// and for manual refreshes. Source failures become the error sentinel
    /// so resolution falls back rather than erroring out.
    async fn resync(&mut self) {
        let incoming = match self.source.current_context().await {
            Ok(context) => context,
            Err(err) => {
                warn!("Context probe failed during resync: {}", err);
                ERROR_SENTINEL.to_string()
            }
        };
        self.handle_context_change(Some(&incoming));
    }
}
