//! Shared test doubles for the sync and session tests

use anamnesis_core::error::{AnamnesisError, Result};
use anamnesis_core::{Context, ContextNotes, ContextSource, Note, NotesStore};
use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use tokio::sync::oneshot;

/// Notes store whose fetches block until the test resolves them.
///
/// Lets tests control completion order to exercise overlapping fetches.
/// Saves are recorded for inspection.
#[derive(Default)]
pub struct ManualStore {
    pending: Mutex<HashMap<String, VecDeque<oneshot::Sender<Result<Vec<Note>>>>>>,
    saves: Mutex<Vec<(String, Vec<String>)>>,
}

impl ManualStore {
    /// Number of unresolved fetches for a context
    pub fn pending_count(&self, context: &str) -> usize {
        self.pending
            .lock()
            .unwrap()
            .get(context)
            .map(VecDeque::len)
            .unwrap_or(0)
    }

    /// Resolve the oldest unresolved fetch for a context
    pub fn resolve_next(&self, context: &str, result: Result<Vec<Note>>) {
        let sender = self
            .pending
            .lock()
            .unwrap()
            .get_mut(context)
            .and_then(VecDeque::pop_front)
            .unwrap_or_else(|| panic!("no pending fetch for context '{}'", context));
        let _ = sender.send(result);
    }

    /// Save calls seen so far, as (context, notes) pairs
    pub fn saves(&self) -> Vec<(String, Vec<String>)> {
        self.saves.lock().unwrap().clone()
    }
}

#[async_trait]
impl NotesStore for ManualStore {
    async fn fetch_notes(&self, context: &Context) -> Result<Vec<Note>> {
        let (tx, rx) = oneshot::channel();
        self.pending
            .lock()
            .unwrap()
            .entry(context.as_str().to_string())
            .or_default()
            .push_back(tx);

        rx.await
            .unwrap_or_else(|_| Err(AnamnesisError::Other("test store dropped".to_string())))
    }

    async fn save_notes(&self, context: &Context, notes: &[String]) -> Result<()> {
        self.saves
            .lock()
            .unwrap()
            .push((context.as_str().to_string(), notes.to_vec()));
        Ok(())
    }

    async fn list_all(&self) -> Result<Vec<ContextNotes>> {
        Ok(Vec::new())
    }

    async fn delete_note(&self, _context: &Context, _note_id: i64) -> Result<()> {
        Ok(())
    }
}

/// Context source reporting a fixed context
pub struct FixedSource(pub String);

#[async_trait]
impl ContextSource for FixedSource {
    async fn current_context(&self) -> Result<String> {
        Ok(self.0.clone())
    }
}

pub fn note(content: &str) -> Note {
    Note {
        content: content.to_string(),
    }
}

/// Yield to the runtime until the condition holds
pub async fn wait_until(mut condition: impl FnMut() -> bool) {
    for _ in 0..1000 {
        if condition() {
            return;
        }
        tokio::task::yield_now().await;
    }
    panic!("condition was not reached");
}
