//! Notes persistence layer
//!
//! Provides the abstraction over the notes backend and its HTTP
//! implementation. The sync engine only ever talks to the backend through
//! [`NotesStore`].

pub mod http;

use crate::error::Result;
use crate::types::{Context, ContextNotes, Note};
use async_trait::async_trait;

/// Backend store trait defining the notes contract
#[async_trait]
pub trait NotesStore: Send + Sync {
    /// Fetch the notes stored for a context, in display order.
    ///
    /// A context with no notes yet yields an empty vector; that is a valid
    /// empty state, not an error. Errors mean the backend could not be
    /// reached or rejected the request.
    async fn fetch_notes(&self, context: &Context) -> Result<Vec<Note>>;

    /// Replace the notes stored for a context.
    ///
    /// An empty slice removes every note for the context.
    async fn save_notes(&self, context: &Context, notes: &[String]) -> Result<()>;

    /// List every stored context together with its notes
    async fn list_all(&self) -> Result<Vec<ContextNotes>>;

    /// Delete a single note by its backend-assigned id
    async fn delete_note(&self, context: &Context, note_id: i64) -> Result<()>;
}
