//! Anamnesis - Context-Following Notes Client
//!
//! Keeps a rich-text note editor synchronized with the user's externally
//! detected context (the active application or window), persisting and
//! retrieving notes from a backend store keyed by that context.
//!
//! # Architecture
//!
//! The core is small and deliberately separated from its I/O shells:
//! - **Resolver**: pure decision logic for every context-change signal
//!   (display, hold while locked, fall back, or clear)
//! - **Sync**: turns decisions into editor changes, discarding fetch
//!   results superseded by newer fetches or an engaged lock
//! - **Store / Surface / Context**: narrow seams over the HTTP backend,
//!   the editor widget, and active-window detection
//!
//! # Example
//!
//! ```ignore
//! use anamnesis_core::{AnamnesisConfig, HttpNotesStore, NotesStore};
//!
//! #[tokio::main]
//! async fn main() -> anamnesis_core::Result<()> {
//!     let config = AnamnesisConfig::load(None)?;
//!     let store = HttpNotesStore::new(&config.backend_base_url);
//!     let notes = store.fetch_notes(&"Editor:ProjectX".into()).await?;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod context;
pub mod error;
pub mod ipc;
pub mod resolver;
pub mod session;
pub mod store;
pub mod surface;
pub mod sync;
pub mod types;

// Re-export commonly used types
pub use config::AnamnesisConfig;
pub use context::{
    derive_context, ActiveWindow, CommandWindowProbe, ContextMonitor, ContextSource,
    WindowContextSource, WindowProbe,
};
pub use error::{AnamnesisError, Result};
pub use resolver::resolve;
pub use session::{Session, SessionEvent, SessionStatus};
pub use store::{http::HttpNotesStore, NotesStore};
pub use surface::{BufferSurface, EditorSurface};
pub use sync::{FetchCompletion, NotesSync};
pub use types::{
    Context, ContextNotes, IgnoreList, LockState, Note, Resolution, SessionState, StoredNote,
    ERROR_SENTINEL,
};
