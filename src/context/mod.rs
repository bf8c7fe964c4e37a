//! Context detection layer
//!
//! Provides the abstraction over "where the user currently is" and its
//! implementations: deriving a display context from active-window
//! observations and polling for changes.

pub mod derive;
pub mod monitor;
pub mod probe;

use crate::error::Result;
use async_trait::async_trait;

pub use derive::{derive_context, ActiveWindow, UNKNOWN_CONTEXT};
pub use monitor::ContextMonitor;
pub use probe::{CommandWindowProbe, WindowContextSource, WindowProbe};

/// On-demand view of the user's current context
///
/// Implementations report the freshest context they can; they never return
/// the error sentinel themselves. Mapping failures onto the sentinel happens
/// at the session boundary.
#[async_trait]
pub trait ContextSource: Send + Sync {
    async fn current_context(&self) -> Result<String>;
}
