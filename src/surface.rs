//! Editor surface abstraction
//!
//! The sync engine treats the rich-text widget as opaque storage for the
//! currently displayed content and the context tag it was loaded for, never
//! inspecting its internals.

use crate::types::Context;

/// Capability set of the rich-text widget
pub trait EditorSurface: Send {
    /// Replace the displayed content
    fn set_content(&mut self, content: &str);

    /// Empty the displayed content
    fn clear(&mut self);

    /// Currently displayed content
    fn content(&self) -> &str;

    /// Context tag the displayed content was loaded for, if any
    fn active_context(&self) -> Option<Context>;

    /// Record which context the displayed content belongs to
    fn set_active_context(&mut self, context: Option<Context>);
}

/// In-process editor surface holding content and context tag in memory
///
/// Stands in for an attached rich-text widget when running headless, and
/// doubles as the surface used by tests.
#[derive(Debug, Default)]
pub struct BufferSurface {
    content: String,
    context: Option<Context>,
}

impl EditorSurface for BufferSurface {
    fn set_content(&mut self, content: &str) {
        self.content.clear();
        self.content.push_str(content);
    }

    fn clear(&mut self) {
        self.content.clear();
    }

    fn content(&self) -> &str {
        &self.content
    }

    fn active_context(&self) -> Option<Context> {
        self.context.clone()
    }

    fn set_active_context(&mut self, context: Option<Context>) {
        self.context = context;
    }
}
