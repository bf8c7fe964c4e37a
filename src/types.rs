//! Core data types for the Anamnesis notes client
//!
//! This module defines the fundamental data structures used throughout
//! anamnesis: contexts, notes, the ignore list, and the per-session state
//! driving context resolution.

use serde::{Deserialize, Serialize};

/// Distinguished context value meaning context retrieval failed upstream.
///
/// Treated as absent by the resolver, never displayed or recorded.
pub const ERROR_SENTINEL: &str = "Error retrieving context";

/// Identifying string for the user's current activity
///
/// Wraps the raw string (typically a derived window title) to provide type
/// safety and prevent mixing contexts with other strings in the system. No
/// internal structure is assumed beyond substring checks against the ignore
/// list.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Context(String);

impl Context {
    /// Create a context from a raw string
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Borrow the raw context string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Context {
    fn from(raw: &str) -> Self {
        Self(raw.to_string())
    }
}

impl From<String> for Context {
    fn from(raw: String) -> Self {
        Self(raw)
    }
}

impl std::fmt::Display for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single note as returned by the backend for a context
///
/// A context maps to an ordered sequence of notes; the editor displays their
/// contents concatenated in server-return order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    /// Note content (HTML or plain text, opaque to the client)
    pub content: String,
}

/// A note with its backend-assigned identifier, as returned by the
/// all-notes listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredNote {
    pub id: i64,
    pub content: String,
}

/// All notes stored for one context
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextNotes {
    pub context: Context,
    pub notes: Vec<StoredNote>,
}

/// Configured set of substrings marking contexts to be treated as noise
///
/// A context is ignored if it contains any member as a plain case-sensitive
/// substring.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IgnoreList(Vec<String>);

impl IgnoreList {
    pub fn new(entries: Vec<String>) -> Self {
        Self(entries)
    }

    /// Whether the context contains any ignored substring
    pub fn matches(&self, context: &str) -> bool {
        self.0.iter().any(|entry| context.contains(entry.as_str()))
    }
}

impl From<Vec<String>> for IgnoreList {
    fn from(entries: Vec<String>) -> Self {
        Self(entries)
    }
}

/// Whether the user has frozen the editor to one context
///
/// The locked context is carried in the variant itself, so a locked state
/// without a context is unrepresentable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum LockState {
    #[default]
    Unlocked,
    Locked(Context),
}

impl LockState {
    pub fn is_locked(&self) -> bool {
        matches!(self, LockState::Locked(_))
    }

    /// The context the editor is frozen to, if any
    pub fn locked_context(&self) -> Option<&Context> {
        match self {
            LockState::Locked(context) => Some(context),
            LockState::Unlocked => None,
        }
    }
}

/// Mutable session state consulted by the resolver
///
/// Owned by [`NotesSync`](crate::sync::NotesSync) and passed explicitly
/// through resolution, never held as ambient globals. Lives for the duration
/// of the editor session; nothing is persisted across restarts.
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    /// Current lock state
    pub lock: LockState,

    /// Most recent context that was displayed successfully
    ///
    /// Absent until the first successful display. Never updated on fallback
    /// or on a failed fetch.
    pub last_valid: Option<Context>,
}

/// Outcome of resolving an incoming context signal
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Load and display notes for the incoming context
    Display(Context),

    /// Editor is locked; leave displayed notes untouched
    Hold,

    /// Incoming signal is unusable; redisplay the last valid context
    FallBack(Context),

    /// Nothing usable to display; empty the editor
    Clear,
}
