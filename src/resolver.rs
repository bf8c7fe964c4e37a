//! Context resolution
//!
//! Pure decision logic mapping an incoming context signal onto the next
//! editor action. No I/O happens here; recording a newly displayed context
//! into [`SessionState`] is the caller's responsibility, performed only
//! after the `Display` branch fetches successfully.

use crate::types::{Context, IgnoreList, Resolution, SessionState, ERROR_SENTINEL};

/// Decide what to display for an incoming context signal.
///
/// Ordered rules, first match wins:
///
/// 1. Locked editor holds its current notes, whatever the signal says.
/// 2. An ignored context falls back to the last valid context, or clears
///    the editor when there is no history to recover.
/// 3. A present, non-sentinel context is displayed.
/// 4. Anything else (absent signal or the error sentinel) falls back, or
///    clears without history.
///
/// An empty incoming string is treated as absent.
pub fn resolve(
    incoming: Option<&str>,
    state: &SessionState,
    ignore: &IgnoreList,
) -> Resolution {
    if state.lock.is_locked() {
        return Resolution::Hold;
    }

    let incoming = incoming.filter(|context| !context.is_empty());

    if let Some(context) = incoming {
        if ignore.matches(context) {
            return fall_back(state);
        }
        if context != ERROR_SENTINEL {
            return Resolution::Display(Context::from(context));
        }
    }

    fall_back(state)
}

fn fall_back(state: &SessionState) -> Resolution {
    match &state.last_valid {
        Some(valid) => Resolution::FallBack(valid.clone()),
        None => Resolution::Clear,
    }
}
