//! Engine error types.

use std::fmt;
use thiserror::Error;

/// Boxed business error produced by a guard.
pub type GuardError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors from the state machine engine.
///
/// Generic over the caller's state and event vocabularies so messages can
/// name the offending pair directly.
#[derive(Debug, Error)]
pub enum Error<S: fmt::Debug, E: fmt::Debug> {
    /// Construction-time: `(source, event)` was registered twice. A table
    /// with an ambiguous transition must never reach serving.
    #[error("duplicate transition from {from:?} on event {event:?}")]
    DuplicateTransition { from: S, event: E },

    /// Recovery-time: the persisted state is not a member of the declared
    /// state set. Signals data corruption or a stale table.
    #[error("unknown state {state:?} for machine kind '{kind}'")]
    UnknownState { kind: String, state: S },

    /// Run-time: no transition is registered for `(current, event)`. The
    /// machine is left exactly as it was.
    #[error("no transition from {from:?} on event {event:?}")]
    NoTransition { from: S, event: E },

    /// Run-time: the transition's guard vetoed it. Wraps the guard's own
    /// business error verbatim.
    #[error("guard rejected transition from {from:?} on event {event:?}: {source}")]
    GuardRejected {
        from: S,
        event: E,
        #[source]
        source: GuardError,
    },
}

impl<S: fmt::Debug, E: fmt::Debug> Error<S, E> {
    /// Returns whether the caller can surface this error and retry later
    /// without first repairing the table or the stored state.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Error::NoTransition { .. } | Error::GuardRejected { .. }
        )
    }
}
