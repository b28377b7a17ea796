//! Machine instances: construction, recovery, and event dispatch.

use crate::error::Error;
use crate::guard;
use crate::table::TransitionTable;
use std::fmt;
use std::hash::Hash;
use std::sync::Arc;

/// Result of an accepted transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Applied<S> {
    pub from: S,
    pub to: S,
}

/// A live machine instance for one entity.
///
/// Holds the current state plus a correlation id used in logs. The table
/// is shared; the instance is not: [`send`](Machine::send) takes
/// `&mut self`, so concurrent mutation of one instance is a compile-time
/// impossibility. Callers resuming a persisted entity must still ensure
/// at most one in-flight operation per entity id (typically via a per-row
/// lock in the persistence layer).
///
/// The instance is meant to be short-lived: construct, send, persist the
/// new state, discard.
pub struct Machine<S, E, C> {
    table: Arc<TransitionTable<S, E, C>>,
    id: String,
    current: S,
}

impl<S, E, C> Machine<S, E, C>
where
    S: Copy + Eq + Hash + fmt::Debug,
    E: Copy + Eq + Hash + fmt::Debug,
{
    /// Creates a fresh machine at the table's initial state.
    pub fn new(table: Arc<TransitionTable<S, E, C>>, id: impl Into<String>) -> Self {
        let current = table.initial();
        Self {
            table,
            id: id.into(),
            current,
        }
    }

    /// Resumes a machine at a previously persisted state.
    ///
    /// Recovery trusts the persisted state as ground truth: no history is
    /// replayed and no guards run. Fails with [`Error::UnknownState`] if
    /// `state` is not declared by the table - that means a corrupted row
    /// or a stale table, and is never silently coerced to the initial
    /// state.
    pub fn recover(
        table: Arc<TransitionTable<S, E, C>>,
        id: impl Into<String>,
        state: S,
    ) -> Result<Self, Error<S, E>> {
        if !table.has_state(state) {
            return Err(Error::UnknownState {
                kind: table.kind().to_string(),
                state,
            });
        }

        let id = id.into();
        tracing::debug!(machine = %id, kind = table.kind(), state = ?state, "machine recovered");

        Ok(Self {
            table,
            id,
            current: state,
        })
    }

    /// Correlation id of this instance.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Current state.
    pub fn current(&self) -> S {
        self.current
    }

    /// The table this machine runs on.
    pub fn table(&self) -> &Arc<TransitionTable<S, E, C>> {
        &self.table
    }

    /// Sends an event carrying the entity payload.
    ///
    /// Looks up the transition for `(current, event)`, runs its guard if
    /// any, and only then moves to the target state. This is the single
    /// mutation point of the engine: every error path returns with the
    /// machine exactly as it was on entry, so a failed send is always
    /// safe to retry.
    ///
    /// An event with no registered transition from the current state is a
    /// plain [`Error::NoTransition`] rejection, never a panic and never a
    /// state change.
    pub fn send(&mut self, event: E, payload: &C) -> Result<Applied<S>, Error<S, E>> {
        let from = self.current;

        let Some((target, transition_guard)) = self.table.lookup(from, event) else {
            tracing::debug!(
                machine = %self.id,
                kind = self.table.kind(),
                from = ?from,
                event = ?event,
                "no transition registered"
            );
            return Err(Error::NoTransition { from, event });
        };

        if let Some(transition_guard) = transition_guard {
            if let Err(source) = guard::dispatch(transition_guard, payload) {
                tracing::debug!(
                    machine = %self.id,
                    kind = self.table.kind(),
                    from = ?from,
                    event = ?event,
                    reason = %source,
                    "guard rejected transition"
                );
                return Err(Error::GuardRejected {
                    from,
                    event,
                    source,
                });
            }
        }

        self.current = target;
        tracing::debug!(
            machine = %self.id,
            kind = self.table.kind(),
            from = ?from,
            to = ?target,
            event = ?event,
            "transition applied"
        );

        Ok(Applied { from, to: target })
    }

    /// Returns true iff some event moves the current state to `target` in
    /// one hop. Guards are not evaluated.
    pub fn can_reach(&self, target: S) -> bool {
        self.table.is_reachable(self.current, target)
    }

    /// Returns all events with a registered transition out of the current
    /// state.
    pub fn available_events(&self) -> Vec<E> {
        self.table.events_from(self.current)
    }
}

impl<S: fmt::Debug, E, C> fmt::Debug for Machine<S, E, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Machine")
            .field("id", &self.id)
            .field("current", &self.current)
            .finish()
    }
}


#[cfg(test)]
mod props {
    use super::*;
    use crate::workflows::lead::{self, LeadEvent, LeadState};
    use proptest::prelude::*;

    fn any_state() -> impl Strategy<Value = LeadState> {
        prop_oneof![
            Just(LeadState::Opened),
            Just(LeadState::Contacted),
            Just(LeadState::Converted),
            Just(LeadState::Unconverted),
            Just(LeadState::Canceled),
        ]
    }

    fn any_event() -> impl Strategy<Value = LeadEvent> {
        prop_oneof![
            Just(LeadEvent::Open),
            Just(LeadEvent::Contact),
            Just(LeadEvent::Convert),
            Just(LeadEvent::NotConvert),
            Just(LeadEvent::Cancel),
        ]
    }

    proptest! {
        /// Accepted sends move along declared edges; rejected sends move
        /// nothing.
        #[test]
        fn send_never_leaves_declared_edges(events in proptest::collection::vec(any_event(), 0..32)) {
            let table = Arc::new(lead::table::<()>(None).unwrap());
            let mut machine = Machine::new(Arc::clone(&table), "lead-prop");

            for event in events {
                let before = machine.current();
                match machine.send(event, &()) {
                    Ok(applied) => {
                        prop_assert_eq!(applied.from, before);
                        prop_assert_eq!(machine.current(), applied.to);
                        prop_assert!(table.is_reachable(applied.from, applied.to));
                    }
                    Err(err) => {
                        prop_assert!(err.is_recoverable());
                        prop_assert_eq!(machine.current(), before);
                    }
                }
            }
        }

        /// `recover` pins exactly the requested state for every declared
        /// state.
        #[test]
        fn recovery_is_pinned(state in any_state()) {
            let table = Arc::new(lead::table::<()>(None).unwrap());
            let machine = Machine::recover(table, "lead-prop", state).unwrap();
            prop_assert_eq!(machine.current(), state);
        }

        /// `is_reachable(a, b)` agrees with an exhaustive lookup over the
        /// event vocabulary.
        #[test]
        fn reachability_matches_lookup(a in any_state(), b in any_state()) {
            let table = lead::table::<()>(None).unwrap();
            let by_lookup = [
                LeadEvent::Open,
                LeadEvent::Contact,
                LeadEvent::Convert,
                LeadEvent::NotConvert,
                LeadEvent::Cancel,
            ]
            .iter()
            .any(|&event| matches!(table.lookup(a, event), Some((to, _)) if to == b));

            prop_assert_eq!(table.is_reachable(a, b), by_lookup);
        }
    }
}
