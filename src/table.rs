//! Transition table construction and lookup.
//!
//! A table fixes the workflow for one entity kind:
//!
//! ```text
//! kind:    "lead"
//! initial: Opened
//! (Opened,    Contact)    -> Contacted
//! (Contacted, Convert)    -> Converted
//! (Contacted, Cancel)     -> Canceled   [guard: no active proposal]
//! ```
//!
//! Tables are built once at process startup and immutable afterwards, so
//! a single `Arc<TransitionTable>` serves any number of concurrent
//! readers.

use crate::error::Error;
use crate::guard::Guard;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::hash::Hash;

/// Immutable `(source, event) -> (target, guard)` map for one entity kind.
pub struct TransitionTable<S, E, C> {
    kind: String,
    initial: S,
    states: HashSet<S>,
    transitions: HashMap<(S, E), (S, Option<Guard<C>>)>,
}

impl<S, E, C> TransitionTable<S, E, C>
where
    S: Copy + Eq + Hash + fmt::Debug,
    E: Copy + Eq + Hash + fmt::Debug,
{
    /// Starts a builder for the given entity kind and initial state.
    pub fn builder(kind: impl Into<String>, initial: S) -> TableBuilder<S, E, C> {
        TableBuilder {
            kind: kind.into(),
            initial,
            states: HashSet::from([initial]),
            transitions: HashMap::new(),
        }
    }

    /// Entity kind this table governs.
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// Initial state for fresh machines.
    pub fn initial(&self) -> S {
        self.initial
    }

    /// Returns true if `state` is a member of the declared state set.
    pub fn has_state(&self, state: S) -> bool {
        self.states.contains(&state)
    }

    /// Looks up the transition for `(source, event)`.
    pub fn lookup(&self, source: S, event: E) -> Option<(S, Option<&Guard<C>>)> {
        self.transitions
            .get(&(source, event))
            .map(|(target, guard)| (*target, guard.as_ref()))
    }

    /// Returns true iff some event moves `source` to `target` in one hop.
    ///
    /// Direct adjacency only; guards are not evaluated. Intended for
    /// cheap pre-flight checks before a real [`send`](crate::Machine::send).
    pub fn is_reachable(&self, source: S, target: S) -> bool {
        self.transitions
            .iter()
            .any(|((from, _), (to, _))| *from == source && *to == target)
    }

    /// Returns all events with a registered transition out of `state`.
    pub fn events_from(&self, state: S) -> Vec<E> {
        self.transitions
            .keys()
            .filter(|(from, _)| *from == state)
            .map(|(_, event)| *event)
            .collect()
    }

    /// Number of registered transitions.
    pub fn transition_count(&self) -> usize {
        self.transitions.len()
    }
}

impl<S: fmt::Debug, E: fmt::Debug, C> fmt::Debug for TransitionTable<S, E, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransitionTable")
            .field("kind", &self.kind)
            .field("initial", &self.initial)
            .field("states", &self.states)
            .field("transitions", &self.transitions.len())
            .finish()
    }
}

/// Builder for [`TransitionTable`].
///
/// Registration is fallible so an ambiguous table is rejected before the
/// process starts serving traffic.
pub struct TableBuilder<S, E, C> {
    kind: String,
    initial: S,
    states: HashSet<S>,
    transitions: HashMap<(S, E), (S, Option<Guard<C>>)>,
}

impl<S, E, C> TableBuilder<S, E, C>
where
    S: Copy + Eq + Hash + fmt::Debug,
    E: Copy + Eq + Hash + fmt::Debug,
{
    /// Registers an unconditional transition.
    pub fn register(&mut self, source: S, event: E, target: S) -> Result<&mut Self, Error<S, E>> {
        self.insert(source, event, target, None)
    }

    /// Registers a transition with a guard that may veto it.
    pub fn register_guarded(
        &mut self,
        source: S,
        event: E,
        target: S,
        guard: Guard<C>,
    ) -> Result<&mut Self, Error<S, E>> {
        self.insert(source, event, target, Some(guard))
    }

    fn insert(
        &mut self,
        source: S,
        event: E,
        target: S,
        guard: Option<Guard<C>>,
    ) -> Result<&mut Self, Error<S, E>> {
        let key = (source, event);
        if self.transitions.contains_key(&key) {
            return Err(Error::DuplicateTransition {
                from: source,
                event,
            });
        }

        self.states.insert(source);
        self.states.insert(target);
        self.transitions.insert(key, (target, guard));
        Ok(self)
    }

    /// Finalizes the table.
    pub fn build(self) -> TransitionTable<S, E, C> {
        let table = TransitionTable {
            kind: self.kind,
            initial: self.initial,
            states: self.states,
            transitions: self.transitions,
        };

        tracing::debug!(
            kind = %table.kind,
            states = table.states.len(),
            transitions = table.transitions.len(),
            "transition table built"
        );

        table
    }
}

impl<S: fmt::Debug, E, C> fmt::Debug for TableBuilder<S, E, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TableBuilder")
            .field("kind", &self.kind)
            .field("initial", &self.initial)
            .field("transitions", &self.transitions.len())
            .finish()
    }
}
