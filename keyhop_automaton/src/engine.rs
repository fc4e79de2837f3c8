// Copyright 2025 the Keyhop Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Automaton implementation.
//!
//! ## Overview
//!
//! Stores a per-state transition table, resolves inputs against it, and
//! commits the next state.
//!
//! ## Resolution
//!
//! - Only the current state's transitions are consulted.
//! - Among matching transitions the most specific [`Matcher`] wins.
//! - Registering the same `(from, matcher)` pair again replaces the earlier entry,
//!   so resolution never has to choose between equally specific matches.
//!
//! ## Next state
//!
//! The committed state is the action's override if it returned one, else the
//! transition's explicit target, else the state the input was resolved from.
//! Transitions without an action never consult the evaluator.

use alloc::vec::Vec;
use core::fmt::Debug;

use tracing::{debug, trace};

use crate::error::AutomatonError;
use crate::types::{Input, Matcher, Resolved, Step};

struct Transition<S, T, V, A> {
    matcher: Matcher<T, V>,
    to: Option<S>,
    action: Option<A>,
}

struct StateEntry<S, T, V, A> {
    state: S,
    transitions: Vec<Transition<S, T, V, A>>,
}

/// Event-driven automaton over states `S`, input kinds `T`, input values `V`
/// and tagged actions `A`.
///
/// ## Usage
///
/// - Build the table with [`Automaton::add_transition`] (and
///   [`Automaton::add_state`] for states without outgoing edges).
/// - Initialize with [`Automaton::set_state`].
/// - Feed inputs with [`Automaton::dispatch`], passing a single evaluator that
///   interprets actions. Callers that need `&mut` access to state owning the
///   automaton can split the call into [`Automaton::resolve`] and
///   [`Automaton::finish`].
pub struct Automaton<S, T, V, A> {
    states: Vec<StateEntry<S, T, V, A>>,
    current: Option<S>,
}

impl<S: Debug, T, V, A> Debug for Automaton<S, T, V, A> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let transitions: usize = self.states.iter().map(|e| e.transitions.len()).sum();
        f.debug_struct("Automaton")
            .field("current", &self.current)
            .field("states", &self.states.len())
            .field("transitions", &transitions)
            .finish_non_exhaustive()
    }
}

impl<S, T, V, A> Default for Automaton<S, T, V, A> {
    fn default() -> Self {
        Self {
            states: Vec::new(),
            current: None,
        }
    }
}

impl<S, T, V, A> Automaton<S, T, V, A>
where
    S: Clone + Eq + Debug,
    T: PartialEq,
    V: PartialEq,
    A: Clone,
{
    /// Create an empty automaton with no states and no current state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a state. Declaring an existing state is a no-op.
    pub fn add_state(&mut self, state: S) -> &mut Self {
        self.entry_index_or_insert(state);
        self
    }

    /// Register a transition out of `from`.
    ///
    /// `matcher` accepts a full [`Matcher`] or a bare value (exact value, any
    /// kind). When `to` is `None`, the next state comes from the action's
    /// return value, or stays at `from`. Both `from` and `to` become declared
    /// states.
    pub fn add_transition(
        &mut self,
        from: S,
        to: Option<S>,
        matcher: impl Into<Matcher<T, V>>,
        action: impl Into<Option<A>>,
    ) -> &mut Self {
        if let Some(target) = &to {
            self.entry_index_or_insert(target.clone());
        }
        let idx = self.entry_index_or_insert(from);
        let transition = Transition {
            matcher: matcher.into(),
            to,
            action: action.into(),
        };
        let transitions = &mut self.states[idx].transitions;
        match transitions
            .iter_mut()
            .find(|t| t.matcher == transition.matcher)
        {
            Some(existing) => *existing = transition,
            None => transitions.push(transition),
        }
        self
    }

    /// Forcibly set the current state.
    ///
    /// Used for initialization and for timer-driven delayed transitions. The
    /// state is not validated here; a later dispatch reports
    /// [`AutomatonError::UnknownState`] if it was never declared.
    pub fn set_state(&mut self, state: S) {
        debug!(state = ?state, "set state");
        self.current = Some(state);
    }

    /// Returns the current state, or `None` before initialization.
    pub fn state(&self) -> Option<&S> {
        self.current.as_ref()
    }

    /// Returns true if `state` has an entry in the table.
    pub fn contains_state(&self, state: &S) -> bool {
        self.states.iter().any(|e| e.state == *state)
    }

    /// Iterate declared states in declaration order.
    pub fn states(&self) -> impl Iterator<Item = &S> + '_ {
        self.states.iter().map(|e| &e.state)
    }

    /// Look up the transition the current state takes for `input`.
    ///
    /// Returns `Ok(None)` when nothing matches; that is a no-op, not an error.
    pub fn resolve<R>(
        &self,
        input: &Input<T, V, R>,
    ) -> Result<Option<Resolved<S, A>>, AutomatonError<S>> {
        let current = self.current.as_ref().ok_or(AutomatonError::Uninitialized)?;
        let entry = self
            .states
            .iter()
            .find(|e| e.state == *current)
            .ok_or_else(|| AutomatonError::UnknownState(current.clone()))?;

        let mut best: Option<&Transition<S, T, V, A>> = None;
        for t in &entry.transitions {
            if !t.matcher.matches(input) {
                continue;
            }
            match best {
                Some(b) if b.matcher.specificity() >= t.matcher.specificity() => {}
                _ => best = Some(t),
            }
        }

        Ok(best.map(|t| Resolved {
            from: current.clone(),
            to: t.to.clone(),
            action: t.action.clone(),
        }))
    }

    /// Commit the outcome of a resolved transition.
    ///
    /// `overridden` is the action's return value. The committed state must be
    /// declared; otherwise the current state is left untouched and
    /// [`AutomatonError::UnknownState`] is returned.
    pub fn finish(
        &mut self,
        resolved: Resolved<S, A>,
        overridden: Option<S>,
    ) -> Result<Step<S>, AutomatonError<S>> {
        let Resolved { from, to, .. } = resolved;
        let next = overridden.or(to).unwrap_or_else(|| from.clone());
        if !self.contains_state(&next) {
            return Err(AutomatonError::UnknownState(next));
        }
        debug!(from = ?from, to = ?next, "transition");
        self.current = Some(next.clone());
        Ok(Step::Moved { from, to: next })
    }

    /// Resolve `input`, run the matched action through `evaluate`, and commit.
    ///
    /// `evaluate` receives the tagged action and the input, and may return a
    /// state that overrides the transition's explicit target.
    pub fn dispatch<R, F>(
        &mut self,
        input: &Input<T, V, R>,
        mut evaluate: F,
    ) -> Result<Step<S>, AutomatonError<S>>
    where
        F: FnMut(&A, &Input<T, V, R>) -> Option<S>,
    {
        let Some(resolved) = self.resolve(input)? else {
            trace!(state = ?self.current, "no transition for input");
            return Ok(Step::Ignored);
        };
        let overridden = resolved.action.as_ref().and_then(|a| evaluate(a, input));
        self.finish(resolved, overridden)
    }

    fn entry_index_or_insert(&mut self, state: S) -> usize {
        if let Some(idx) = self.states.iter().position(|e| e.state == state) {
            return idx;
        }
        self.states.push(StateEntry {
            state,
            transitions: Vec::new(),
        });
        self.states.len() - 1
    }
}
