// Copyright 2025 the Keyhop Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Configuration errors raised by the engine.

use core::fmt::Debug;

/// A transition table that was built or initialized incorrectly.
///
/// "No transition matches this input" is not an error; see
/// [`Step::Ignored`](crate::types::Step::Ignored).
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum AutomatonError<S: Debug> {
    /// Dispatch was attempted before [`set_state`](crate::engine::Automaton::set_state).
    #[error("automaton is not in a state, cannot transition")]
    Uninitialized,
    /// The current state (or a state returned by an action) has no entry in the table.
    #[error("state {0:?} is not declared in the transition table")]
    UnknownState(S),
}
