// Copyright 2025 the Keyhop Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Keyhop Automaton: a deterministic, `no_std` event-driven finite automaton.
//!
//! ## Overview
//!
//! This crate interprets a live stream of heterogeneous inputs (key presses,
//! focus changes, ...) against a declarative transition table.
//! It does not know what the inputs mean and never touches the host's events.
//! Instead, every transition carries a tagged action, and a single evaluator
//! supplied by the caller decides what each action does and whether it
//! overrides the next state.
//!
//! ## Inputs
//!
//! An [`Input`](crate::types::Input) has a kind, an optional value, and an
//! opaque payload. Transitions match on a [`Matcher`](crate::types::Matcher)
//! whose kind and value are each either concrete or a wildcard.
//!
//! ## Ordering
//!
//! When several transitions of the current state accept an input, the most
//! specific wins: kind+value, then kind only, then value only, then the full
//! wildcard. Inputs that match nothing are ignored and leave the state as is,
//! so unhandled inputs can pass through to whatever sits behind the automaton.
//!
//! ## Errors
//!
//! Dispatching without a current state, or from a state that has no entry in
//! the table, is a configuration error
//! ([`AutomatonError`](crate::error::AutomatonError)), reported immediately.
//!
//! ## Example
//!
//! ```
//! use keyhop_automaton::engine::Automaton;
//! use keyhop_automaton::types::{Input, Matcher, Step};
//!
//! #[derive(Copy, Clone, Debug, Eq, PartialEq)]
//! enum State { Rest, Open }
//! #[derive(Copy, Clone, Debug, Eq, PartialEq)]
//! enum Kind { Key, Blur }
//! #[derive(Copy, Clone, Debug, Eq, PartialEq)]
//! enum Act { Show, Hide }
//!
//! let mut fsm: Automaton<State, Kind, char, Act> = Automaton::new();
//! let on_blur: Matcher<Kind, char> = Matcher::kind(Kind::Blur);
//! fsm.add_transition(State::Rest, Some(State::Open), 'f', Act::Show)
//!     .add_transition(State::Open, Some(State::Rest), on_blur, Act::Hide);
//! fsm.set_state(State::Rest);
//!
//! let mut log = Vec::new();
//! let step = fsm
//!     .dispatch(&Input::new(Kind::Key, 'f'), |act, _| {
//!         log.push(*act);
//!         None
//!     })
//!     .unwrap();
//! assert_eq!(step, Step::Moved { from: State::Rest, to: State::Open });
//!
//! // Nothing in `Open` matches a key press: ignored.
//! let step = fsm.dispatch(&Input::new(Kind::Key, 'x'), |_, _| None).unwrap();
//! assert_eq!(step, Step::Ignored);
//! assert_eq!(log, vec![Act::Show]);
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

pub mod engine;
pub mod error;
pub mod types;

pub use engine::Automaton;
pub use error::AutomatonError;
pub use types::{Input, Matcher, Pattern, Resolved, Step};
