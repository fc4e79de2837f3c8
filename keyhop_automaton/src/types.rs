// Copyright 2025 the Keyhop Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core types for the automaton: patterns, matchers, inputs, and steps.
//!
//! ## Overview
//!
//! These types describe how an input is matched against a transition table
//! and what a dispatch reports back. They are consumed by
//! [`Automaton`](crate::engine::Automaton) and by the toolkits that build
//! tables on top of it.

/// One field of a [`Matcher`]: either a concrete value or a wildcard.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Pattern<T> {
    /// Matches anything, including an absent value.
    Any,
    /// Matches exactly this value.
    Exact(T),
}

impl<T: PartialEq> Pattern<T> {
    /// Returns true if this pattern accepts `candidate`.
    ///
    /// An absent candidate is only accepted by [`Pattern::Any`].
    pub fn accepts(&self, candidate: Option<&T>) -> bool {
        match self {
            Self::Any => true,
            Self::Exact(v) => candidate == Some(v),
        }
    }

    /// Returns true for [`Pattern::Exact`].
    pub const fn is_exact(&self) -> bool {
        matches!(self, Self::Exact(_))
    }
}

/// Left-hand side of a transition: an input kind and an input value, each of
/// which may be a wildcard.
///
/// ## Precedence
///
/// When several matchers of the same state accept an input, the most
/// specific one wins (see [`Matcher::specificity`]):
///
/// 1. kind and value both exact,
/// 2. kind exact with any value,
/// 3. any kind with an exact value (a bare value, see [`Matcher::value`]),
/// 4. full wildcard ([`Matcher::ANY`]).
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Matcher<T, V> {
    /// Pattern for the input kind.
    pub kind: Pattern<T>,
    /// Pattern for the input value.
    pub value: Pattern<V>,
}

impl<T, V> Matcher<T, V> {
    /// Matches every input.
    pub const ANY: Self = Self {
        kind: Pattern::Any,
        value: Pattern::Any,
    };

    /// A bare value: exact value, any kind.
    pub const fn value(value: V) -> Self {
        Self {
            kind: Pattern::Any,
            value: Pattern::Exact(value),
        }
    }

    /// Exact kind, any value.
    pub const fn kind(kind: T) -> Self {
        Self {
            kind: Pattern::Exact(kind),
            value: Pattern::Any,
        }
    }

    /// Exact kind and exact value.
    pub const fn exact(kind: T, value: V) -> Self {
        Self {
            kind: Pattern::Exact(kind),
            value: Pattern::Exact(value),
        }
    }
}

impl<T: PartialEq, V: PartialEq> Matcher<T, V> {
    /// Returns true if this matcher accepts the given input.
    pub fn matches<R>(&self, input: &Input<T, V, R>) -> bool {
        self.kind.accepts(Some(&input.kind)) && self.value.accepts(input.value.as_ref())
    }

    /// Rank used to break ties between matchers that accept the same input.
    ///
    /// Higher is more specific. A concrete kind outranks a concrete value.
    pub const fn specificity(&self) -> u8 {
        let kind = if self.kind.is_exact() { 2 } else { 0 };
        let value = if self.value.is_exact() { 1 } else { 0 };
        kind + value
    }
}

/// Bare values convert into value-only matchers.
impl<T, V> From<V> for Matcher<T, V> {
    fn from(value: V) -> Self {
        Self::value(value)
    }
}

/// A normalized input fed to [`Automaton::dispatch`](crate::engine::Automaton::dispatch).
///
/// `raw` carries whatever host payload actions need (modifier state, the
/// original event handle, ...). The engine never inspects it.
#[derive(Clone, Debug, PartialEq)]
pub struct Input<T, V, R = ()> {
    /// Input kind, e.g. key press or focus change.
    pub kind: T,
    /// Optional value, e.g. the key identity.
    pub value: Option<V>,
    /// Opaque host payload.
    pub raw: R,
}

impl<T, V> Input<T, V> {
    /// Input with a value and no payload.
    pub fn new(kind: T, value: V) -> Self {
        Self {
            kind,
            value: Some(value),
            raw: (),
        }
    }

    /// Input without a value and no payload.
    pub fn bare(kind: T) -> Self {
        Self {
            kind,
            value: None,
            raw: (),
        }
    }
}

/// Result of a successful dispatch.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Step<S> {
    /// No transition matched; state is unchanged and no action ran.
    Ignored,
    /// A transition matched and the automaton committed `to`.
    ///
    /// `from` and `to` may be equal for self-loops.
    Moved {
        /// State before the dispatch.
        from: S,
        /// State after the dispatch.
        to: S,
    },
}

impl<S> Step<S> {
    /// Returns true if a transition matched.
    pub const fn is_handled(&self) -> bool {
        matches!(self, Self::Moved { .. })
    }
}

/// An owned copy of the transition that matched an input.
///
/// Returned by [`Automaton::resolve`](crate::engine::Automaton::resolve) so a
/// caller can run the action while holding `&mut` access to its own state,
/// then hand the result back to
/// [`Automaton::finish`](crate::engine::Automaton::finish).
#[derive(Clone, Debug, PartialEq)]
pub struct Resolved<S, A> {
    /// State the transition was resolved from.
    pub from: S,
    /// Explicit target, if one was registered.
    pub to: Option<S>,
    /// Action to run, if one was registered.
    pub action: Option<A>,
}
