// Copyright 2025 the Keyhop Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error types.

use keyhop_automaton::AutomatonError;

use crate::mode::Mode;

/// Invalid [`Config`](crate::config::Config).
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum ConfigError {
    /// Fewer than two distinct label characters.
    #[error("label alphabet needs at least 2 distinct characters, got {0}")]
    AlphabetTooSmall(usize),
    /// A label character appears twice.
    #[error("label alphabet repeats {0:?}")]
    DuplicateLetter(char),
    /// Typed keys are uppercased before matching, so lowercase labels could never match.
    #[error("label alphabet contains lowercase {0:?}")]
    LowercaseLetter(char),
    /// Two trigger keys are the same.
    #[error("trigger key {0:?} is bound more than once")]
    ConflictingKeys(char),
    /// Chords would expire immediately.
    #[error("chord timeout must be non-zero")]
    ZeroChordTimeout,
    /// Occlusion and collapsing need at least one ancestor.
    #[error("ancestor depth must be at least 1")]
    ZeroAncestorDepth,
    /// Minimum visible size is negative or not finite.
    #[error("minimum visible size {0} is not a finite, non-negative number")]
    InvalidVisibleSize(f64),
}

/// Target discovery could not complete.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum DiscoveryError {
    /// An enumerated element disappeared before its geometry was read.
    #[error("element {0} was detached during discovery")]
    Detached(alloc::string::String),
}

/// Any error a [`Session`](crate::session::Session) can report.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum Error {
    /// The transition table or current state is inconsistent.
    #[error(transparent)]
    Automaton(#[from] AutomatonError<Mode>),
    /// Configuration rejected at construction.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// Activation failed.
    #[error(transparent)]
    Discovery(#[from] DiscoveryError),
}
