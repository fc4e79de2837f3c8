// Copyright 2025 the Keyhop Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Session configuration.

use alloc::string::String;
use core::time::Duration;

use crate::error::ConfigError;
use crate::labels::Alphabet;

/// Label characters used when nothing else is configured.
pub const DEFAULT_ALPHABET: &str = "ASDFGZXCVBQWERT";

/// Trigger keys.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Keymap {
    /// Shows the labels.
    pub activate: char,
    /// First key of the copy-link chord; the second is `activate`.
    pub yank_chord: char,
    /// Starts a chord that lets the next key through to the page.
    pub escape_chord: char,
}

impl Default for Keymap {
    fn default() -> Self {
        Self {
            activate: 'f',
            yank_chord: 'y',
            escape_chord: ',',
        }
    }
}

/// Everything a [`Session`](crate::session::Session) can be tuned with.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Config {
    /// Trigger keys.
    pub keys: Keymap,
    /// Characters labels are built from, in generation order.
    pub alphabet: String,
    /// How long a chord waits for its second key.
    pub chord_timeout: Duration,
    /// Elements narrower or shorter than this are not labeled.
    pub min_visible_size: f64,
    /// How many ancestors occlusion and collapsing look at.
    pub ancestor_depth: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            keys: Keymap::default(),
            alphabet: DEFAULT_ALPHABET.into(),
            chord_timeout: Duration::from_millis(500),
            min_visible_size: 5.0,
            ancestor_depth: 5,
        }
    }
}

impl Config {
    /// Replace the trigger keys.
    #[must_use]
    pub fn with_keys(mut self, keys: Keymap) -> Self {
        self.keys = keys;
        self
    }

    /// Replace the label alphabet.
    #[must_use]
    pub fn with_alphabet(mut self, alphabet: impl Into<String>) -> Self {
        self.alphabet = alphabet.into();
        self
    }

    /// Replace the chord timeout.
    #[must_use]
    pub fn with_chord_timeout(mut self, timeout: Duration) -> Self {
        self.chord_timeout = timeout;
        self
    }

    /// Replace the minimum visible size.
    #[must_use]
    pub fn with_min_visible_size(mut self, size: f64) -> Self {
        self.min_visible_size = size;
        self
    }

    /// Replace the ancestor depth.
    #[must_use]
    pub fn with_ancestor_depth(mut self, depth: usize) -> Self {
        self.ancestor_depth = depth;
        self
    }

    /// Check every field; returns the parsed alphabet on success.
    pub fn validate(&self) -> Result<Alphabet, ConfigError> {
        let alphabet = Alphabet::new(&self.alphabet)?;
        let Keymap {
            activate,
            yank_chord,
            escape_chord,
        } = self.keys;
        if activate == yank_chord || activate == escape_chord {
            return Err(ConfigError::ConflictingKeys(activate));
        }
        if yank_chord == escape_chord {
            return Err(ConfigError::ConflictingKeys(yank_chord));
        }
        if self.chord_timeout.is_zero() {
            return Err(ConfigError::ZeroChordTimeout);
        }
        if self.ancestor_depth == 0 {
            return Err(ConfigError::ZeroAncestorDepth);
        }
        if !self.min_visible_size.is_finite() || self.min_visible_size < 0.0 {
            return Err(ConfigError::InvalidVisibleSize(self.min_visible_size));
        }
        Ok(alphabet)
    }
}
