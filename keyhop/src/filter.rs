// Copyright 2025 the Keyhop Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Filter matcher: narrow the live labels with typed keys.

use alloc::string::String;
use alloc::vec::Vec;

use crate::event::Key;
use crate::labels::Hint;

/// Keys typed since the labels were shown, uppercased.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FilterState {
    text: String,
}

/// How the typed prefix splits the live labels.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FilterOutcome {
    /// No label starts with the prefix.
    NoMatch,
    /// Exactly one label does; its index.
    Unique(usize),
    /// Several do.
    Narrowed {
        /// Indices of labels that still match.
        matches: Vec<usize>,
        /// Indices of labels that no longer match.
        rest: Vec<usize>,
    },
}

impl FilterState {
    /// The typed prefix.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Number of typed characters.
    pub fn typed(&self) -> usize {
        self.text.chars().count()
    }

    /// Feed one key: Backspace drops the last character, anything else appends its uppercased text.
    pub fn push_key(&mut self, key: &Key) {
        match key {
            Key::Backspace => {
                self.text.pop();
            }
            other => other.push_upper(&mut self.text),
        }
    }

    /// Forget everything typed.
    pub fn clear(&mut self) {
        self.text.clear();
    }

    /// Split `hints` by whether their label starts with the typed prefix.
    pub fn partition<E>(&self, hints: &[Hint<E>]) -> FilterOutcome {
        let (matches, rest): (Vec<usize>, Vec<usize>) =
            (0..hints.len()).partition(|&i| hints[i].label.accepts(&self.text));
        match matches.len() {
            0 => FilterOutcome::NoMatch,
            1 => FilterOutcome::Unique(matches[0]),
            _ => FilterOutcome::Narrowed { matches, rest },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::labels::{Alphabet, Placement, generate_labels};
    use alloc::vec;

    fn hints(n: usize, letters: &str) -> Vec<Hint<usize>> {
        generate_labels(n, &Alphabet::new(letters).unwrap())
            .into_iter()
            .enumerate()
            .map(|(element, label)| Hint {
                element,
                label,
                placement: Placement::default(),
            })
            .collect()
    }

    #[test]
    fn narrows_then_resolves() {
        let hints = hints(4, "ASD");
        let mut filter = FilterState::default();

        filter.push_key(&Key::Char('a'));
        assert_eq!(filter.text(), "A");
        assert_eq!(
            filter.partition(&hints),
            FilterOutcome::Narrowed {
                matches: vec![0, 1, 2],
                rest: vec![3],
            }
        );

        filter.push_key(&Key::Char('a'));
        assert_eq!(filter.partition(&hints), FilterOutcome::Unique(0));
    }

    #[test]
    fn unknown_prefix_matches_nothing() {
        let hints = hints(4, "ASD");
        let mut filter = FilterState::default();
        filter.push_key(&Key::Named("Tab".into()));
        assert_eq!(filter.partition(&hints), FilterOutcome::NoMatch);
        assert_eq!(FilterState::default().partition::<usize>(&[]), FilterOutcome::NoMatch);
    }

    #[test]
    fn backspace_widens_again() {
        let hints = hints(4, "ASD");
        let mut filter = FilterState::default();
        filter.push_key(&Key::Backspace);
        assert_eq!(filter.text(), "", "backspace on empty is a no-op");

        filter.push_key(&Key::Char('S'));
        filter.push_key(&Key::Char('A'));
        assert_eq!(filter.partition(&hints), FilterOutcome::Unique(3));
        filter.push_key(&Key::Backspace);
        assert_eq!(filter.text(), "S");
        assert_eq!(filter.typed(), 1);
        filter.push_key(&Key::Backspace);
        assert!(matches!(filter.partition(&hints), FilterOutcome::Narrowed { ref matches, .. } if matches.len() == 4));
    }
}
