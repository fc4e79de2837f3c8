// Copyright 2025 the Keyhop Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Label assignment: fixed-width codes ordered by distance from the viewport center.
//!
//! ## Width
//!
//! Every label in one activation has the same width: the smallest `w ≥ 1`
//! with `|alphabet|^w ≥ count`. Fixed width means no label is a proper
//! prefix of another, so typing a full label always resolves exactly one
//! target.
//!
//! ## Order
//!
//! Codes are generated breadth-first in alphabet order, so codes sharing a
//! first character are contiguous. Targets are sorted by the distance of
//! their top-left corner from the viewport center and take codes in that
//! order: the nearest target gets the first code.

use alloc::collections::VecDeque;
use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use crate::discovery::Target;
use crate::error::{ConfigError, DiscoveryError};
use crate::host::Surface;

/// Validated, ordered set of label characters.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Alphabet(Vec<char>);

impl Alphabet {
    /// Parse an alphabet: at least two distinct, non-lowercase characters.
    pub fn new(letters: &str) -> Result<Self, ConfigError> {
        let mut chars: Vec<char> = Vec::new();
        for c in letters.chars() {
            if c.is_lowercase() {
                return Err(ConfigError::LowercaseLetter(c));
            }
            if chars.contains(&c) {
                return Err(ConfigError::DuplicateLetter(c));
            }
            chars.push(c);
        }
        if chars.len() < 2 {
            return Err(ConfigError::AlphabetTooSmall(chars.len()));
        }
        Ok(Self(chars))
    }

    /// Number of characters.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false; an alphabet has at least two characters.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Characters in generation order.
    pub fn chars(&self) -> &[char] {
        &self.0
    }
}

impl Default for Alphabet {
    fn default() -> Self {
        Self(crate::config::DEFAULT_ALPHABET.chars().collect())
    }
}

/// A label shown next to a target.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Label(String);

impl Label {
    /// The label text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Width in characters.
    pub fn width(&self) -> usize {
        self.0.chars().count()
    }

    /// Whether the typed `prefix` still leads to this label.
    pub fn accepts(&self, prefix: &str) -> bool {
        self.0.starts_with(prefix)
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

impl PartialEq<&str> for Label {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// Where and how to draw a label.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Placement {
    /// Distance from the top of the page to the element's top edge.
    pub top: f64,
    /// Distance from the element's right edge to the right of the page.
    pub right: f64,
    /// Stacking order the label must be drawn at to stay above the element.
    pub z_index: i32,
}

/// A target with its label.
#[derive(Clone, Debug, PartialEq)]
pub struct Hint<E> {
    /// The element.
    pub element: E,
    /// Its label.
    pub label: Label,
    /// Where to draw the label.
    pub placement: Placement,
}

/// Label width for `count` targets over an alphabet of `alphabet_len` characters.
///
/// Computed with integers: `max(1, ceil(log(count) / log(alphabet_len)))`.
pub fn label_width(count: usize, alphabet_len: usize) -> usize {
    if alphabet_len < 2 {
        return 1;
    }
    let mut width = 1;
    let mut capacity = alphabet_len;
    while capacity < count {
        capacity = capacity.saturating_mul(alphabet_len);
        width += 1;
    }
    width
}

/// The first `count` codes of the breadth-first expansion over `alphabet`.
pub fn generate_labels(count: usize, alphabet: &Alphabet) -> Vec<Label> {
    if count == 0 {
        return Vec::new();
    }
    let width = label_width(count, alphabet.len());
    let mut labels = Vec::with_capacity(count);
    let mut queue: VecDeque<String> = VecDeque::new();
    queue.push_back(String::new());
    while let Some(prefix) = queue.pop_front() {
        for &c in alphabet.chars() {
            let mut code = prefix.clone();
            code.push(c);
            if code.chars().count() == width {
                labels.push(Label(code));
                if labels.len() == count {
                    return labels;
                }
            } else {
                queue.push_back(code);
            }
        }
    }
    labels
}

/// Sort `targets` by proximity to the viewport center and label them.
///
/// Fails if a target's geometry can no longer be read.
pub fn assign_labels<S: Surface + ?Sized>(
    surface: &S,
    targets: Vec<Target<S::Element>>,
    alphabet: &Alphabet,
) -> Result<Vec<Hint<S::Element>>, DiscoveryError> {
    let viewport = surface.viewport();
    let center = viewport.center();
    let mut measured = Vec::with_capacity(targets.len());
    for target in targets {
        let bounds = surface
            .bounds(target.element)
            .ok_or_else(|| DiscoveryError::Detached(format!("{:?}", target.element)))?;
        let distance = (bounds.origin() - center).hypot2();
        measured.push((target.element, bounds, distance));
    }
    measured.sort_by(|a, b| a.2.total_cmp(&b.2));

    let labels = generate_labels(measured.len(), alphabet);
    Ok(measured
        .into_iter()
        .zip(labels)
        .map(|((element, bounds, _), label)| Hint {
            element,
            label,
            placement: Placement {
                top: bounds.y0 + viewport.scroll.y,
                right: viewport.size.width - (bounds.x1 + viewport.scroll.x),
                z_index: stacking_z(surface, element),
            },
        })
        .collect())
}

/// Highest z-index among `element`, its ancestors, and its descendants.
pub fn stacking_z<S: Surface + ?Sized>(surface: &S, element: S::Element) -> i32 {
    let mut z = surface.z_index(element);
    let mut cur = surface.parent(element);
    while let Some(ancestor) = cur {
        z = z.max(surface.z_index(ancestor));
        cur = surface.parent(ancestor);
    }
    let mut stack = surface.children(element);
    while let Some(descendant) = stack.pop() {
        z = z.max(surface.z_index(descendant));
        stack.extend(surface.children(descendant));
    }
    z
}
