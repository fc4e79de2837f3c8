// Copyright 2025 the Keyhop Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Target discovery: the set of clickable surfaces currently on screen.
//!
//! Three passes over the elements in document order:
//!
//! 1. Candidates: visible in the viewport and interactive (in copy mode:
//!    hyperlinks with an address).
//! 2. Occlusion: the element under the candidate's center must be the
//!    candidate or lie inside one of its nearest ancestors.
//! 3. Collapsing: a candidate nested under an already accepted one is
//!    dropped, unless the accepted one is a hyperlink with an address, which
//!    is replaced by the more specific descendant.
//!
//! Ancestor walks are bounded by [`DiscoveryOptions::ancestor_depth`].

use alloc::collections::BTreeMap;
use alloc::format;
use alloc::vec::Vec;

use kurbo::Rect;
use tracing::trace;

use crate::error::DiscoveryError;
use crate::host::{Cursor, Role, Surface, Viewport};

/// One discovered interactive surface.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct Target<E> {
    /// The element.
    pub element: E,
}

/// Parameters of one discovery pass.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct DiscoveryOptions {
    /// Only hyperlinks with an address qualify.
    pub copy_mode: bool,
    /// Minimum width and height of a visible element.
    pub min_visible_size: f64,
    /// How many ancestors occlusion and collapsing consult.
    pub ancestor_depth: usize,
}

impl Default for DiscoveryOptions {
    fn default() -> Self {
        Self {
            copy_mode: false,
            min_visible_size: 5.0,
            ancestor_depth: 5,
        }
    }
}

/// Whether `bounds` overlaps the viewport and is large enough to click.
pub fn is_visible(bounds: Rect, viewport: &Viewport, min_size: f64) -> bool {
    bounds.y0 < viewport.size.height
        && 0.0 < bounds.y1
        && bounds.x0 < viewport.size.width
        && 0.0 < bounds.x1
        && bounds.width() >= min_size
        && bounds.height() >= min_size
}

/// Whether `element` is a hyperlink with a resolved address.
pub fn is_addressed_link<S: Surface + ?Sized>(surface: &S, element: S::Element) -> bool {
    surface.semantics(element).role == Role::Link && surface.href(element).is_some()
}

/// Whether `element` is interactive for the given mode.
pub fn is_interactive<S: Surface + ?Sized>(surface: &S, element: S::Element, copy_mode: bool) -> bool {
    if copy_mode {
        return is_addressed_link(surface, element);
    }
    surface.semantics(element).is_interactive() || surface.cursor(element) == Cursor::Pointer
}

/// Up to `depth` ancestors of `element`, nearest first.
pub fn ancestors<S: Surface + ?Sized>(surface: &S, element: S::Element, depth: usize) -> Vec<S::Element> {
    let mut out = Vec::with_capacity(depth);
    let mut cur = surface.parent(element);
    while let Some(parent) = cur {
        if out.len() == depth {
            break;
        }
        out.push(parent);
        cur = surface.parent(parent);
    }
    out
}

/// Whether the element under the center of `bounds` belongs to `element`'s neighborhood.
fn is_unoccluded<S: Surface + ?Sized>(
    surface: &S,
    element: S::Element,
    bounds: Rect,
    lineage: &[S::Element],
) -> bool {
    let Some(hit) = surface.element_at_point(bounds.center()) else {
        return false;
    };
    hit == element
        || surface.contains(element, hit)
        || lineage.iter().any(|a| surface.contains(*a, hit))
}

/// Find the elements worth labeling, in discovery order.
pub fn discover<S: Surface + ?Sized>(
    surface: &S,
    options: &DiscoveryOptions,
) -> Result<Vec<Target<S::Element>>, DiscoveryError> {
    let viewport = surface.viewport();
    let mut accepted: Vec<S::Element> = Vec::new();
    // Accepted element -> its slot in `accepted`.
    let mut slots: BTreeMap<S::Element, usize> = BTreeMap::new();

    for element in surface.elements() {
        let bounds = surface
            .bounds(element)
            .ok_or_else(|| DiscoveryError::Detached(format!("{element:?}")))?;
        if !is_visible(bounds, &viewport, options.min_visible_size)
            || !is_interactive(surface, element, options.copy_mode)
        {
            continue;
        }
        let lineage = ancestors(surface, element, options.ancestor_depth);
        if !is_unoccluded(surface, element, bounds, &lineage) {
            trace!(?element, "occluded");
            continue;
        }
        let holder = lineage.iter().find_map(|a| slots.get(a).copied());
        match holder {
            None => {
                slots.insert(element, accepted.len());
                accepted.push(element);
            }
            Some(idx) if is_addressed_link(surface, accepted[idx]) => {
                trace!(link = ?accepted[idx], ?element, "link replaced by descendant");
                slots.remove(&accepted[idx]);
                slots.insert(element, idx);
                accepted[idx] = element;
            }
            Some(_) => trace!(?element, "collapsed into ancestor"),
        }
    }

    Ok(accepted.into_iter().map(|element| Target { element }).collect())
}
