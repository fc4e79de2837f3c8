// Copyright 2025 the Keyhop Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Uniform grid backend for `f64` coordinates.

use alloc::collections::{BTreeMap, BTreeSet};
use alloc::vec::Vec;
use core::ops::RangeInclusive;

use crate::backend::Backend;
use crate::types::Aabb2D;

/// Boxes covering more cells than this go to a side list scanned on every query.
const MAX_CELLS_PER_ENTRY: i64 = 4096;

type CellSpan = (RangeInclusive<i64>, RangeInclusive<i64>);

/// Uniform grid backend.
///
/// Each box is registered in every cell it touches, so a point query only
/// looks at one cell. Boxes that are not finite or that would cover too many
/// cells (a page-sized root, say) are kept in a separate list instead.
#[derive(Clone)]
pub struct GridF64 {
    cell_w: f64,
    cell_h: f64,
    origin_x: f64,
    origin_y: f64,
    entries: Vec<Option<Aabb2D<f64>>>,
    cells: BTreeMap<(i64, i64), Vec<usize>>,
    oversized: BTreeSet<usize>,
}

impl GridF64 {
    /// Create a grid backend with the given cell size and origin offset.
    ///
    /// Cell sizes must be positive.
    pub fn new(cell_w: f64, cell_h: f64, origin_x: f64, origin_y: f64) -> Self {
        debug_assert!(cell_w > 0.0 && cell_h > 0.0, "cell sizes must be positive");
        Self {
            cell_w,
            cell_h,
            origin_x,
            origin_y,
            entries: Vec::new(),
            cells: BTreeMap::new(),
            oversized: BTreeSet::new(),
        }
    }

    /// Number of non-empty cells.
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    fn floor_to_i64(v: f64) -> i64 {
        #[allow(
            clippy::cast_possible_truncation,
            reason = "Saturating float-to-int casts are the intent; the cell span is bounded afterwards."
        )]
        let i = v as i64;
        if (i as f64) > v { i - 1 } else { i }
    }

    fn key_for(&self, x: f64, y: f64) -> (i64, i64) {
        let cx = Self::floor_to_i64((x - self.origin_x) / self.cell_w);
        let cy = Self::floor_to_i64((y - self.origin_y) / self.cell_h);
        (cx, cy)
    }

    /// Covered cell ranges, or `None` when the box belongs in the oversized list.
    fn span_for(&self, a: &Aabb2D<f64>) -> Option<CellSpan> {
        if !a.is_finite() || a.is_empty() {
            return None;
        }
        let (minx, miny) = self.key_for(a.min_x, a.min_y);
        let (maxx, maxy) = self.key_for(a.max_x, a.max_y);
        let w = maxx.saturating_sub(minx).saturating_add(1);
        let h = maxy.saturating_sub(miny).saturating_add(1);
        (w.saturating_mul(h) <= MAX_CELLS_PER_ENTRY).then_some((minx..=maxx, miny..=maxy))
    }

    fn place(&mut self, slot: usize, aabb: &Aabb2D<f64>) {
        match self.span_for(aabb) {
            Some((xs, ys)) => {
                for y in ys {
                    for x in xs.clone() {
                        self.cells.entry((x, y)).or_default().push(slot);
                    }
                }
            }
            None => {
                self.oversized.insert(slot);
            }
        }
    }

    fn unplace(&mut self, slot: usize) {
        let Some(Some(old)) = self.entries.get(slot).copied() else {
            return;
        };
        match self.span_for(&old) {
            Some((xs, ys)) => {
                for y in ys {
                    for x in xs.clone() {
                        if let Some(slots) = self.cells.get_mut(&(x, y)) {
                            slots.retain(|&s| s != slot);
                            if slots.is_empty() {
                                self.cells.remove(&(x, y));
                            }
                        }
                    }
                }
            }
            None => {
                self.oversized.remove(&slot);
            }
        }
    }
}

impl Backend<f64> for GridF64 {
    fn insert(&mut self, slot: usize, aabb: Aabb2D<f64>) {
        if self.entries.len() <= slot {
            self.entries.resize_with(slot + 1, || None);
        }
        self.unplace(slot);
        self.entries[slot] = Some(aabb);
        self.place(slot, &aabb);
    }

    fn update(&mut self, slot: usize, aabb: Aabb2D<f64>) {
        if self.entries.get(slot).is_some_and(Option::is_some) {
            self.insert(slot, aabb);
        }
    }

    fn remove(&mut self, slot: usize) {
        self.unplace(slot);
        if let Some(e) = self.entries.get_mut(slot) {
            *e = None;
        }
    }

    fn clear(&mut self) {
        self.entries.clear();
        self.cells.clear();
        self.oversized.clear();
    }

    fn query_point(&self, x: f64, y: f64, out: &mut Vec<usize>) {
        let mut set: BTreeSet<usize> = self.oversized.clone();
        if let Some(slots) = self.cells.get(&self.key_for(x, y)) {
            set.extend(slots.iter().copied());
        }
        out.extend(set);
    }

    fn query_rect(&self, rect: Aabb2D<f64>, out: &mut Vec<usize>) {
        let mut set: BTreeSet<usize> = self.oversized.clone();
        match self.span_for(&rect) {
            Some((xs, ys)) => {
                for y in ys {
                    for x in xs.clone() {
                        if let Some(slots) = self.cells.get(&(x, y)) {
                            set.extend(slots.iter().copied());
                        }
                    }
                }
            }
            None => {
                for slots in self.cells.values() {
                    set.extend(slots.iter().copied());
                }
            }
        }
        out.extend(set);
    }
}

impl core::fmt::Debug for GridF64 {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let total = self.entries.len();
        let alive = self.entries.iter().filter(|e| e.is_some()).count();
        f.debug_struct("GridF64")
            .field("cell_w", &self.cell_w)
            .field("cell_h", &self.cell_h)
            .field("origin_x", &self.origin_x)
            .field("origin_y", &self.origin_y)
            .field("total_slots", &total)
            .field("alive", &alive)
            .field("cells", &self.cells.len())
            .field("oversized", &self.oversized.len())
            .finish_non_exhaustive()
    }
}
