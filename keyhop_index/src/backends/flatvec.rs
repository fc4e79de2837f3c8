// Copyright 2025 the Keyhop Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Flat vector backend with linear scans. Small and simple; good for tiny sets.

use alloc::vec::Vec;
use core::fmt::Debug;

use crate::backend::Backend;
use crate::types::Aabb2D;

/// Flat vector backend with linear scans.
#[derive(Clone)]
pub struct FlatVec<T: Copy + PartialOrd + Debug> {
    entries: Vec<Option<Aabb2D<T>>>,
}

impl<T: Copy + PartialOrd + Debug> Default for FlatVec<T> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<T: Copy + PartialOrd + Debug> Debug for FlatVec<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let total = self.entries.len();
        let alive = self.entries.iter().filter(|e| e.is_some()).count();
        f.debug_struct("FlatVec")
            .field("total_slots", &total)
            .field("alive", &alive)
            .finish_non_exhaustive()
    }
}

impl<T: Copy + PartialOrd + Debug> Backend<T> for FlatVec<T> {
    fn insert(&mut self, slot: usize, aabb: Aabb2D<T>) {
        if self.entries.len() <= slot {
            self.entries.resize_with(slot + 1, || None);
        }
        self.entries[slot] = Some(aabb);
    }

    fn update(&mut self, slot: usize, aabb: Aabb2D<T>) {
        if let Some(e) = self.entries.get_mut(slot) {
            *e = Some(aabb);
        }
    }

    fn remove(&mut self, slot: usize) {
        if let Some(e) = self.entries.get_mut(slot) {
            *e = None;
        }
    }

    fn clear(&mut self) {
        self.entries.clear();
    }

    fn query_point(&self, x: T, y: T, out: &mut Vec<usize>) {
        for (i, slot) in self.entries.iter().enumerate() {
            if slot.as_ref().is_some_and(|a| a.contains_point(x, y)) {
                out.push(i);
            }
        }
    }

    fn query_rect(&self, rect: Aabb2D<T>, out: &mut Vec<usize>) {
        for (i, slot) in self.entries.iter().enumerate() {
            if slot.as_ref().is_some_and(|a| a.overlaps(&rect)) {
                out.push(i);
            }
        }
    }
}
