// Copyright 2025 the Keyhop Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Backend trait for spatial indexing implementations.

use alloc::vec::Vec;
use core::fmt::Debug;

use crate::types::Aabb2D;

/// Spatial backend abstraction used by [`IndexGeneric`](crate::IndexGeneric).
///
/// Query results are candidate slots: a backend may return slots whose box
/// does not contain the point, never the other way round. The index filters
/// candidates against the exact boxes.
pub trait Backend<T: Copy + PartialOrd + Debug> {
    /// Insert a new slot into the spatial structure.
    fn insert(&mut self, slot: usize, aabb: Aabb2D<T>);

    /// Update an existing slot's AABB.
    fn update(&mut self, slot: usize, aabb: Aabb2D<T>);

    /// Remove a slot from the spatial structure.
    fn remove(&mut self, slot: usize);

    /// Clear all spatial structures.
    fn clear(&mut self);

    /// Append candidate slots for a point query to `out`, in ascending order without duplicates.
    fn query_point(&self, x: T, y: T, out: &mut Vec<usize>);

    /// Append candidate slots for a rectangle query to `out`, in ascending order without duplicates.
    fn query_rect(&self, rect: Aabb2D<T>, out: &mut Vec<usize>);
}
