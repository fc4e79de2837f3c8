// Copyright 2025 the Keyhop Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public `Index` API and generic implementation over a pluggable backend.

use alloc::vec::Vec;
use core::fmt::Debug;

use crate::backend::Backend;
use crate::backends::flatvec::FlatVec;
use crate::backends::grid::GridF64;
use crate::types::Aabb2D;

/// Generational handle for entries.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Key(u32, u32);

impl Key {
    #[allow(
        clippy::cast_possible_truncation,
        reason = "Index keys are 32-bit; slots beyond that are not supported."
    )]
    const fn new(idx: usize, generation: u32) -> Self {
        Self(idx as u32, generation)
    }

    const fn idx(self) -> usize {
        self.0 as usize
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Mark {
    Added,
    Updated,
    Removed,
}

#[derive(Clone, Debug)]
struct Entry<T, P> {
    generation: u32,
    aabb: Aabb2D<T>,
    // What the backend holds as of the last commit.
    live: Option<Aabb2D<T>>,
    payload: P,
    mark: Option<Mark>,
}

/// A generic AABB index parameterized by a spatial backend.
///
/// Changes are staged and reach the backend on [`commit`](Self::commit);
/// queries observe the last commit.
#[derive(Clone, Debug)]
pub struct IndexGeneric<T: Copy + PartialOrd + Debug, P: Copy + Debug, B: Backend<T>> {
    entries: Vec<Option<Entry<T, P>>>,
    generations: Vec<u32>,
    free_list: Vec<usize>,
    backend: B,
}

impl<T, P, B> IndexGeneric<T, P, B>
where
    T: Copy + PartialOrd + Debug,
    P: Copy + Debug,
    B: Backend<T> + Default,
{
    /// Create an empty index using the backend's default constructor.
    pub fn new() -> Self {
        Self::with_backend(B::default())
    }
}

impl<T, P, B> IndexGeneric<T, P, B>
where
    T: Copy + PartialOrd + Debug,
    P: Copy + Debug,
    B: Backend<T>,
{
    /// Create an empty index over the given backend.
    pub fn with_backend(backend: B) -> Self {
        Self {
            entries: Vec::new(),
            generations: Vec::new(),
            free_list: Vec::new(),
            backend,
        }
    }

    /// Insert a new AABB with payload. Returns a stable handle `Key`.
    pub fn insert(&mut self, aabb: Aabb2D<T>, payload: P) -> Key {
        let entry = |generation| Entry {
            generation,
            aabb,
            live: None,
            payload,
            mark: Some(Mark::Added),
        };
        if let Some(idx) = self.free_list.pop() {
            let generation = self.generations[idx].saturating_add(1);
            self.generations[idx] = generation;
            self.entries[idx] = Some(entry(generation));
            Key::new(idx, generation)
        } else {
            self.entries.push(Some(entry(1)));
            self.generations.push(1);
            Key::new(self.entries.len() - 1, 1)
        }
    }

    /// Update an existing AABB. Unchanged boxes are not re-staged.
    pub fn update(&mut self, key: Key, aabb: Aabb2D<T>) {
        if let Some(e) = self.entry_mut(key) {
            if e.aabb == aabb || matches!(e.mark, Some(Mark::Removed)) {
                return;
            }
            e.aabb = aabb;
            if e.mark.is_none() {
                e.mark = Some(Mark::Updated);
            }
        }
    }

    /// Remove an existing AABB.
    pub fn remove(&mut self, key: Key) {
        if let Some(e) = self.entry_mut(key) {
            if matches!(e.mark, Some(Mark::Added)) {
                self.entries[key.idx()] = None;
                self.free_list.push(key.idx());
            } else {
                e.mark = Some(Mark::Removed);
            }
        }
    }

    /// Clear the index, including the backend.
    pub fn clear(&mut self) {
        for (idx, slot) in self.entries.iter_mut().enumerate() {
            if slot.take().is_some() {
                self.free_list.push(idx);
            }
        }
        self.backend.clear();
    }

    /// Number of live entries, staged or committed.
    pub fn len(&self) -> usize {
        self.entries
            .iter()
            .flatten()
            .filter(|e| !matches!(e.mark, Some(Mark::Removed)))
            .count()
    }

    /// Whether [`len`](Self::len) is zero.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Apply staged changes to the backend. Returns how many entries changed.
    pub fn commit(&mut self) -> usize {
        let mut changed = 0;
        for i in 0..self.entries.len() {
            let Some(entry) = self.entries[i].as_mut() else {
                continue;
            };
            match entry.mark.take() {
                Some(Mark::Added) => {
                    self.backend.insert(i, entry.aabb);
                    entry.live = Some(entry.aabb);
                }
                Some(Mark::Updated) => {
                    self.backend.update(i, entry.aabb);
                    entry.live = Some(entry.aabb);
                }
                Some(Mark::Removed) => {
                    self.backend.remove(i);
                    self.entries[i] = None;
                    self.free_list.push(i);
                }
                None => continue,
            }
            changed += 1;
        }
        changed
    }

    /// Committed entries whose AABB contains the point, in slot order.
    pub fn query_point(&self, x: T, y: T) -> impl Iterator<Item = (Key, P)> + '_ {
        let mut slots = Vec::new();
        self.backend.query_point(x, y, &mut slots);
        slots.into_iter().filter_map(move |i| {
            let (key, aabb, payload) = self.committed(i)?;
            aabb.contains_point(x, y).then_some((key, payload))
        })
    }

    /// Committed entries whose AABB overlaps the rectangle, in slot order.
    pub fn query_rect(&self, rect: Aabb2D<T>) -> impl Iterator<Item = (Key, P)> + '_ {
        let mut slots = Vec::new();
        self.backend.query_rect(rect, &mut slots);
        slots.into_iter().filter_map(move |i| {
            let (key, aabb, payload) = self.committed(i)?;
            aabb.overlaps(&rect).then_some((key, payload))
        })
    }

    /// An entry as of the last commit.
    fn committed(&self, slot: usize) -> Option<(Key, Aabb2D<T>, P)> {
        let e = self.entries.get(slot)?.as_ref()?;
        Some((Key::new(slot, e.generation), e.live?, e.payload))
    }

    fn entry_mut(&mut self, key: Key) -> Option<&mut Entry<T, P>> {
        let e = self.entries.get_mut(key.idx())?.as_mut()?;
        if e.generation != key.1 {
            return None;
        }
        Some(e)
    }
}

/// Default index using a flat vector backend.
pub type Index<T, P> = IndexGeneric<T, P, FlatVec<T>>;

/// Index over a uniform `f64` grid.
pub type GridIndex<P> = IndexGeneric<f64, P, GridF64>;

impl<T: Copy + PartialOrd + Debug, P: Copy + Debug> Default for Index<T, P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: Copy + Debug> GridIndex<P> {
    /// Create a grid-backed index with the given cell size and origin at zero.
    pub fn with_uniform_grid(cell_w: f64, cell_h: f64) -> Self {
        Self::with_backend(GridF64::new(cell_w, cell_h, 0.0, 0.0))
    }
}
