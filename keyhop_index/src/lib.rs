// Copyright 2025 the Keyhop Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Keyhop Index: a 2D AABB index for hit testing.
//!
//! - Insert, update, and remove axis-aligned bounding boxes (AABBs) with user payloads.
//! - Query by point or overlapping rectangle.
//! - Batch updates with [`IndexGeneric::commit`]; queries observe the last commit.
//!
//! It does not depend on any geometry crate. Higher layers (like the scene)
//! compute world-space boxes and feed them here.
//!
//! Backends are pluggable via [`Backend`]. The default is a flat vector
//! (linear scan); [`GridF64`] is a uniform grid for `f64` coordinates, where a
//! point query only visits one cell.
//!
//! # Example
//!
//! ```rust
//! use keyhop_index::{Aabb2D, GridIndex};
//!
//! let mut idx: GridIndex<u32> = GridIndex::with_uniform_grid(64.0, 64.0);
//! let k1 = idx.insert(Aabb2D::new(0.0, 0.0, 10.0, 10.0), 1);
//! idx.insert(Aabb2D::new(5.0, 5.0, 15.0, 15.0), 2);
//! idx.commit();
//!
//! idx.update(k1, Aabb2D::new(20.0, 0.0, 30.0, 10.0));
//! idx.commit();
//!
//! let hits: Vec<_> = idx.query_point(6.0, 6.0).map(|(_, p)| p).collect();
//! assert_eq!(hits, [2]);
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod backend;
pub mod backends;
mod index;
mod types;

pub use backend::Backend;
pub use backends::flatvec::FlatVec;
pub use backends::grid::GridF64;
pub use index::{GridIndex, Index, IndexGeneric, Key};
pub use types::Aabb2D;
