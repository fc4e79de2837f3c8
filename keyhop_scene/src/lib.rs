// Copyright 2025 the Keyhop Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Keyhop Scene: a Kurbo-native visual tree of document elements.
//!
//! - Represents a hierarchy of elements with local bounds, transforms, z-order, and flags.
//! - Carries the element semantics keyboard navigation needs: tag, click handlers,
//!   button roles, editable regions, declared cursor, and link address.
//! - Provides point hit testing with CSS-like stacking (highest z, then last drawn).
//!   Hit tests go through a [`keyhop_index`] grid refreshed on commit.
//! - Models a scrollable viewport so page and viewport coordinates can both be queried.
//!
//! World data is recomputed by [`Scene::commit`]; queries observe the last commit.
//!
//! ## Not a layout engine
//!
//! This crate does not perform layout. Upstream code computes positions and
//! sizes and then updates the scene with the resulting boxes and transforms.
//!
//! ## API overview
//!
//! - [`Scene`]: container managing nodes, viewport, and scroll.
//! - [`LocalNode`]: per-node local data (geometry plus semantics).
//! - [`NodeFlags`]: visibility and picking controls.
//! - [`Attributes`]: click handlers, roles, editability.
//! - [`NodeId`]: generational handle of a node.
//! - [`QueryFilter`]: restricts hit results (visible/pickable).
//!
//! ### Minimal usage
//!
//! ```
//! use keyhop_scene::{LocalNode, QueryFilter, Scene, Tag};
//! use kurbo::{Point, Rect, Size};
//!
//! let mut scene = Scene::new(Size::new(800.0, 600.0));
//! let body = scene.insert(None, LocalNode::new(Tag::Body, Rect::new(0.0, 0.0, 800.0, 600.0)));
//! let link = scene.insert(
//!     Some(body),
//!     LocalNode::link(Rect::new(10.0, 10.0, 90.0, 30.0), "https://example.com/"),
//! );
//! scene.commit();
//!
//! let hit = scene.hit_test_point(Point::new(20.0, 20.0), QueryFilter::POINTER).unwrap();
//! assert_eq!(hit.node, link);
//! assert_eq!(hit.path, vec![body, link]);
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod scene;
mod types;

pub use scene::{Hit, QueryFilter, Scene};
pub use types::{Attributes, Cursor, LocalNode, NodeFlags, NodeId, Tag};
