// Copyright 2025 the Keyhop Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public types for the scene: node identifiers, flags, element semantics, and local geometry.

use alloc::string::String;
use kurbo::{Affine, Rect};

/// Identifier for a node in the scene.
///
/// This is a small, copyable handle that stays stable across updates but becomes
/// invalid when the underlying slot is reused.
/// It consists of a slot index and a generation counter.
///
/// ## Semantics
///
/// - On insert, a fresh slot is allocated with generation `1`.
/// - On remove, the slot is freed; any existing `NodeId` that pointed to that slot is now stale.
/// - On reuse of a freed slot, its generation is incremented, producing a new, distinct `NodeId`.
///
/// Use [`Scene::is_alive`](crate::Scene::is_alive) to check whether a `NodeId` still refers to a live node.
/// Stale `NodeId`s never alias a different live node because the generation must match.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u32, pub(crate) u32);

impl NodeId {
    pub(crate) const fn new(idx: u32, generation: u32) -> Self {
        Self(idx, generation)
    }

    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }
}

bitflags::bitflags! {
    /// Node flags controlling visibility and picking.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct NodeFlags: u8 {
        /// Node is rendered. Clearing it hides the whole subtree, like `display: none`.
        const VISIBLE  = 0b0000_0001;
        /// Node is pickable (participates in hit testing), like `pointer-events: auto`.
        const PICKABLE = 0b0000_0010;
    }
}

impl Default for NodeFlags {
    fn default() -> Self {
        Self::VISIBLE | Self::PICKABLE
    }
}

bitflags::bitflags! {
    /// Interaction attributes an element carries in markup.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct Attributes: u8 {
        /// An inline click handler (`onclick`).
        const ONCLICK          = 0b0000_0001;
        /// `role="button"`.
        const ROLE_BUTTON      = 0b0000_0010;
        /// `contenteditable` set to `""` or `"true"`. Inherited by descendants.
        const CONTENT_EDITABLE = 0b0000_0100;
    }
}

/// Element tag.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub enum Tag {
    /// Document root.
    Html,
    /// Document body.
    Body,
    /// Generic block container.
    #[default]
    Div,
    /// Generic inline container.
    Span,
    /// Hyperlink (`<a>`).
    Anchor,
    /// Disclosure widget summary.
    Summary,
    /// Push button.
    Button,
    /// Single-line form field.
    Input,
    /// Multi-line form field.
    TextArea,
    /// Drop-down form control.
    Select,
    /// Nested browsing context.
    IFrame,
    /// Image.
    Image,
}

/// Mouse cursor style as declared on an element.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub enum Cursor {
    /// Browser decides.
    #[default]
    Auto,
    /// Arrow.
    Default,
    /// Hand; the element looks clickable.
    Pointer,
    /// I-beam.
    Text,
    /// Anything else.
    Other,
}

/// Local description of an element: geometry plus semantics.
#[derive(Clone, Debug)]
pub struct LocalNode {
    /// Local (untransformed) bounds. For non-axis-aligned content, use a conservative AABB.
    pub local_bounds: Rect,
    /// Local transform relative to parent space.
    pub local_transform: Affine,
    /// Z-order within the parent. Higher is drawn on top; `0` stands in for `auto`.
    pub z_index: i32,
    /// Visibility and picking flags.
    pub flags: NodeFlags,
    /// Element tag.
    pub tag: Tag,
    /// Interaction attributes.
    pub attributes: Attributes,
    /// Declared cursor; `None` inherits from the parent.
    pub cursor: Option<Cursor>,
    /// Resolved hyperlink address, for anchors that have one.
    pub href: Option<String>,
}

impl Default for LocalNode {
    fn default() -> Self {
        Self {
            local_bounds: Rect::ZERO,
            local_transform: Affine::IDENTITY,
            z_index: 0,
            flags: NodeFlags::default(),
            tag: Tag::default(),
            attributes: Attributes::empty(),
            cursor: None,
            href: None,
        }
    }
}

impl LocalNode {
    /// A node with the given tag and bounds, everything else default.
    pub fn new(tag: Tag, local_bounds: Rect) -> Self {
        Self {
            tag,
            local_bounds,
            ..Default::default()
        }
    }

    /// An anchor with a resolved address.
    pub fn link(local_bounds: Rect, href: impl Into<String>) -> Self {
        Self {
            href: Some(href.into()),
            ..Self::new(Tag::Anchor, local_bounds)
        }
    }

    /// Set the declared cursor.
    #[must_use]
    pub fn with_cursor(mut self, cursor: Cursor) -> Self {
        self.cursor = Some(cursor);
        self
    }

    /// Add interaction attributes.
    #[must_use]
    pub fn with_attributes(mut self, attributes: Attributes) -> Self {
        self.attributes |= attributes;
        self
    }

    /// Set the z-index.
    #[must_use]
    pub fn with_z_index(mut self, z_index: i32) -> Self {
        self.z_index = z_index;
        self
    }

    /// Replace the flags.
    #[must_use]
    pub fn with_flags(mut self, flags: NodeFlags) -> Self {
        self.flags = flags;
        self
    }
}
