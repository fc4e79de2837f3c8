// Copyright 2025 the Keyhop Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core scene implementation: structure, updates, queries.

use alloc::string::String;
use alloc::vec::Vec;
use keyhop_index::{Aabb2D, GridIndex, Key as AabbKey};
use kurbo::{Affine, Point, Rect, Size, Vec2};

use crate::types::{Attributes, Cursor, LocalNode, NodeFlags, NodeId, Tag};

/// Side of a hit-test grid cell, in page units.
const INDEX_CELL: f64 = 128.0;

/// A document-like visual tree with a scrollable viewport.
///
/// Coordinates are page coordinates: the origin is the top-left of the
/// document, and the viewport shows the region starting at [`Scene::scroll`].
#[derive(Clone)]
pub struct Scene {
    nodes: Vec<Option<Node>>, // slots
    generations: Vec<u32>,    // last generation per slot (persists across frees)
    free_list: Vec<usize>,
    roots: Vec<NodeId>,
    scroll: Vec2,
    viewport: Size,
    index: GridIndex<NodeId>,
    body: Option<NodeId>,
}

impl core::fmt::Debug for Scene {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let total = self.nodes.len();
        let alive = self.nodes.iter().filter(|n| n.is_some()).count();
        f.debug_struct("Scene")
            .field("nodes_total", &total)
            .field("nodes_alive", &alive)
            .field("free_list", &self.free_list.len())
            .field("index", &self.index)
            .field("scroll", &self.scroll)
            .field("viewport", &self.viewport)
            .finish_non_exhaustive()
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new(Size::new(1024.0, 768.0))
    }
}

/// Results of a hit test.
#[derive(Clone, Debug)]
pub struct Hit {
    /// The matched node.
    pub node: NodeId,
    /// Path from root to node (inclusive).
    pub path: Vec<NodeId>,
}

/// Filters applied during hit testing.
#[derive(Clone, Copy, Debug, Default)]
pub struct QueryFilter {
    /// If true, skip nodes that are hidden themselves or through an ancestor.
    pub visible_only: bool,
    /// If true, only consider nodes marked [`NodeFlags::PICKABLE`].
    pub pickable_only: bool,
}

impl QueryFilter {
    /// What a pointer would hit: visible and pickable nodes only.
    pub const POINTER: Self = Self {
        visible_only: true,
        pickable_only: true,
    };
}

#[derive(Clone, Debug)]
struct WorldNode {
    transform: Affine,
    bounds: Rect,
    visible: bool,
    // Position in document order.
    order: u32,
}

impl Default for WorldNode {
    fn default() -> Self {
        Self {
            transform: Affine::IDENTITY,
            bounds: Rect::ZERO,
            visible: true,
            order: 0,
        }
    }
}

#[derive(Clone, Debug)]
struct Node {
    generation: u32,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    local: LocalNode,
    world: WorldNode,
    index_key: Option<AabbKey>,
}

impl Node {
    fn new(generation: u32, local: LocalNode) -> Self {
        Self {
            generation,
            parent: None,
            children: Vec::new(),
            local,
            world: WorldNode::default(),
            index_key: None,
        }
    }
}

impl Scene {
    /// Create an empty scene with the given viewport size and no scroll.
    pub fn new(viewport: Size) -> Self {
        Self {
            nodes: Vec::new(),
            generations: Vec::new(),
            free_list: Vec::new(),
            roots: Vec::new(),
            scroll: Vec2::ZERO,
            viewport,
            index: GridIndex::with_uniform_grid(INDEX_CELL, INDEX_CELL),
            body: None,
        }
    }

    /// Insert a new node as the last child of `parent` (or as a root if `None`).
    ///
    /// A stale `parent` inserts a root.
    pub fn insert(&mut self, parent: Option<NodeId>, local: LocalNode) -> NodeId {
        let (idx, generation) = if let Some(idx) = self.free_list.pop() {
            let generation = self.generations[idx].saturating_add(1);
            self.generations[idx] = generation;
            self.nodes[idx] = Some(Node::new(generation, local));
            (idx, generation)
        } else {
            let generation = 1_u32;
            self.nodes.push(Some(Node::new(generation, local)));
            self.generations.push(generation);
            (self.nodes.len() - 1, generation)
        };
        #[allow(
            clippy::cast_possible_truncation,
            reason = "NodeId uses 32-bit indices by design."
        )]
        let id = NodeId::new(idx as u32, generation);
        self.link(id, parent);
        id
    }

    /// Remove a node and its subtree.
    pub fn remove(&mut self, id: NodeId) {
        if !self.is_alive(id) {
            return;
        }
        self.unlink(id);
        let mut stack = alloc::vec![id];
        while let Some(next) = stack.pop() {
            if let Some(node) = self.nodes[next.idx()].take() {
                if let Some(key) = node.index_key {
                    self.index.remove(key);
                }
                stack.extend(node.children);
                self.free_list.push(next.idx());
            }
        }
    }

    /// Move `id` to the end of `new_parent`'s children (or make it a root).
    ///
    /// Moving a node under its own descendant is ignored.
    pub fn reparent(&mut self, id: NodeId, new_parent: Option<NodeId>) {
        if !self.is_alive(id) {
            return;
        }
        if let Some(p) = new_parent
            && self.contains(id, p)
        {
            return;
        }
        self.unlink(id);
        self.link(id, new_parent);
    }

    /// Update local bounds.
    pub fn set_local_bounds(&mut self, id: NodeId, bounds: Rect) {
        if let Some(n) = self.node_opt_mut(id) {
            n.local.local_bounds = bounds;
        }
    }

    /// Update local transform.
    pub fn set_local_transform(&mut self, id: NodeId, tf: Affine) {
        if let Some(n) = self.node_opt_mut(id) {
            n.local.local_transform = tf;
        }
    }

    /// Update z index.
    pub fn set_z_index(&mut self, id: NodeId, z: i32) {
        if let Some(n) = self.node_opt_mut(id) {
            n.local.z_index = z;
        }
    }

    /// Update node flags.
    pub fn set_flags(&mut self, id: NodeId, flags: NodeFlags) {
        if let Some(n) = self.node_opt_mut(id) {
            n.local.flags = flags;
        }
    }

    /// Update the declared cursor (`None` inherits).
    pub fn set_cursor(&mut self, id: NodeId, cursor: Option<Cursor>) {
        if let Some(n) = self.node_opt_mut(id) {
            n.local.cursor = cursor;
        }
    }

    /// Update interaction attributes.
    pub fn set_attributes(&mut self, id: NodeId, attributes: Attributes) {
        if let Some(n) = self.node_opt_mut(id) {
            n.local.attributes = attributes;
        }
    }

    /// Update the hyperlink address.
    pub fn set_href(&mut self, id: NodeId, href: Option<String>) {
        if let Some(n) = self.node_opt_mut(id) {
            n.local.href = href;
        }
    }

    /// Scroll the viewport to `offset` (page coordinates of its top-left corner).
    pub fn set_scroll(&mut self, offset: Vec2) {
        self.scroll = offset;
    }

    /// Current scroll offset.
    pub fn scroll(&self) -> Vec2 {
        self.scroll
    }

    /// Resize the viewport.
    pub fn set_viewport_size(&mut self, size: Size) {
        self.viewport = size;
    }

    /// Viewport size.
    pub fn viewport_size(&self) -> Size {
        self.viewport
    }

    /// Recompute world transforms, bounds, inherited visibility, document
    /// order, the hit-test index, and the body element.
    ///
    /// Geometry queries read the values computed by the last commit.
    pub fn commit(&mut self) {
        let mut stack: Vec<(NodeId, Affine, bool)> = self
            .roots
            .iter()
            .rev()
            .map(|r| (*r, Affine::IDENTITY, true))
            .collect();
        let mut order = 0_u32;
        let mut body = None;
        while let Some((id, parent_tf, parent_visible)) = stack.pop() {
            let Some(node) = self
                .nodes
                .get_mut(id.idx())
                .and_then(Option::as_mut)
                .filter(|n| n.generation == id.1)
            else {
                continue;
            };
            let transform = parent_tf * node.local.local_transform;
            let visible = parent_visible && node.local.flags.contains(NodeFlags::VISIBLE);
            let bounds = transform_rect_bbox(transform, node.local.local_bounds);
            node.world = WorldNode {
                transform,
                bounds,
                visible,
                order,
            };
            order = order.saturating_add(1);
            if body.is_none() && node.local.tag == Tag::Body {
                body = Some(id);
            }
            let aabb = rect_to_aabb(bounds);
            match node.index_key {
                Some(key) => self.index.update(key, aabb),
                None => node.index_key = Some(self.index.insert(aabb, id)),
            }
            stack.extend(node.children.iter().rev().map(|c| (*c, transform, visible)));
        }
        self.index.commit();
        self.body = body;
    }

    /// Returns true if `id` refers to a live node.
    ///
    /// See [`NodeId`] docs for the generational semantics.
    pub fn is_alive(&self, id: NodeId) -> bool {
        self.node_opt(id).is_some()
    }

    /// Local data of a live node.
    pub fn local(&self, id: NodeId) -> Option<&LocalNode> {
        self.node_opt(id).map(|n| &n.local)
    }

    /// Tag of a live node.
    pub fn tag(&self, id: NodeId) -> Option<Tag> {
        self.node_opt(id).map(|n| n.local.tag)
    }

    /// Returns the z-index of a node if the identifier is live.
    pub fn z_index(&self, id: NodeId) -> Option<i32> {
        self.node_opt(id).map(|n| n.local.z_index)
    }

    /// Parent of a live node; `None` for roots and stale ids.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node_opt(id).and_then(|n| n.parent)
    }

    /// Children of a live node in document order.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.node_opt(id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    /// Root nodes in document order.
    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    /// The first [`Tag::Body`] element in document order, as of the last commit.
    pub fn body(&self) -> Option<NodeId> {
        self.body.filter(|b| self.is_alive(*b))
    }

    /// All live nodes in document (pre-)order.
    pub fn document_order(&self) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.roots.iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            let Some(node) = self.node_opt(id) else {
                continue;
            };
            out.push(id);
            stack.extend(node.children.iter().rev().copied());
        }
        out
    }

    /// Whether `node` is `ancestor` or lies inside its subtree.
    pub fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut cur = Some(node);
        while let Some(id) = cur {
            if !self.is_alive(id) {
                return false;
            }
            if id == ancestor {
                return true;
            }
            cur = self.parent(id);
        }
        false
    }

    /// Whether the node and all its ancestors are visible, as of the last commit.
    pub fn is_rendered(&self, id: NodeId) -> bool {
        self.node_opt(id).is_some_and(|n| n.world.visible)
    }

    /// World (page-space) bounds as of the last commit.
    pub fn world_bounds(&self, id: NodeId) -> Option<Rect> {
        self.node_opt(id).map(|n| n.world.bounds)
    }

    /// Bounds relative to the viewport's top-left corner.
    ///
    /// Nodes that are not rendered report [`Rect::ZERO`], like a box with
    /// `display: none`.
    pub fn viewport_bounds(&self, id: NodeId) -> Option<Rect> {
        let node = self.node_opt(id)?;
        if !node.world.visible {
            return Some(Rect::ZERO);
        }
        Some(node.world.bounds - self.scroll)
    }

    /// Cursor in effect for a node: its own declaration or the nearest ancestor's.
    pub fn resolved_cursor(&self, id: NodeId) -> Option<Cursor> {
        let mut cur = Some(id);
        while let Some(node) = cur.and_then(|i| self.node_opt(i)) {
            if let Some(cursor) = node.local.cursor {
                return Some(cursor);
            }
            cur = node.parent;
        }
        self.is_alive(id).then_some(Cursor::Auto)
    }

    /// Whether the node sits inside (or is) a `contenteditable` region.
    pub fn is_content_editable(&self, id: NodeId) -> bool {
        let mut cur = Some(id);
        while let Some(node) = cur.and_then(|i| self.node_opt(i)) {
            if node.local.attributes.contains(Attributes::CONTENT_EDITABLE) {
                return true;
            }
            cur = node.parent;
        }
        false
    }

    /// Whether typing into this node edits text: form fields and editable regions.
    pub fn is_editable(&self, id: NodeId) -> bool {
        matches!(
            self.tag(id),
            Some(Tag::Input | Tag::TextArea | Tag::Select)
        ) || self.is_content_editable(id)
    }

    /// Hit test a page-space point. Returns the topmost node.
    ///
    /// The highest `z_index` wins; on equal z, the node later in document
    /// order (drawn later) wins, so descendants beat their ancestors.
    ///
    /// Only nodes present at the last commit are considered.
    pub fn hit_test_point(&self, pt: Point, filter: QueryFilter) -> Option<Hit> {
        let mut best: Option<(NodeId, (i32, u32))> = None;
        for (_, id) in self.index.query_point(pt.x, pt.y) {
            let Some(node) = self.node_opt(id) else {
                continue;
            };
            if filter.visible_only && !node.world.visible {
                continue;
            }
            if filter.pickable_only && !node.local.flags.contains(NodeFlags::PICKABLE) {
                continue;
            }
            if !node.world.bounds.contains(pt) {
                continue;
            }
            let rank = (node.local.z_index, node.world.order);
            if best.is_none_or(|(_, best_rank)| rank > best_rank) {
                best = Some((id, rank));
            }
        }
        best.map(|(node, _)| Hit {
            node,
            path: self.path_to_root(node),
        })
    }

    /// Hit test a point given relative to the viewport.
    pub fn hit_test_viewport_point(&self, pt: Point, filter: QueryFilter) -> Option<Hit> {
        self.hit_test_point(pt + self.scroll, filter)
    }

    // --- internals ---

    fn node_opt(&self, id: NodeId) -> Option<&Node> {
        let n = self.nodes.get(id.idx())?.as_ref()?;
        (n.generation == id.1).then_some(n)
    }

    fn node_opt_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        let n = self.nodes.get_mut(id.idx())?.as_mut()?;
        if n.generation != id.1 {
            return None;
        }
        Some(n)
    }

    fn link(&mut self, id: NodeId, parent: Option<NodeId>) {
        match parent.filter(|p| self.is_alive(*p)) {
            Some(p) => {
                if let Some(parent_node) = self.node_opt_mut(p) {
                    parent_node.children.push(id);
                }
                if let Some(node) = self.node_opt_mut(id) {
                    node.parent = Some(p);
                }
            }
            None => self.roots.push(id),
        }
    }

    fn unlink(&mut self, id: NodeId) {
        let parent = self.node_opt_mut(id).and_then(|n| n.parent.take());
        match parent {
            Some(p) => {
                if let Some(parent_node) = self.node_opt_mut(p) {
                    parent_node.children.retain(|c| *c != id);
                }
            }
            None => self.roots.retain(|r| *r != id),
        }
    }

    fn path_to_root(&self, mut id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        loop {
            out.push(id);
            match self.parent(id) {
                Some(p) => id = p,
                None => break,
            }
        }
        out.reverse();
        out
    }
}

fn rect_to_aabb(r: Rect) -> Aabb2D<f64> {
    let r = r.abs();
    Aabb2D::new(r.x0, r.y0, r.x1, r.y1)
}

fn transform_rect_bbox(affine: Affine, rect: Rect) -> Rect {
    let p0 = affine * Point::new(rect.x0, rect.y0);
    let p1 = affine * Point::new(rect.x1, rect.y0);
    let p2 = affine * Point::new(rect.x0, rect.y1);
    let p3 = affine * Point::new(rect.x1, rect.y1);
    let min_x = p0.x.min(p1.x).min(p2.x).min(p3.x);
    let min_y = p0.y.min(p1.y).min(p2.y).min(p3.y);
    let max_x = p0.x.max(p1.x).max(p2.x).max(p3.x);
    let max_y = p0.y.max(p1.y).max(p2.y).max(p3.y);
    Rect::new(min_x, min_y, max_x, max_y)
}
