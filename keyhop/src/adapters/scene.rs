// Copyright 2025 the Keyhop Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Headless host over Keyhop Scene.
//!
//! ## Feature
//!
//! Enable with `scene_adapter`.
//!
//! ## Notes
//!
//! [`SceneHost`] answers every [`Surface`] query from a
//! [`keyhop_scene::Scene`] and records every side effect (labels, focus,
//! pointer events, clipboard writes, timers, turn requests) instead of
//! performing it. The wiring layer, or a test, decides when timers fire and
//! when the next turn runs by calling back into the session.
//!
//! The effect log is bounded: once it holds [`DEFAULT_EFFECT_LIMIT`]
//! entries (or the limit set with [`SceneHost::with_effect_limit`]), the
//! older half is dropped. A wiring layer that acts on effects should drain
//! them with [`SceneHost::take_effects`] after every call into the session.
//!
//! The scene must be committed before it is queried.

use alloc::string::String;
use alloc::vec::Vec;
use core::time::Duration;

use keyhop_scene::{Attributes, Cursor as SceneCursor, NodeId, QueryFilter, Scene, Tag};
use kurbo::{Point, Rect};
use tracing::trace;

use crate::event::Modifiers;
use crate::host::{
    Actuator, Affordances, Cursor, Overlay, PointerEventKind, Role, Scheduler, Semantics, Surface,
    TimerId, Viewport,
};
use crate::labels::{Hint, Label, Placement};

/// How many effects [`SceneHost`] keeps by default.
pub const DEFAULT_EFFECT_LIMIT: usize = 1024;

/// A label as the overlay currently draws it.
#[derive(Clone, Debug, PartialEq)]
pub struct Badge {
    /// Labeled element.
    pub element: NodeId,
    /// Label text.
    pub label: Label,
    /// Where it is drawn.
    pub placement: Placement,
    /// Leading characters drawn de-emphasized.
    pub typed: usize,
    /// Hidden by narrowing.
    pub hidden: bool,
}

/// A side effect the session asked for.
#[derive(Clone, Debug, PartialEq)]
pub enum HostEffect {
    /// Labels drawn.
    Show(usize),
    /// A label re-drawn with a typed prefix.
    Narrow {
        /// Labeled element.
        element: NodeId,
        /// Typed characters.
        typed: usize,
    },
    /// A label hidden.
    Hide(NodeId),
    /// All labels removed.
    ClearOverlay,
    /// Focus given to an element.
    Focus(NodeId),
    /// Focus taken from an element.
    Blur(NodeId),
    /// Focus taken from the window.
    BlurWindow,
    /// Synthetic pointer event.
    Pointer {
        /// Target element.
        element: NodeId,
        /// Event kind.
        kind: PointerEventKind,
        /// Modifiers carried by the event.
        modifiers: Modifiers,
    },
    /// Clipboard write.
    Clipboard(String),
    /// Timer scheduled.
    Schedule(TimerId, Duration),
    /// Timer canceled.
    CancelTimer(TimerId),
    /// Next turn requested.
    RequestTurn,
}

/// Recording host over a [`Scene`].
#[derive(Debug)]
pub struct SceneHost {
    scene: Scene,
    focused: Option<NodeId>,
    window_focused: bool,
    badges: Vec<Badge>,
    effects: Vec<HostEffect>,
    effect_limit: usize,
    clipboard: Option<String>,
    next_timer: u64,
    timers: Vec<TimerId>,
    turn_requested: bool,
}

impl SceneHost {
    /// Wrap a scene. Nothing has focus; the window does.
    pub fn new(scene: Scene) -> Self {
        Self {
            scene,
            focused: None,
            window_focused: true,
            badges: Vec::new(),
            effects: Vec::new(),
            effect_limit: DEFAULT_EFFECT_LIMIT,
            clipboard: None,
            next_timer: 0,
            timers: Vec::new(),
            turn_requested: false,
        }
    }

    /// Keep at most `limit` effects (at least two).
    pub fn with_effect_limit(mut self, limit: usize) -> Self {
        self.effect_limit = limit.max(2);
        self
    }

    /// The scene.
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// The scene, mutably. Commit after editing.
    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    /// Move focus without recording an effect, as the user would by clicking.
    pub fn set_focus(&mut self, element: Option<NodeId>) {
        self.focused = element;
    }

    /// The element holding focus, if any besides the body.
    pub fn focused(&self) -> Option<NodeId> {
        self.focused
    }

    /// Whether the window still has focus.
    pub fn window_focused(&self) -> bool {
        self.window_focused
    }

    /// Every label the overlay holds, hidden ones included.
    pub fn badges(&self) -> &[Badge] {
        &self.badges
    }

    /// Labels currently visible.
    pub fn visible_badges(&self) -> impl Iterator<Item = &Badge> + '_ {
        self.badges.iter().filter(|b| !b.hidden)
    }

    /// Recorded effects, oldest first.
    ///
    /// Only the most recent ones survive if the log was never drained.
    pub fn effects(&self) -> &[HostEffect] {
        &self.effects
    }

    /// Drain recorded effects.
    pub fn take_effects(&mut self) -> Vec<HostEffect> {
        core::mem::take(&mut self.effects)
    }

    /// Last clipboard write.
    pub fn clipboard(&self) -> Option<&str> {
        self.clipboard.as_deref()
    }

    /// Timers scheduled and not canceled, oldest first.
    pub fn pending_timers(&self) -> &[TimerId] {
        &self.timers
    }

    /// Forget a timer the wiring layer just fired.
    pub fn fire_timer(&mut self, id: TimerId) -> bool {
        let before = self.timers.len();
        self.timers.retain(|t| *t != id);
        self.timers.len() != before
    }

    /// Whether a turn was requested since the last call; resets the flag.
    pub fn take_turn_request(&mut self) -> bool {
        core::mem::take(&mut self.turn_requested)
    }

    fn record(&mut self, effect: HostEffect) {
        if self.effects.len() >= self.effect_limit {
            let dropped = self.effect_limit / 2;
            self.effects.drain(..dropped);
            trace!(dropped, "effect log trimmed");
        }
        self.effects.push(effect);
    }

    fn badge_mut(&mut self, element: NodeId) -> Option<&mut Badge> {
        self.badges.iter_mut().find(|b| b.element == element)
    }
}

impl Surface for SceneHost {
    type Element = NodeId;

    fn elements(&self) -> Vec<NodeId> {
        self.scene.document_order()
    }

    fn parent(&self, element: NodeId) -> Option<NodeId> {
        self.scene.parent(element)
    }

    fn children(&self, element: NodeId) -> Vec<NodeId> {
        self.scene.children(element).to_vec()
    }

    fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        self.scene.contains(ancestor, node)
    }

    fn bounds(&self, element: NodeId) -> Option<Rect> {
        self.scene.viewport_bounds(element)
    }

    fn viewport(&self) -> Viewport {
        Viewport {
            size: self.scene.viewport_size(),
            scroll: self.scene.scroll(),
        }
    }

    fn cursor(&self, element: NodeId) -> Cursor {
        match self.scene.resolved_cursor(element) {
            Some(SceneCursor::Pointer) => Cursor::Pointer,
            Some(SceneCursor::Auto) | None => Cursor::Auto,
            Some(_) => Cursor::Other,
        }
    }

    fn semantics(&self, element: NodeId) -> Semantics {
        let Some(local) = self.scene.local(element) else {
            return Semantics::default();
        };
        let role = match local.tag {
            Tag::Anchor => Role::Link,
            Tag::Summary => Role::Disclosure,
            Tag::Button => Role::Button,
            Tag::Input | Tag::TextArea | Tag::Select => Role::FormControl,
            Tag::IFrame => Role::Frame,
            _ => Role::None,
        };
        let mut affordances = Affordances::empty();
        affordances.set(
            Affordances::ROLE_BUTTON,
            local.attributes.contains(Attributes::ROLE_BUTTON),
        );
        affordances.set(
            Affordances::CLICK_HANDLER,
            local.attributes.contains(Attributes::ONCLICK),
        );
        affordances.set(
            Affordances::CONTENT_EDITABLE,
            local.attributes.contains(Attributes::CONTENT_EDITABLE),
        );
        Semantics { role, affordances }
    }

    fn href(&self, element: NodeId) -> Option<String> {
        let local = self.scene.local(element)?;
        if local.tag != Tag::Anchor {
            return None;
        }
        local.href.clone()
    }

    fn z_index(&self, element: NodeId) -> i32 {
        self.scene.z_index(element).unwrap_or(0)
    }

    fn element_at_point(&self, point: Point) -> Option<NodeId> {
        self.scene
            .hit_test_viewport_point(point, QueryFilter::POINTER)
            .map(|hit| hit.node)
    }

    fn active_element(&self) -> Option<NodeId> {
        self.focused
            .filter(|f| self.scene.is_alive(*f))
            .or_else(|| self.scene.body())
    }

    fn is_body(&self, element: NodeId) -> bool {
        self.scene.tag(element) == Some(Tag::Body)
    }

    fn is_editable(&self, element: NodeId) -> bool {
        self.scene.is_editable(element)
    }
}

impl Overlay<NodeId> for SceneHost {
    fn show(&mut self, hints: &[Hint<NodeId>]) {
        self.badges = hints
            .iter()
            .map(|h| Badge {
                element: h.element,
                label: h.label.clone(),
                placement: h.placement,
                typed: 0,
                hidden: false,
            })
            .collect();
        self.record(HostEffect::Show(hints.len()));
    }

    fn narrow(&mut self, hint: &Hint<NodeId>, typed: usize) {
        if let Some(badge) = self.badge_mut(hint.element) {
            badge.typed = typed;
            badge.hidden = false;
        }
        self.record(HostEffect::Narrow {
            element: hint.element,
            typed,
        });
    }

    fn hide(&mut self, hint: &Hint<NodeId>) {
        if let Some(badge) = self.badge_mut(hint.element) {
            badge.hidden = true;
        }
        self.record(HostEffect::Hide(hint.element));
    }

    fn clear(&mut self) {
        self.badges.clear();
        self.record(HostEffect::ClearOverlay);
    }
}

impl Actuator<NodeId> for SceneHost {
    fn focus(&mut self, element: NodeId) {
        self.focused = Some(element);
        self.record(HostEffect::Focus(element));
    }

    fn blur(&mut self, element: NodeId) {
        if self.focused == Some(element) {
            self.focused = None;
        }
        self.record(HostEffect::Blur(element));
    }

    fn blur_window(&mut self) {
        self.window_focused = false;
        self.record(HostEffect::BlurWindow);
    }

    fn dispatch_pointer(&mut self, element: NodeId, kind: PointerEventKind, modifiers: Modifiers) {
        self.record(HostEffect::Pointer {
            element,
            kind,
            modifiers,
        });
    }

    fn write_clipboard(&mut self, text: &str) {
        self.clipboard = Some(text.into());
        self.record(HostEffect::Clipboard(text.into()));
    }
}

impl Scheduler for SceneHost {
    fn schedule(&mut self, delay: Duration) -> TimerId {
        self.next_timer += 1;
        let id = TimerId(self.next_timer);
        self.timers.push(id);
        self.record(HostEffect::Schedule(id, delay));
        id
    }

    fn cancel(&mut self, id: TimerId) {
        self.timers.retain(|t| *t != id);
        self.record(HostEffect::CancelTimer(id));
    }

    fn request_turn(&mut self) {
        self.turn_requested = true;
        self.record(HostEffect::RequestTurn);
    }
}
