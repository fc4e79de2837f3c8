// Copyright 2025 the Keyhop Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! End-to-end sessions over a recording scene host.

#![cfg(feature = "scene_adapter")]

use core::time::Duration;

use keyhop::adapters::scene::{HostEffect, SceneHost};
use keyhop::config::Config;
use keyhop::event::{Modifiers, RawEvent};
use keyhop::host::{
    Actuator, Cursor, Overlay, PointerEventKind, Scheduler, Semantics, Surface, TimerId,
    Viewport,
};
use keyhop::labels::Hint;
use keyhop::mode::Mode;
use keyhop::session::{Disposition, Session};
use keyhop::{DiscoveryError, Error};
use keyhop_scene::{LocalNode, NodeId, Scene, Tag};
use kurbo::{Point, Rect, Size};

struct Page {
    scene: Scene,
    body: NodeId,
}

impl Page {
    fn new() -> Self {
        let mut scene = Scene::new(Size::new(800.0, 600.0));
        let html = scene.insert(None, LocalNode::new(Tag::Html, Rect::new(0., 0., 800., 600.)));
        let body = scene.insert(Some(html), LocalNode::new(Tag::Body, Rect::new(0., 0., 800., 600.)));
        Self { scene, body }
    }

    fn add(&mut self, node: LocalNode) -> NodeId {
        self.scene.insert(Some(self.body), node)
    }

    fn button(&mut self, x: f64, y: f64) -> NodeId {
        self.add(LocalNode::new(Tag::Button, Rect::new(x, y, x + 60.0, y + 30.0)))
    }

    fn session(self, config: Config) -> Session<SceneHost> {
        let mut scene = self.scene;
        scene.commit();
        Session::new(SceneHost::new(scene), config).unwrap()
    }
}

fn press(session: &mut Session<SceneHost>, key: &str) -> Disposition {
    session.handle(RawEvent::key(key)).unwrap()
}

fn clicks(host: &SceneHost) -> Vec<(NodeId, PointerEventKind)> {
    host.effects()
        .iter()
        .filter_map(|e| match e {
            HostEffect::Pointer { element, kind, .. } => Some((*element, *kind)),
            _ => None,
        })
        .collect()
}

fn shows(host: &SceneHost) -> usize {
    host.effects()
        .iter()
        .filter(|e| matches!(e, HostEffect::Show(_)))
        .count()
}

#[test]
fn typing_a_label_narrows_then_selects() {
    let mut page = Page::new();
    // Ordered by distance of the top-left corner from (400, 300).
    let nearest = page.button(390.0, 290.0);
    let second = page.button(300.0, 350.0);
    let _third = page.button(100.0, 100.0);
    let _far = page.button(0.0, 0.0);
    let mut session = page.session(Config::default().with_alphabet("ASD"));

    assert_eq!(press(&mut session, "f"), Disposition::Suppress);
    assert_eq!(session.mode(), Mode::Active);
    let labels: Vec<_> = session.hints().iter().map(|h| h.label.as_str()).collect();
    assert_eq!(labels, ["AA", "AS", "AD", "SA"]);
    assert_eq!(session.hints()[1].element, second);

    assert_eq!(press(&mut session, "a"), Disposition::Suppress);
    assert_eq!(session.mode(), Mode::Active);
    assert_eq!(session.filter_text(), "A");
    let visible: Vec<_> = session
        .host()
        .visible_badges()
        .map(|b| (b.label.as_str(), b.typed))
        .collect();
    assert_eq!(visible, [("AA", 1), ("AS", 1), ("AD", 1)]);

    assert_eq!(press(&mut session, "a"), Disposition::Suppress);
    assert_eq!(session.mode(), Mode::Inactive);
    assert_eq!(session.filter_text(), "");
    assert!(!session.is_overlay_active());
    assert!(session.host().badges().is_empty());
    assert!(clicks(session.host()).is_empty(), "selection waits for the next turn");

    assert!(session.host_mut().take_turn_request());
    session.run_deferred();
    assert_eq!(
        clicks(session.host()),
        PointerEventKind::CLICK_SEQUENCE.map(|kind| (nearest, kind))
    );
}

#[test]
fn modifier_held_aborts_activation() {
    let mut page = Page::new();
    page.button(10.0, 10.0);
    let mut session = page.session(Config::default());

    let disposition = session
        .handle(RawEvent::key_with("f", Modifiers::CTRL))
        .unwrap();
    assert_eq!(disposition, Disposition::PassThrough);
    assert_eq!(session.mode(), Mode::Inactive);
    assert_eq!(shows(session.host()), 0);
    assert!(!session.is_overlay_active());
}

#[test]
fn unrelated_key_cancels_chord_immediately() {
    let mut page = Page::new();
    page.button(10.0, 10.0);
    let mut session = page.session(Config::default());

    assert_eq!(press(&mut session, "y"), Disposition::Suppress);
    assert_eq!(session.mode(), Mode::Yank);
    let timer = session.host().pending_timers()[0];

    assert_eq!(press(&mut session, "j"), Disposition::PassThrough);
    assert_eq!(session.mode(), Mode::Inactive);
    assert!(session.host().pending_timers().is_empty());
    assert!(session
        .host()
        .effects()
        .contains(&HostEffect::CancelTimer(timer)));

    // A late callback for the canceled timer must not disturb a new activation.
    press(&mut session, "f");
    assert_eq!(session.mode(), Mode::Active);
    session.on_timer(timer);
    assert_eq!(session.mode(), Mode::Active);
}

#[test]
fn chord_reverts_after_timeout() {
    let page = Page::new();
    let mut session = page.session(Config::default().with_chord_timeout(Duration::from_millis(300)));

    press(&mut session, ",");
    assert_eq!(session.mode(), Mode::Escaped);
    assert!(session
        .host()
        .effects()
        .iter()
        .any(|e| matches!(e, HostEffect::Schedule(_, d) if *d == Duration::from_millis(300))));
    let timer = session.host().pending_timers()[0];
    assert!(session.host_mut().fire_timer(timer));
    session.on_timer(timer);
    assert_eq!(session.mode(), Mode::Inactive);
}

#[test]
fn escape_chord_lets_next_key_through() {
    let mut page = Page::new();
    page.button(10.0, 10.0);
    let mut session = page.session(Config::default());

    assert_eq!(press(&mut session, ","), Disposition::Suppress);
    assert_eq!(press(&mut session, "f"), Disposition::PassThrough);
    assert_eq!(session.mode(), Mode::Inactive);
    assert_eq!(shows(session.host()), 0);
}

#[test]
fn yank_then_escape_chord_rearms() {
    let page = Page::new();
    let mut session = page.session(Config::default());

    press(&mut session, "y");
    let first = session.host().pending_timers()[0];
    assert_eq!(press(&mut session, ","), Disposition::Suppress);
    assert_eq!(session.mode(), Mode::Escaped);
    let pending = session.host().pending_timers().to_vec();
    assert_eq!(pending.len(), 1);
    assert_ne!(pending[0], first);

    session.on_timer(first);
    assert_eq!(session.mode(), Mode::Escaped, "stale timer ignored");
    session.on_timer(pending[0]);
    assert_eq!(session.mode(), Mode::Inactive);
}

#[test]
fn focus_into_field_while_active_disables() {
    let mut page = Page::new();
    page.button(10.0, 10.0);
    let field = page.add(LocalNode::new(Tag::Input, Rect::new(100., 10., 300., 40.)));
    let mut session = page.session(Config::default());

    press(&mut session, "f");
    assert!(session.is_overlay_active());

    session.handle(RawEvent::Focus { target: field }).unwrap();
    assert_eq!(session.mode(), Mode::Disabled);
    assert!(!session.is_overlay_active());
    assert!(session.host().badges().is_empty());

    // Keys pass through while the field has focus.
    assert_eq!(press(&mut session, "f"), Disposition::PassThrough);
    assert_eq!(session.mode(), Mode::Disabled);

    session.handle(RawEvent::Blur { target: field }).unwrap();
    assert_eq!(session.mode(), Mode::Inactive);
}

#[test]
fn chord_interrupted_by_field_focus_disables() {
    let mut page = Page::new();
    let field = page.add(LocalNode::new(Tag::TextArea, Rect::new(100., 10., 300., 140.)));
    let mut session = page.session(Config::default());

    press(&mut session, "y");
    session.handle(RawEvent::Focus { target: field }).unwrap();
    assert_eq!(session.mode(), Mode::Disabled);
    assert!(session.host().pending_timers().is_empty());
}

#[test]
fn escape_clears_overlay() {
    let mut page = Page::new();
    page.button(10.0, 10.0);
    page.button(100.0, 10.0);
    let mut session = page.session(Config::default());

    press(&mut session, "f");
    assert_eq!(session.hints().len(), 2);
    assert_eq!(press(&mut session, "Escape"), Disposition::Suppress);
    assert_eq!(session.mode(), Mode::Inactive);
    assert!(!session.is_overlay_active());
    assert_eq!(session.host().effects().last(), Some(&HostEffect::ClearOverlay));
}

#[test]
fn unmatched_prefix_returns_to_rest() {
    let mut page = Page::new();
    page.button(10.0, 10.0);
    page.button(100.0, 10.0);
    let mut session = page.session(Config::default());

    press(&mut session, "f");
    assert_eq!(press(&mut session, "x"), Disposition::Suppress);
    assert_eq!(session.mode(), Mode::Inactive);
    assert_eq!(session.filter_text(), "");
    assert!(clicks(session.host()).is_empty());
}

#[test]
fn backspace_undoes_narrowing() {
    let mut page = Page::new();
    for i in 0..16 {
        page.button(10.0 + 70.0 * f64::from(i % 8), 10.0 + 50.0 * f64::from(i / 8));
    }
    let mut session = page.session(Config::default());

    press(&mut session, "f");
    assert_eq!(session.hints().len(), 16);
    assert_eq!(session.hints()[0].label.width(), 2);

    press(&mut session, "a");
    assert_eq!(session.host().visible_badges().count(), 15);
    press(&mut session, "Backspace");
    assert_eq!(session.filter_text(), "");
    assert_eq!(session.host().visible_badges().count(), 16);
    assert_eq!(session.mode(), Mode::Active);

    // The sixteenth label is the only one under the second letter.
    press(&mut session, "s");
    assert_eq!(session.mode(), Mode::Inactive);
    assert!(session.context().pending().is_some());
}

#[test]
fn no_targets_still_activates() {
    let page = Page::new();
    let mut session = page.session(Config::default());

    assert_eq!(press(&mut session, "f"), Disposition::Suppress);
    assert_eq!(session.mode(), Mode::Active);
    assert!(session.hints().is_empty());
    assert_eq!(shows(session.host()), 0);

    press(&mut session, "a");
    assert_eq!(session.mode(), Mode::Inactive);
}

#[test]
fn copy_mode_copies_link_address() {
    let mut page = Page::new();
    page.button(10.0, 10.0);
    let link = page.add(LocalNode::link(Rect::new(100., 10., 200., 30.), "https://example.com/docs"));
    let mut session = page.session(Config::default());

    press(&mut session, "y");
    assert_eq!(press(&mut session, "f"), Disposition::Suppress);
    assert!(session.is_copy_mode());
    assert_eq!(session.hints().len(), 1);
    assert_eq!(session.hints()[0].element, link);
    assert!(session.host().pending_timers().is_empty());

    press(&mut session, "a");
    assert!(!session.is_copy_mode(), "reset with the overlay");
    session.run_deferred();
    assert_eq!(session.host().clipboard(), Some("https://example.com/docs"));
    assert!(clicks(session.host()).is_empty());
}

#[test]
fn aborted_copy_activation_resets_copy_mode() {
    let mut page = Page::new();
    page.add(LocalNode::link(Rect::new(100., 10., 200., 30.), "/a"));
    let mut session = page.session(Config::default());

    press(&mut session, "y");
    session
        .handle(RawEvent::key_with("f", Modifiers::META))
        .unwrap();
    assert_eq!(session.mode(), Mode::Inactive);
    assert!(!session.is_copy_mode());
    assert!(session.host().pending_timers().is_empty());
}

#[test]
fn pending_selection_runs_before_next_input() {
    let mut page = Page::new();
    let only = page.button(10.0, 10.0);
    let mut session = page.session(Config::default());

    press(&mut session, "f");
    press(&mut session, "a");
    session.host_mut().take_effects();
    // The host did not get to its next turn before the user pressed `f` again.
    press(&mut session, "f");
    let effects = session.host().effects();
    let first_click = effects
        .iter()
        .position(|e| matches!(e, HostEffect::Pointer { element, .. } if *element == only));
    let show = effects.iter().position(|e| matches!(e, HostEffect::Show(_)));
    assert!(first_click.unwrap() < show.unwrap());
    session.run_deferred();
    assert_eq!(clicks(session.host()).len(), 4, "selection runs exactly once");
}

#[test]
fn selecting_a_field_focuses_it_and_keeps_modifiers() {
    let mut page = Page::new();
    let field = page.add(LocalNode::new(Tag::Input, Rect::new(10., 10., 200., 40.)));
    let mut session = page.session(Config::default());

    press(&mut session, "f");
    session
        .handle(RawEvent::key_with("a", Modifiers::SHIFT))
        .unwrap();
    session.run_deferred();
    let effects = session.host().effects();
    let focus = effects.iter().position(|e| *e == HostEffect::Focus(field));
    assert!(focus.is_some());
    assert!(effects.contains(&HostEffect::Pointer {
        element: field,
        kind: PointerEventKind::Click,
        modifiers: Modifiers::SHIFT,
    }));
    assert_eq!(session.host().focused(), Some(field));
}

#[test]
fn escape_at_rest_blurs() {
    let mut page = Page::new();
    let link = page.add(LocalNode::link(Rect::new(10., 10., 100., 30.), "/a"));
    let mut session = page.session(Config::default());

    // Only the body has focus: the window is blurred.
    assert_eq!(press(&mut session, "Escape"), Disposition::PassThrough);
    assert!(!session.host().window_focused());

    session.host_mut().set_focus(Some(link));
    press(&mut session, "Escape");
    assert_eq!(session.host().focused(), None);
    assert_eq!(session.host().effects().last(), Some(&HostEffect::Blur(link)));
}

#[test]
fn starts_disabled_inside_a_field() {
    let mut page = Page::new();
    let field = page.add(LocalNode::new(Tag::TextArea, Rect::new(10., 10., 200., 90.)));
    let mut scene = page.scene;
    scene.commit();
    let mut host = SceneHost::new(scene);
    host.set_focus(Some(field));
    let mut session = Session::new(host, Config::default()).unwrap();
    assert_eq!(session.mode(), Mode::Disabled);

    // Escape inside the field blurs it and returns to rest.
    press(&mut session, "Escape");
    assert_eq!(session.mode(), Mode::Inactive);
    assert_eq!(session.host().focused(), None);
}

#[test]
fn public_activate_and_clear_are_idempotent() {
    let mut page = Page::new();
    page.button(10.0, 10.0);
    page.button(100.0, 10.0);
    let mut session = page.session(Config::default());

    session.activate().unwrap();
    session.activate().unwrap();
    assert_eq!(session.mode(), Mode::Active);
    assert_eq!(shows(session.host()), 1);

    session.clear();
    session.clear();
    assert_eq!(session.mode(), Mode::Inactive);
    let clears = session
        .host()
        .effects()
        .iter()
        .filter(|e| **e == HostEffect::ClearOverlay)
        .count();
    assert_eq!(clears, 1);
}

#[test]
fn invalid_config_is_rejected() {
    let page = Page::new();
    let mut scene = page.scene;
    scene.commit();
    let err = Session::new(SceneHost::new(scene), Config::default().with_alphabet("a")).unwrap_err();
    assert!(matches!(err, keyhop::Error::Config(_)));
}

/// Scene host that loses the geometry of one element, as when a node is
/// detached between enumeration and measurement.
struct Detaching {
    inner: SceneHost,
    gone: Option<NodeId>,
}

impl Surface for Detaching {
    type Element = NodeId;

    fn elements(&self) -> Vec<NodeId> {
        self.inner.elements()
    }
    fn parent(&self, element: NodeId) -> Option<NodeId> {
        self.inner.parent(element)
    }
    fn children(&self, element: NodeId) -> Vec<NodeId> {
        self.inner.children(element)
    }
    fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        self.inner.contains(ancestor, node)
    }
    fn bounds(&self, element: NodeId) -> Option<Rect> {
        if self.gone == Some(element) {
            return None;
        }
        self.inner.bounds(element)
    }
    fn viewport(&self) -> Viewport {
        self.inner.viewport()
    }
    fn cursor(&self, element: NodeId) -> Cursor {
        self.inner.cursor(element)
    }
    fn semantics(&self, element: NodeId) -> Semantics {
        self.inner.semantics(element)
    }
    fn href(&self, element: NodeId) -> Option<String> {
        self.inner.href(element)
    }
    fn z_index(&self, element: NodeId) -> i32 {
        self.inner.z_index(element)
    }
    fn element_at_point(&self, point: Point) -> Option<NodeId> {
        self.inner.element_at_point(point)
    }
    fn active_element(&self) -> Option<NodeId> {
        self.inner.active_element()
    }
    fn is_body(&self, element: NodeId) -> bool {
        self.inner.is_body(element)
    }
    fn is_editable(&self, element: NodeId) -> bool {
        self.inner.is_editable(element)
    }
}

impl Overlay<NodeId> for Detaching {
    fn show(&mut self, hints: &[Hint<NodeId>]) {
        self.inner.show(hints);
    }
    fn narrow(&mut self, hint: &Hint<NodeId>, typed: usize) {
        self.inner.narrow(hint, typed);
    }
    fn hide(&mut self, hint: &Hint<NodeId>) {
        self.inner.hide(hint);
    }
    fn clear(&mut self) {
        Overlay::clear(&mut self.inner);
    }
}

impl Actuator<NodeId> for Detaching {
    fn focus(&mut self, element: NodeId) {
        self.inner.focus(element);
    }
    fn blur(&mut self, element: NodeId) {
        self.inner.blur(element);
    }
    fn blur_window(&mut self) {
        self.inner.blur_window();
    }
    fn dispatch_pointer(&mut self, element: NodeId, kind: PointerEventKind, modifiers: Modifiers) {
        self.inner.dispatch_pointer(element, kind, modifiers);
    }
    fn write_clipboard(&mut self, text: &str) {
        self.inner.write_clipboard(text);
    }
}

impl Scheduler for Detaching {
    fn schedule(&mut self, delay: Duration) -> TimerId {
        self.inner.schedule(delay)
    }
    fn cancel(&mut self, id: TimerId) {
        self.inner.cancel(id);
    }
    fn request_turn(&mut self) {
        self.inner.request_turn();
    }
}

fn assert_at_rest(session: &Session<Detaching>) {
    assert_eq!(session.mode(), Mode::Inactive);
    assert!(session.hints().is_empty());
    assert!(!session.is_overlay_active());
    assert!(!session.is_copy_mode());
    assert_eq!(session.filter_text(), "");
    let host = &session.host().inner;
    assert!(host.badges().is_empty());
    assert!(host.pending_timers().is_empty(), "{:?}", host.pending_timers());
}

#[test]
fn detached_element_aborts_activation() {
    let mut page = Page::new();
    page.button(10.0, 10.0);
    let gone = page.button(100.0, 10.0);
    page.button(200.0, 10.0);
    let mut scene = page.scene;
    scene.commit();
    let host = Detaching {
        inner: SceneHost::new(scene),
        gone: Some(gone),
    };
    let mut session = Session::new(host, Config::default()).unwrap();

    assert_eq!(
        session.handle(RawEvent::key("f")).unwrap(),
        Disposition::Suppress
    );
    assert_at_rest(&session);

    session.handle(RawEvent::key("y")).unwrap();
    assert_eq!(session.mode(), Mode::Yank);
    assert_eq!(session.host().inner.pending_timers().len(), 1);
    session.handle(RawEvent::key("f")).unwrap();
    assert_at_rest(&session);

    let err = session.activate().unwrap_err();
    assert!(
        matches!(err, Error::Discovery(DiscoveryError::Detached(_))),
        "{err}"
    );
    assert_at_rest(&session);
    assert_eq!(shows(&session.host().inner), 0);

    // The next activation works once the geometry is back.
    session.host_mut().gone = None;
    session.handle(RawEvent::key("f")).unwrap();
    assert_eq!(session.mode(), Mode::Active);
    assert_eq!(session.hints().len(), 3);
}
