// Copyright 2025 the Keyhop Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Host interfaces: what the session reads from and does to the outside world.
//!
//! The session never touches a real document. It queries a [`Surface`],
//! draws labels through an [`Overlay`], triggers elements through an
//! [`Actuator`], and asks a [`Scheduler`] for timers and deferred turns.
//! A type implementing all four is a [`Host`].

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt::Debug;
use core::time::Duration;

use kurbo::{Point, Rect, Size, Vec2};

use crate::event::Modifiers;
use crate::labels::Hint;

/// Semantic role of an element, as far as clickability is concerned.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub enum Role {
    /// Nothing interactive by itself.
    #[default]
    None,
    /// Hyperlink.
    Link,
    /// Disclosure widget (`<summary>`).
    Disclosure,
    /// Push button.
    Button,
    /// Text field or other form control.
    FormControl,
    /// Nested browsing context.
    Frame,
}

bitflags::bitflags! {
    /// Markup hints that make an element interactive regardless of its role.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct Affordances: u8 {
        /// Declares `role="button"`.
        const ROLE_BUTTON      = 0b001;
        /// Has an inline click handler.
        const CLICK_HANDLER    = 0b010;
        /// Carries a `contenteditable` attribute.
        const CONTENT_EDITABLE = 0b100;
    }
}

/// What an element is, for interactivity checks.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub struct Semantics {
    /// Semantic role.
    pub role: Role,
    /// Extra interactive markup.
    pub affordances: Affordances,
}

impl Semantics {
    /// Whether the role or markup alone make the element clickable.
    pub fn is_interactive(&self) -> bool {
        self.role != Role::None || !self.affordances.is_empty()
    }
}

/// Resolved mouse cursor of an element.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub enum Cursor {
    /// Browser default.
    #[default]
    Auto,
    /// Hand cursor; the page signals that the element is clickable.
    Pointer,
    /// Any other cursor.
    Other,
}

/// Visible region of the document.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Viewport {
    /// Size of the visible region.
    pub size: Size,
    /// Page coordinates of the region's top-left corner.
    pub scroll: Vec2,
}

impl Viewport {
    /// Center of the visible region, in viewport coordinates.
    pub fn center(&self) -> Point {
        Point::new(self.size.width / 2.0, self.size.height / 2.0)
    }
}

/// Synthetic pointer events fired at a selected element.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum PointerEventKind {
    /// Pointer entered the element.
    Over,
    /// Button pressed.
    Down,
    /// Button released.
    Up,
    /// Click.
    Click,
}

impl PointerEventKind {
    /// The order a real click produces.
    pub const CLICK_SEQUENCE: [Self; 4] = [Self::Over, Self::Down, Self::Up, Self::Click];
}

/// Handle of a scheduled timer.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct TimerId(pub u64);

/// Read-only view of the visual tree.
///
/// All geometry is in viewport coordinates (origin at the visible region's
/// top-left), except [`Viewport::scroll`].
pub trait Surface {
    /// Non-owning element handle. The order only needs to be consistent.
    type Element: Copy + Ord + Debug;

    /// Every element, in document order.
    fn elements(&self) -> Vec<Self::Element>;
    /// Parent element, or `None` at the root.
    fn parent(&self, element: Self::Element) -> Option<Self::Element>;
    /// Direct children in document order.
    fn children(&self, element: Self::Element) -> Vec<Self::Element>;
    /// Whether `node` is `ancestor` or one of its descendants.
    fn contains(&self, ancestor: Self::Element, node: Self::Element) -> bool;
    /// Bounding box, or `None` if the element is no longer in the tree.
    ///
    /// Elements that are not rendered report a zero-sized box.
    fn bounds(&self, element: Self::Element) -> Option<Rect>;
    /// The visible region.
    fn viewport(&self) -> Viewport;
    /// Resolved cursor.
    fn cursor(&self, element: Self::Element) -> Cursor;
    /// Role and interactive markup.
    fn semantics(&self, element: Self::Element) -> Semantics;
    /// Resolved address, for hyperlinks that have one.
    fn href(&self, element: Self::Element) -> Option<String>;
    /// Resolved z-index; `auto` is `0`.
    fn z_index(&self, element: Self::Element) -> i32;
    /// Topmost element under a point.
    fn element_at_point(&self, point: Point) -> Option<Self::Element>;
    /// The element holding focus.
    fn active_element(&self) -> Option<Self::Element>;
    /// Whether `element` is the document body.
    fn is_body(&self, element: Self::Element) -> bool;
    /// Whether typing into `element` edits text.
    fn is_editable(&self, element: Self::Element) -> bool;
}

/// Renders labels above the page.
pub trait Overlay<E> {
    /// Draw a fresh set of labels.
    fn show(&mut self, hints: &[Hint<E>]);
    /// Show one label with its first `typed` characters de-emphasized.
    fn narrow(&mut self, hint: &Hint<E>, typed: usize);
    /// Hide one label.
    fn hide(&mut self, hint: &Hint<E>);
    /// Remove every label.
    fn clear(&mut self);
}

/// Side effects on the page once a target is chosen.
pub trait Actuator<E> {
    /// Give focus to `element`.
    fn focus(&mut self, element: E);
    /// Take focus away from `element`.
    fn blur(&mut self, element: E);
    /// Take focus away from the whole window.
    fn blur_window(&mut self);
    /// Fire a synthetic pointer event.
    fn dispatch_pointer(&mut self, element: E, kind: PointerEventKind, modifiers: Modifiers);
    /// Put `text` on the clipboard.
    fn write_clipboard(&mut self, text: &str);
}

/// Timers and deferred work.
pub trait Scheduler {
    /// Call back [`Session::on_timer`](crate::session::Session::on_timer) after `delay`.
    fn schedule(&mut self, delay: Duration) -> TimerId;
    /// Forget a timer. Unknown ids are ignored.
    fn cancel(&mut self, id: TimerId);
    /// Call back [`Session::run_deferred`](crate::session::Session::run_deferred)
    /// on the next turn of the task queue.
    fn request_turn(&mut self);
}

/// Everything a [`Session`](crate::session::Session) needs from its environment.
pub trait Host: Surface + Overlay<Self::Element> + Actuator<Self::Element> + Scheduler {}

impl<T> Host for T where T: Surface + Overlay<T::Element> + Actuator<T::Element> + Scheduler {}
