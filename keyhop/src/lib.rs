// Copyright 2025 the Keyhop Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Keyhop: keyboard hint navigation.
//!
//! ## Overview
//!
//! Press a trigger key and every clickable element on screen gets a short
//! letter label; type a label and that element is clicked (or, in copy mode,
//! its link address is copied). The crate contains the decision logic only:
//! reading the page, drawing labels, and clicking go through host traits.
//!
//! ## Pieces
//!
//! - [`event`]: raw host events to automaton inputs.
//! - [`mode`]: modes, tagged actions, and the transition table run by
//!   [`keyhop_automaton`].
//! - [`discovery`]: which elements are worth labeling.
//! - [`labels`]: fixed-width labels ordered by distance from the viewport center.
//! - [`filter`]: narrowing labels as keys are typed.
//! - [`chord`]: the single timer behind two-key chords.
//! - [`session`]: everything above wired to one [`host::Host`].
//! - [`adapters::scene`]: a recording host over [`keyhop_scene`] (feature `scene_adapter`).
//!
//! ## Keys
//!
//! With the default [`Keymap`](config::Keymap):
//!
//! - `f` shows labels; `y` then `f` shows labels that copy link addresses.
//! - `Escape` hides labels, or blurs the focused element when none are shown.
//! - `,` lets the next key through to the page untouched.
//! - While an editable element has focus, only `Escape` is intercepted.
//!
//! ## Example
//!
//! ```
//! # #[cfg(feature = "scene_adapter")] {
//! use keyhop::adapters::scene::SceneHost;
//! use keyhop::config::Config;
//! use keyhop::event::RawEvent;
//! use keyhop::mode::Mode;
//! use keyhop::session::{Disposition, Session};
//! use keyhop_scene::{LocalNode, Scene, Tag};
//! use kurbo::{Rect, Size};
//!
//! let mut scene = Scene::new(Size::new(800.0, 600.0));
//! let body = scene.insert(None, LocalNode::new(Tag::Body, Rect::new(0.0, 0.0, 800.0, 600.0)));
//! let button = scene.insert(Some(body), LocalNode::new(Tag::Button, Rect::new(10.0, 10.0, 90.0, 40.0)));
//! scene.commit();
//!
//! let mut session = Session::new(SceneHost::new(scene), Config::default()).unwrap();
//! assert_eq!(session.handle(RawEvent::key("f")).unwrap(), Disposition::Suppress);
//! assert_eq!(session.mode(), Mode::Active);
//! assert_eq!(session.hints()[0].label.as_str(), "A");
//!
//! session.handle(RawEvent::key("a")).unwrap();
//! assert_eq!(session.mode(), Mode::Inactive);
//! session.run_deferred();
//! assert!(!session.host().effects().is_empty());
//! # let _ = button;
//! # }
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

pub mod adapters;
pub mod chord;
pub mod config;
pub mod discovery;
pub mod error;
pub mod event;
pub mod filter;
pub mod host;
pub mod labels;
pub mod mode;
pub mod session;

pub use config::Config;
pub use error::{ConfigError, DiscoveryError, Error};
pub use session::{Disposition, Session};
