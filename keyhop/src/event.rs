// Copyright 2025 the Keyhop Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Event normalizer: raw host events to automaton inputs.
//!
//! The host feeds every key press and focus change it sees. The normalizer
//! drops what the session must never react to (events another handler
//! already consumed, presses of a bare modifier key) and classifies focus
//! changes so that entering an editable element is its own input kind.

use alloc::string::String;

use keyhop_automaton::Input;

use crate::host::Surface;

/// Identity of a pressed key.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Key {
    /// A key that produces a single character.
    Char(char),
    /// The Escape key.
    Escape,
    /// The Backspace key.
    Backspace,
    /// Any other named key (`"Tab"`, `"ArrowDown"`, `"Shift"`, ...).
    Named(String),
}

/// Host key names that only change the state of other keys.
const MODIFIER_KEYS: &[&str] = &[
    "Alt",
    "AltGraph",
    "CapsLock",
    "Control",
    "Fn",
    "FnLock",
    "Hyper",
    "Meta",
    "NumLock",
    "OS",
    "ScrollLock",
    "Shift",
    "Super",
    "Symbol",
    "SymbolLock",
];

impl Key {
    /// Build a key from the host's key name.
    ///
    /// Single characters become [`Key::Char`]; `"Escape"`/`"Esc"` and
    /// `"Backspace"` get their own variants; anything else is kept by name.
    pub fn from_name(name: &str) -> Self {
        let mut chars = name.chars();
        if let (Some(c), None) = (chars.next(), chars.next()) {
            return Self::Char(c);
        }
        match name {
            "Escape" | "Esc" => Self::Escape,
            "Backspace" => Self::Backspace,
            _ => Self::Named(name.into()),
        }
    }

    /// Whether this is a modifier key pressed on its own.
    pub fn is_modifier(&self) -> bool {
        matches!(self, Self::Named(name) if MODIFIER_KEYS.contains(&name.as_str()))
    }

    /// Append the key's text, uppercased, to `buf`.
    pub(crate) fn push_upper(&self, buf: &mut String) {
        match self {
            Self::Char(c) => buf.extend(c.to_uppercase()),
            Self::Escape => buf.push_str("ESCAPE"),
            Self::Backspace => buf.push_str("BACKSPACE"),
            Self::Named(name) => buf.push_str(&name.to_uppercase()),
        }
    }
}

impl From<char> for Key {
    fn from(c: char) -> Self {
        Self::Char(c)
    }
}

bitflags::bitflags! {
    /// Modifier keys held during a key press.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct Modifiers: u8 {
        /// Shift.
        const SHIFT = 0b0001;
        /// Control.
        const CTRL  = 0b0010;
        /// Alt / Option.
        const ALT   = 0b0100;
        /// Meta / Command / Windows.
        const META  = 0b1000;
    }
}

/// Kind of a normalized input.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum InputKind {
    /// A key press.
    Key,
    /// Focus moved to a non-editable element.
    Focus,
    /// An element lost focus.
    Blur,
    /// Focus moved into an editable element.
    FocusInput,
}

/// Input as the automaton sees it; the payload is the modifier state.
pub type KeyInput = Input<InputKind, Key, Modifiers>;

/// An event as delivered by the host wiring layer.
#[derive(Clone, Debug, PartialEq)]
pub enum RawEvent<E> {
    /// A key went down.
    KeyDown {
        /// The key.
        key: Key,
        /// Modifiers held at the time.
        modifiers: Modifiers,
        /// Another handler already consumed the event.
        default_prevented: bool,
    },
    /// `target` received focus.
    Focus {
        /// The focused element.
        target: E,
    },
    /// `target` lost focus.
    Blur {
        /// The blurred element.
        target: E,
    },
}

impl<E> RawEvent<E> {
    /// A plain key press from a host key name.
    pub fn key(name: &str) -> Self {
        Self::key_with(name, Modifiers::empty())
    }

    /// A key press with modifiers held.
    pub fn key_with(name: &str, modifiers: Modifiers) -> Self {
        Self::KeyDown {
            key: Key::from_name(name),
            modifiers,
            default_prevented: false,
        }
    }
}

/// Map a raw event to an automaton input, or `None` if it is not relevant.
pub fn normalize<S: Surface + ?Sized>(
    surface: &S,
    raw: &RawEvent<S::Element>,
) -> Option<KeyInput> {
    match raw {
        RawEvent::KeyDown {
            key,
            modifiers,
            default_prevented,
        } => {
            if *default_prevented || key.is_modifier() {
                return None;
            }
            Some(Input {
                kind: InputKind::Key,
                value: Some(key.clone()),
                raw: *modifiers,
            })
        }
        RawEvent::Focus { target } => {
            let kind = if surface.is_editable(*target) {
                InputKind::FocusInput
            } else {
                InputKind::Focus
            };
            Some(Input {
                kind,
                value: None,
                raw: Modifiers::empty(),
            })
        }
        RawEvent::Blur { .. } => Some(Input {
            kind: InputKind::Blur,
            value: None,
            raw: Modifiers::empty(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_names() {
        assert_eq!(Key::from_name("f"), Key::Char('f'));
        assert_eq!(Key::from_name("F"), Key::Char('F'));
        assert_eq!(Key::from_name("é"), Key::Char('é'));
        assert_eq!(Key::from_name("Escape"), Key::Escape);
        assert_eq!(Key::from_name("Backspace"), Key::Backspace);
        assert_eq!(Key::from_name("Tab"), Key::Named("Tab".into()));
        assert!(Key::from_name("Shift").is_modifier());
        assert!(Key::from_name("AltGraph").is_modifier());
        assert!(!Key::from_name("Tab").is_modifier());
        assert!(!Key::from_name("s").is_modifier());
    }

    #[test]
    fn uppercased_text() {
        let mut buf = String::new();
        Key::Char('a').push_upper(&mut buf);
        Key::Char('ß').push_upper(&mut buf);
        Key::Named("Tab".into()).push_upper(&mut buf);
        assert_eq!(buf, "ASSTAB");
    }

    #[cfg(feature = "scene_adapter")]
    mod with_scene {
        use super::super::*;
        use crate::adapters::scene::SceneHost;
        use keyhop_scene::{LocalNode, Scene, Tag};
        use kurbo::{Rect, Size};

        #[test]
        fn drops_consumed_and_modifier_presses() {
            let host = SceneHost::new(Scene::new(Size::new(100.0, 100.0)));
            let consumed = RawEvent::KeyDown {
                key: Key::Char('f'),
                modifiers: Modifiers::empty(),
                default_prevented: true,
            };
            assert_eq!(normalize(&host, &consumed), None);
            assert_eq!(normalize(&host, &RawEvent::key("Control")), None);

            let input = normalize(&host, &RawEvent::key_with("f", Modifiers::CTRL)).unwrap();
            assert_eq!(input.kind, InputKind::Key);
            assert_eq!(input.value, Some(Key::Char('f')));
            assert_eq!(input.raw, Modifiers::CTRL);
        }

        #[test]
        fn focus_on_editable_is_focus_input() {
            let mut scene = Scene::new(Size::new(100.0, 100.0));
            let body = scene.insert(None, LocalNode::new(Tag::Body, Rect::new(0., 0., 100., 100.)));
            let field = scene.insert(Some(body), LocalNode::new(Tag::TextArea, Rect::ZERO));
            let link = scene.insert(Some(body), LocalNode::link(Rect::ZERO, "/a"));
            let host = SceneHost::new(scene);

            let kind = |raw: RawEvent<_>| normalize(&host, &raw).map(|i| i.kind);
            assert_eq!(kind(RawEvent::Focus { target: field }), Some(InputKind::FocusInput));
            assert_eq!(kind(RawEvent::Focus { target: link }), Some(InputKind::Focus));
            assert_eq!(kind(RawEvent::Blur { target: field }), Some(InputKind::Blur));
        }
    }
}
