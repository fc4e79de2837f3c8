// Copyright 2025 the Keyhop Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The navigation mode switcher: states, actions, and the transition table.
//!
//! | From | Input | To | Action |
//! |---|---|---|---|
//! | Inactive | yank chord key | Yank | [`Action::ArmChord`] |
//! | Inactive | activate key | Active | [`Action::Activate`] |
//! | Inactive | Escape | Inactive | [`Action::Unfocus`] |
//! | Inactive | escape chord key | Escaped | [`Action::ArmChord`] |
//! | Inactive | focus into a field | Disabled | none |
//! | Disabled | blur | Inactive | none |
//! | Disabled | Escape | Inactive | [`Action::Unfocus`] |
//! | Yank | escape chord key | Escaped | [`Action::RearmChord`] |
//! | Yank | activate key | Active | [`Action::ActivateYank`] |
//! | Yank | anything | Inactive | [`Action::CancelChord`] |
//! | Escaped | anything | Inactive | [`Action::CancelChord`] |
//! | Active | any key | Active | [`Action::Filter`] |
//! | Active | Escape | Inactive | [`Action::Deactivate`] |
//! | Active | focus into a field | Disabled | [`Action::Deactivate`] |

use keyhop_automaton::{Automaton, Matcher};

use crate::config::Keymap;
use crate::event::{InputKind, Key};

/// Session states.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Mode {
    /// Resting; only trigger keys are intercepted.
    #[default]
    Inactive,
    /// Waiting for the second key of the copy-link chord.
    Yank,
    /// Labels are shown; every key goes to the filter.
    Active,
    /// Waiting for the key the escape chord lets through.
    Escaped,
    /// An editable element has focus; keys pass through.
    Disabled,
}

/// Tagged actions evaluated by the session.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Action {
    /// Suppress the key and arm a revert to the given mode.
    ArmChord(Mode),
    /// Show labels, unless a modifier is held.
    Activate,
    /// Blur the focused element, or the window if that is the body.
    Unfocus,
    /// Cancel the pending revert and arm a new one to the given mode.
    RearmChord(Mode),
    /// Cancel the pending revert and show labels in copy mode.
    ActivateYank,
    /// Cancel the pending revert.
    CancelChord,
    /// Suppress the key and feed it to the filter.
    Filter,
    /// Suppress the key and remove the labels.
    Deactivate,
}

/// The automaton the session runs.
pub type ModeAutomaton = Automaton<Mode, InputKind, Key, Action>;

/// Build the transition table for `keys`. The automaton is left uninitialized.
pub fn build_automaton(keys: &Keymap) -> ModeAutomaton {
    use Mode::*;

    type M = Matcher<InputKind, Key>;
    let key = |k: Key| M::exact(InputKind::Key, k);
    let activate = || key(Key::Char(keys.activate));
    let yank = || key(Key::Char(keys.yank_chord));
    let escape_chord = || key(Key::Char(keys.escape_chord));
    let escape = || key(Key::Escape);
    let any = || M::ANY;

    let mut fsm = ModeAutomaton::new();
    fsm.add_transition(Inactive, Some(Yank), yank(), Action::ArmChord(Inactive))
        .add_transition(Inactive, Some(Active), activate(), Action::Activate)
        .add_transition(Inactive, Some(Inactive), escape(), Action::Unfocus)
        .add_transition(Inactive, Some(Escaped), escape_chord(), Action::ArmChord(Inactive))
        .add_transition(Inactive, Some(Disabled), M::kind(InputKind::FocusInput), None::<Action>)
        .add_transition(Disabled, Some(Inactive), M::kind(InputKind::Blur), None::<Action>)
        .add_transition(Disabled, Some(Inactive), escape(), Action::Unfocus)
        .add_transition(Yank, Some(Escaped), escape_chord(), Action::RearmChord(Inactive))
        .add_transition(Yank, Some(Active), activate(), Action::ActivateYank)
        .add_transition(Yank, Some(Inactive), any(), Action::CancelChord)
        .add_transition(Escaped, Some(Inactive), any(), Action::CancelChord)
        .add_transition(Active, Some(Active), M::kind(InputKind::Key), Action::Filter)
        .add_transition(Active, Some(Inactive), escape(), Action::Deactivate)
        .add_transition(Active, Some(Disabled), M::kind(InputKind::FocusInput), Action::Deactivate);
    fsm
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{KeyInput, Modifiers};
    use keyhop_automaton::{Input, Resolved};

    fn key(name: &str) -> KeyInput {
        Input {
            kind: InputKind::Key,
            value: Some(Key::from_name(name)),
            raw: Modifiers::empty(),
        }
    }

    fn bare(kind: InputKind) -> KeyInput {
        Input {
            kind,
            value: None,
            raw: Modifiers::empty(),
        }
    }

    fn lookup(from: Mode, input: &KeyInput) -> Option<(Option<Mode>, Option<Action>)> {
        let mut fsm = build_automaton(&Keymap::default());
        fsm.set_state(from);
        fsm.resolve(input)
            .unwrap()
            .map(|Resolved { to, action, .. }| (to, action))
    }

    #[test]
    fn every_mode_is_declared() {
        let fsm = build_automaton(&Keymap::default());
        for mode in [Mode::Inactive, Mode::Yank, Mode::Active, Mode::Escaped, Mode::Disabled] {
            assert!(fsm.contains_state(&mode), "{mode:?} missing");
        }
        assert_eq!(fsm.state(), None);
    }

    #[test]
    fn resting_intercepts_only_trigger_keys() {
        assert_eq!(
            lookup(Mode::Inactive, &key("f")),
            Some((Some(Mode::Active), Some(Action::Activate)))
        );
        assert_eq!(
            lookup(Mode::Inactive, &key("y")),
            Some((Some(Mode::Yank), Some(Action::ArmChord(Mode::Inactive))))
        );
        assert_eq!(lookup(Mode::Inactive, &key("j")), None);
        assert_eq!(lookup(Mode::Inactive, &bare(InputKind::Blur)), None);
        assert_eq!(
            lookup(Mode::Inactive, &bare(InputKind::FocusInput)),
            Some((Some(Mode::Disabled), None))
        );
    }

    #[test]
    fn escape_beats_filter_while_active() {
        assert_eq!(
            lookup(Mode::Active, &key("Escape")),
            Some((Some(Mode::Inactive), Some(Action::Deactivate)))
        );
        assert_eq!(
            lookup(Mode::Active, &key("a")),
            Some((Some(Mode::Active), Some(Action::Filter)))
        );
        assert_eq!(lookup(Mode::Active, &bare(InputKind::Focus)), None);
    }

    #[test]
    fn trigger_keys_only_match_key_presses() {
        let focus_carrying_f = Input {
            kind: InputKind::Focus,
            value: Some(Key::Char('f')),
            raw: Modifiers::empty(),
        };
        assert_eq!(lookup(Mode::Inactive, &focus_carrying_f), None);
        assert_eq!(
            lookup(Mode::Active, &key("Escape")).and_then(|(_, action)| action),
            Some(Action::Deactivate)
        );
    }

    #[test]
    fn chord_states_fall_back_to_cancel() {
        assert_eq!(
            lookup(Mode::Yank, &key("f")),
            Some((Some(Mode::Active), Some(Action::ActivateYank)))
        );
        assert_eq!(
            lookup(Mode::Yank, &key(",")),
            Some((Some(Mode::Escaped), Some(Action::RearmChord(Mode::Inactive))))
        );
        for input in [key("y"), key("Tab"), bare(InputKind::Focus)] {
            assert_eq!(
                lookup(Mode::Yank, &input),
                Some((Some(Mode::Inactive), Some(Action::CancelChord)))
            );
            assert_eq!(
                lookup(Mode::Escaped, &input),
                Some((Some(Mode::Inactive), Some(Action::CancelChord)))
            );
        }
    }

    #[test]
    fn disabled_passes_keys_through() {
        assert_eq!(lookup(Mode::Disabled, &key("f")), None);
        assert_eq!(
            lookup(Mode::Disabled, &bare(InputKind::Blur)),
            Some((Some(Mode::Inactive), None))
        );
        assert_eq!(
            lookup(Mode::Disabled, &key("Escape")),
            Some((Some(Mode::Inactive), Some(Action::Unfocus)))
        );
    }

    #[test]
    fn custom_keys() {
        let keys = Keymap {
            activate: 'g',
            yank_chord: 'c',
            escape_chord: ';',
        };
        let mut fsm = build_automaton(&keys);
        fsm.set_state(Mode::Inactive);
        assert!(fsm.resolve(&key("f")).unwrap().is_none());
        assert!(fsm.resolve(&key("g")).unwrap().is_some());
    }
}
