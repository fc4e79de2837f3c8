// Copyright 2025 the Keyhop Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The session: one automaton, one host, one context.
//!
//! All session-scoped state lives in [`SessionContext`]. The automaton is
//! driven through [`Automaton::resolve`](keyhop_automaton::Automaton::resolve)
//! and [`Automaton::finish`](keyhop_automaton::Automaton::finish) so the
//! single action evaluator can borrow the host and the context mutably.
//!
//! ## Deferred selection
//!
//! A resolved selection is not carried out inside the dispatch that resolved
//! it. It is queued and the host is asked for a new turn; the host calls
//! [`Session::run_deferred`]. Any queued selection is also flushed at the start
//! of [`Session::handle`], so it always runs before the next input is
//! interpreted.

use alloc::vec::Vec;

use tracing::{debug, debug_span, trace, warn};

use crate::chord::ChordGuard;
use crate::config::Config;
use crate::discovery::{DiscoveryOptions, discover};
use crate::error::{DiscoveryError, Error};
use crate::event::{InputKind, KeyInput, Modifiers, RawEvent, normalize};
use crate::filter::{FilterOutcome, FilterState};
use crate::host::{Host, PointerEventKind};
use crate::labels::{Alphabet, Hint, assign_labels};
use crate::mode::{Action, Mode, ModeAutomaton, build_automaton};

/// What the host should do with the event it just fed.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub enum Disposition {
    /// Let the event continue to the page.
    #[default]
    PassThrough,
    /// Prevent the default action and stop propagation.
    Suppress,
}

/// A selection waiting for the next host turn.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Selection<E> {
    /// The chosen element.
    pub element: E,
    /// Copy the link address instead of clicking.
    pub copy: bool,
    /// Modifiers of the key press that resolved the selection.
    pub modifiers: Modifiers,
}

/// Mutable state of one session, reset as a unit.
#[derive(Clone, Debug)]
pub struct SessionContext<E> {
    filter: FilterState,
    hints: Vec<Hint<E>>,
    copy_mode: bool,
    chord: ChordGuard<Mode>,
    pending: Option<Selection<E>>,
}

impl<E> Default for SessionContext<E> {
    fn default() -> Self {
        Self {
            filter: FilterState::default(),
            hints: Vec::new(),
            copy_mode: false,
            chord: ChordGuard::default(),
            pending: None,
        }
    }
}

impl<E> SessionContext<E> {
    /// Drop labels, typed prefix, and copy mode together.
    pub fn reset(&mut self) {
        self.filter.clear();
        self.hints.clear();
        self.copy_mode = false;
    }

    /// Live labels.
    pub fn hints(&self) -> &[Hint<E>] {
        &self.hints
    }

    /// The typed prefix.
    pub fn filter_text(&self) -> &str {
        self.filter.text()
    }

    /// Whether the current activation copies links.
    pub fn is_copy_mode(&self) -> bool {
        self.copy_mode
    }

    /// The queued selection.
    pub fn pending(&self) -> Option<&Selection<E>> {
        self.pending.as_ref()
    }
}

/// Keyboard hint navigation over one host.
pub struct Session<H: Host> {
    fsm: ModeAutomaton,
    config: Config,
    alphabet: Alphabet,
    host: H,
    ctx: SessionContext<H::Element>,
}

impl<H: Host> core::fmt::Debug for Session<H> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Session")
            .field("mode", &self.fsm.state())
            .field("hints", &self.ctx.hints.len())
            .field("filter", &self.ctx.filter.text())
            .field("copy_mode", &self.ctx.copy_mode)
            .field("chord", &self.ctx.chord.pending())
            .finish_non_exhaustive()
    }
}

impl<H: Host> Session<H> {
    /// Validate `config`, build the transition table, and pick the initial mode.
    ///
    /// Starts [`Mode::Disabled`] when an editable element already has focus.
    pub fn new(host: H, config: Config) -> Result<Self, Error> {
        let alphabet = config.validate()?;
        let mut fsm = build_automaton(&config.keys);
        let initial = match host.active_element() {
            Some(el) if host.is_editable(el) => Mode::Disabled,
            _ => Mode::Inactive,
        };
        fsm.set_state(initial);
        Ok(Self {
            fsm,
            config,
            alphabet,
            host,
            ctx: SessionContext::default(),
        })
    }

    /// Feed one host event.
    pub fn handle(&mut self, raw: RawEvent<H::Element>) -> Result<Disposition, Error> {
        self.run_deferred();
        let Some(input) = normalize(&self.host, &raw) else {
            trace!("irrelevant event");
            return Ok(Disposition::PassThrough);
        };
        let Some(resolved) = self.fsm.resolve(&input)? else {
            trace!(state = ?self.fsm.state(), kind = ?input.kind, "no transition for input");
            return Ok(Disposition::PassThrough);
        };
        let mut disposition = Disposition::PassThrough;
        let overridden = match resolved.action {
            Some(action) => self.evaluate(action, &input, &mut disposition),
            None => None,
        };
        self.fsm.finish(resolved, overridden)?;
        Ok(disposition)
    }

    /// A timer from [`Scheduler::schedule`](crate::host::Scheduler::schedule) fired.
    pub fn on_timer(&mut self, id: crate::host::TimerId) {
        if let Some(mode) = self.ctx.chord.expire(id) {
            debug!(?mode, "chord timed out");
            self.fsm.set_state(mode);
        }
    }

    /// Carry out a queued selection, if any.
    pub fn run_deferred(&mut self) {
        let Some(selection) = self.ctx.pending.take() else {
            return;
        };
        let element = selection.element;
        if selection.copy {
            match self.host.href(element) {
                Some(href) => {
                    debug!(?element, %href, "copy link");
                    self.host.write_clipboard(&href);
                }
                None => warn!(?element, "selected element has no address to copy"),
            }
            return;
        }
        debug!(?element, "click");
        if self.host.is_editable(element) {
            self.host.focus(element);
        }
        for kind in PointerEventKind::CLICK_SEQUENCE {
            self.host.dispatch_pointer(element, kind, selection.modifiers);
        }
    }

    /// Whether labels are currently shown.
    pub fn is_overlay_active(&self) -> bool {
        !self.ctx.hints.is_empty()
    }

    /// Show labels now. Does nothing if they are already shown.
    ///
    /// On failure the session is back at rest with nothing shown.
    pub fn activate(&mut self) -> Result<(), Error> {
        if self.mode() == Mode::Active {
            return Ok(());
        }
        self.run_deferred();
        self.ctx.chord.cancel(&mut self.host);
        match self.run_activation() {
            Ok(()) => {
                self.fsm.set_state(Mode::Active);
                Ok(())
            }
            Err(err) => {
                self.clear_overlay();
                self.fsm.set_state(Mode::Inactive);
                Err(err.into())
            }
        }
    }

    /// Remove labels and reset the typed prefix. Does nothing if none are shown.
    pub fn clear(&mut self) {
        self.clear_overlay();
        if self.mode() == Mode::Active {
            self.fsm.set_state(Mode::Inactive);
        }
    }

    /// Current mode.
    pub fn mode(&self) -> Mode {
        self.fsm.state().copied().unwrap_or_default()
    }

    /// Live labels.
    pub fn hints(&self) -> &[Hint<H::Element>] {
        self.ctx.hints()
    }

    /// The typed prefix.
    pub fn filter_text(&self) -> &str {
        self.ctx.filter_text()
    }

    /// Whether the current activation copies links.
    pub fn is_copy_mode(&self) -> bool {
        self.ctx.is_copy_mode()
    }

    /// Session-scoped state.
    pub fn context(&self) -> &SessionContext<H::Element> {
        &self.ctx
    }

    /// Configuration in use.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The host.
    pub fn host(&self) -> &H {
        &self.host
    }

    /// The host, mutably; for wiring layers that update the page between events.
    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// Give the host back.
    pub fn into_host(self) -> H {
        self.host
    }

    // --- actions ---

    fn evaluate(
        &mut self,
        action: Action,
        input: &KeyInput,
        disposition: &mut Disposition,
    ) -> Option<Mode> {
        trace!(?action, "evaluate");
        match action {
            Action::ArmChord(revert_to) => {
                *disposition = Disposition::Suppress;
                self.ctx
                    .chord
                    .arm(&mut self.host, self.config.chord_timeout, revert_to);
                None
            }
            Action::RearmChord(revert_to) => {
                *disposition = Disposition::Suppress;
                self.ctx
                    .chord
                    .arm(&mut self.host, self.config.chord_timeout, revert_to);
                None
            }
            Action::Activate => self.activate_guarded(input, disposition),
            Action::ActivateYank => {
                self.ctx.chord.cancel(&mut self.host);
                self.ctx.copy_mode = true;
                self.activate_guarded(input, disposition)
            }
            Action::Unfocus => {
                self.unfocus();
                None
            }
            Action::CancelChord => {
                self.ctx.chord.cancel(&mut self.host);
                (input.kind == InputKind::FocusInput).then_some(Mode::Disabled)
            }
            Action::Filter => {
                *disposition = Disposition::Suppress;
                self.filter(input)
            }
            Action::Deactivate => {
                *disposition = Disposition::Suppress;
                self.clear_overlay();
                None
            }
        }
    }

    fn activate_guarded(&mut self, input: &KeyInput, disposition: &mut Disposition) -> Option<Mode> {
        if !input.raw.is_empty() {
            debug!(modifiers = ?input.raw, "modifier held, not activating");
            self.ctx.copy_mode = false;
            return Some(Mode::Inactive);
        }
        *disposition = Disposition::Suppress;
        match self.run_activation() {
            Ok(()) => None,
            Err(err) => {
                warn!(%err, "activation aborted");
                self.clear_overlay();
                Some(Mode::Inactive)
            }
        }
    }

    fn run_activation(&mut self) -> Result<(), DiscoveryError> {
        let _span = debug_span!("activate", copy_mode = self.ctx.copy_mode).entered();
        let options = DiscoveryOptions {
            copy_mode: self.ctx.copy_mode,
            min_visible_size: self.config.min_visible_size,
            ancestor_depth: self.config.ancestor_depth,
        };
        let targets = discover(&self.host, &options)?;
        debug!(targets = targets.len(), "discovered");
        let hints = assign_labels(&self.host, targets, &self.alphabet)?;
        self.ctx.filter.clear();
        if !hints.is_empty() {
            self.host.show(&hints);
        }
        debug!(labels = hints.len(), "labels shown");
        self.ctx.hints = hints;
        Ok(())
    }

    fn filter(&mut self, input: &KeyInput) -> Option<Mode> {
        if let Some(key) = &input.value {
            self.ctx.filter.push_key(key);
        }
        match self.ctx.filter.partition(&self.ctx.hints) {
            FilterOutcome::NoMatch => {
                debug!(filter = self.ctx.filter.text(), "no label matches");
                self.clear_overlay();
                Some(Mode::Inactive)
            }
            FilterOutcome::Unique(idx) => {
                let element = self.ctx.hints[idx].element;
                debug!(?element, label = %self.ctx.hints[idx].label, "selected");
                self.ctx.pending = Some(Selection {
                    element,
                    copy: self.ctx.copy_mode,
                    modifiers: input.raw,
                });
                self.host.request_turn();
                self.clear_overlay();
                Some(Mode::Inactive)
            }
            FilterOutcome::Narrowed { matches, rest } => {
                let typed = self.ctx.filter.typed();
                for idx in rest {
                    self.host.hide(&self.ctx.hints[idx]);
                }
                for idx in matches {
                    self.host.narrow(&self.ctx.hints[idx], typed);
                }
                None
            }
        }
    }

    fn unfocus(&mut self) {
        match self.host.active_element() {
            Some(el) if self.host.is_body(el) => {
                self.host.blur(el);
                self.host.blur_window();
            }
            Some(el) => self.host.blur(el),
            None => self.host.blur_window(),
        }
    }

    fn clear_overlay(&mut self) {
        if !self.ctx.hints.is_empty() {
            self.host.clear();
        }
        self.ctx.reset();
    }
}
