// Copyright 2025 the Keyhop Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Chord guard: owner of the single pending delayed transition.
//!
//! A chord is confirmed only if its second key arrives before the timeout.
//! The guard holds at most one timer; arming cancels the previous one first,
//! and expiry of anything but the currently armed timer is ignored.

use core::fmt::Debug;
use core::time::Duration;

use tracing::{debug, warn};

use crate::host::{Scheduler, TimerId};

/// At most one armed timer and the state it reverts to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChordGuard<S> {
    armed: Option<(TimerId, S)>,
}

impl<S> Default for ChordGuard<S> {
    fn default() -> Self {
        Self { armed: None }
    }
}

impl<S: Copy + Debug> ChordGuard<S> {
    /// Schedule a revert to `revert_to` after `delay`, replacing any armed timer.
    pub fn arm<C: Scheduler + ?Sized>(
        &mut self,
        scheduler: &mut C,
        delay: Duration,
        revert_to: S,
    ) -> TimerId {
        self.cancel(scheduler);
        let id = scheduler.schedule(delay);
        debug!(?id, ?revert_to, ?delay, "chord armed");
        self.armed = Some((id, revert_to));
        id
    }

    /// Cancel the armed timer, if any. Returns whether one was armed.
    pub fn cancel<C: Scheduler + ?Sized>(&mut self, scheduler: &mut C) -> bool {
        match self.armed.take() {
            Some((id, _)) => {
                scheduler.cancel(id);
                debug!(?id, "chord canceled");
                true
            }
            None => false,
        }
    }

    /// A timer fired: the revert state if `id` is the armed timer.
    pub fn expire(&mut self, id: TimerId) -> Option<S> {
        match self.armed {
            Some((armed, revert_to)) if armed == id => {
                self.armed = None;
                Some(revert_to)
            }
            _ => {
                warn!(?id, "stale chord timer ignored");
                None
            }
        }
    }

    /// The armed timer.
    pub fn pending(&self) -> Option<TimerId> {
        self.armed.map(|(id, _)| id)
    }
}
