// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

//! Phase-scoped elapsed-time clocks.
//!
//! One clock exists per phase (training, testing). The harness owns it and
//! arms the deadline; every objective in the phase holds an `Rc` handle and
//! only ever reads it. Interior mutability is `Cell`-based, which makes the
//! type deliberately `!Sync`: the whole protocol runs on one logical thread
//! and the types encode that.
//!
//! An unarmed clock never reports itself expired. Evaluation attempts made
//! outside a running phase are therefore count-gated only.

use std::{
    cell::Cell,
    rc::Rc,
    time::{Duration, Instant},
};

/// A restartable stopwatch with an optional deadline.
#[derive(Debug, Clone)]
pub struct PhaseClock {
    started_at: Cell<Instant>,
    deadline: Cell<Option<Duration>>,
}

impl PhaseClock {
    /// Creates a new, unarmed clock.
    #[inline]
    pub fn new() -> Self {
        Self {
            started_at: Cell::new(Instant::now()),
            deadline: Cell::new(None),
        }
    }

    /// Zeroes the elapsed time and arms the deadline.
    #[inline]
    pub fn start(&self, deadline: Duration) {
        self.started_at.set(Instant::now());
        self.deadline.set(Some(deadline));
    }

    /// Re-arms the deadline at `elapsed + budget` without restarting the
    /// clock. Used to grant each testing instance its own slice of an
    /// accumulating phase clock.
    #[inline]
    pub fn extend_deadline(&self, budget: Duration) {
        self.deadline.set(Some(self.elapsed() + budget));
    }

    /// Time elapsed since the clock was last started.
    #[inline]
    pub fn elapsed(&self) -> Duration {
        self.started_at.get().elapsed()
    }

    /// The currently armed deadline, if any.
    #[inline]
    pub fn deadline(&self) -> Option<Duration> {
        self.deadline.get()
    }

    /// Returns `true` once the elapsed time strictly exceeds the armed
    /// deadline. An unarmed clock is never expired.
    #[inline]
    pub fn expired(&self) -> bool {
        match self.deadline.get() {
            Some(deadline) => self.elapsed() > deadline,
            None => false,
        }
    }

    #[cfg(test)]
    pub(crate) fn rewind_start(&self, by: Duration) {
        self.started_at.set(self.started_at.get() - by);
    }
}

impl Default for PhaseClock {
    fn default() -> Self {
        Self::new()
    }
}

/// The pair of phase clocks a run needs: one for training, one for testing.
#[derive(Debug, Clone, Default)]
pub struct PhaseClocks {
    /// The training-phase clock, shared by all training objectives.
    pub training: Rc<PhaseClock>,
    /// The testing-phase clock, shared by all testing objectives.
    pub testing: Rc<PhaseClock>,
}

impl PhaseClocks {
    /// Creates a fresh, unarmed clock pair.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unarmed_clock_is_never_expired() {
        let clock = PhaseClock::new();
        assert!(clock.deadline().is_none());
        assert!(!clock.expired());
    }

    #[test]
    fn test_start_arms_deadline() {
        let clock = PhaseClock::new();
        clock.start(Duration::from_secs(3600));
        assert_eq!(clock.deadline(), Some(Duration::from_secs(3600)));
        assert!(!clock.expired());
    }

    #[test]
    fn test_expired_once_elapsed_exceeds_deadline() {
        let clock = PhaseClock::new();
        clock.start(Duration::from_millis(10));
        // Make elapsed exceed the deadline by rewinding the start time.
        clock.rewind_start(Duration::from_millis(50));
        assert!(clock.expired());
    }

    #[test]
    fn test_restart_clears_expiry() {
        let clock = PhaseClock::new();
        clock.start(Duration::from_millis(10));
        clock.rewind_start(Duration::from_millis(50));
        assert!(clock.expired());

        clock.start(Duration::from_secs(3600));
        assert!(!clock.expired());
    }

    #[test]
    fn test_extend_deadline_grants_fresh_budget_without_restart() {
        let clock = PhaseClock::new();
        clock.start(Duration::from_millis(10));
        clock.rewind_start(Duration::from_millis(50));
        assert!(clock.expired());

        // The clock keeps accumulating; only the deadline moves.
        clock.extend_deadline(Duration::from_secs(3600));
        assert!(!clock.expired());
        assert!(clock.elapsed() >= Duration::from_millis(50));
    }

    #[test]
    fn test_shared_handles_observe_harness_writes() {
        let clocks = PhaseClocks::new();
        let reader = Rc::clone(&clocks.training);

        clocks.training.start(Duration::from_millis(10));
        clocks.training.rewind_start(Duration::from_millis(50));
        assert!(reader.expired());
    }
}
