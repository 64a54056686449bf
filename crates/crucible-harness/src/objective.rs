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

//! The evaluation-budget gate.
//!
//! `BudgetedObjective` wraps one test function with the two per-call
//! preconditions the whole system is built around:
//!
//! 1. **Time gate**: the phase clock must not be expired. Checked before
//!    the candidate is scored, so a competitor cannot get one free
//!    expensive evaluation past the deadline.
//! 2. **Count gate**: the remaining-evaluation counter must be positive.
//!
//! The counter is decremented only after the underlying table evaluation
//! succeeds; a malformed candidate consumes no budget. The system always
//! maximizes, so the anytime-best pair is updated on a strict improvement,
//! first occurrence winning ties.

use crate::clock::PhaseClock;
use crucible_model::table::{CandidateError, PseudoBooleanTable};
use std::rc::Rc;

/// Which phase's clock gates an objective.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimingMode {
    /// Gated by the training-phase clock.
    Training,
    /// Gated by the testing-phase clock.
    Testing,
}

impl std::fmt::Display for TimingMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TimingMode::Training => write!(f, "training"),
            TimingMode::Testing => write!(f, "testing"),
        }
    }
}

/// The outcome of a gated evaluation attempt that did not produce a value.
///
/// The first two variants are the expected end of a competitor's turn and
/// are caught at the phase boundary; `Candidate` is a programming error in
/// the competitor and aborts the run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EvaluationError {
    /// The phase wall-clock deadline has passed.
    TimeExceeded,
    /// The remaining-evaluation counter reached zero.
    EvaluationsExceeded,
    /// The candidate vector had the wrong length.
    Candidate(CandidateError),
}

impl EvaluationError {
    /// Returns `true` for the two budget-exhaustion variants that end a
    /// turn normally.
    #[inline]
    pub fn is_budget_exhausted(&self) -> bool {
        matches!(
            self,
            EvaluationError::TimeExceeded | EvaluationError::EvaluationsExceeded
        )
    }
}

impl std::fmt::Display for EvaluationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EvaluationError::TimeExceeded => write!(f, "phase time budget exceeded"),
            EvaluationError::EvaluationsExceeded => write!(f, "evaluation budget exceeded"),
            EvaluationError::Candidate(e) => write!(f, "invalid candidate: {}", e),
        }
    }
}

impl std::error::Error for EvaluationError {}

impl From<CandidateError> for EvaluationError {
    fn from(e: CandidateError) -> Self {
        Self::Candidate(e)
    }
}

/// One test function wrapped with budget enforcement and best tracking.
///
/// Created per run, per instance, per phase; mutated exclusively through
/// [`BudgetedObjective::evaluate`]; its terminal state feeds the score
/// report.
#[derive(Debug, Clone)]
pub struct BudgetedObjective {
    table: Rc<PseudoBooleanTable>,
    timing_mode: TimingMode,
    clock: Rc<PhaseClock>,
    remaining_evaluations: i64,
    /// `(remaining_evaluations after the decrement, value)` at the best
    /// value seen so far; `None` until the first successful evaluation.
    best: Option<(i64, f64)>,
}

impl BudgetedObjective {
    /// Wraps a table with a starting budget and the clock of its phase.
    ///
    /// The starting budget is assigned externally and may differ from the
    /// instance's own `max_evaluations` (training objectives start at the
    /// shared suite total).
    pub fn new(
        table: Rc<PseudoBooleanTable>,
        timing_mode: TimingMode,
        clock: Rc<PhaseClock>,
        remaining_evaluations: i64,
    ) -> Self {
        Self {
            table,
            timing_mode,
            clock,
            remaining_evaluations,
            best: None,
        }
    }

    /// Evaluates a candidate through both budget gates.
    ///
    /// On success the counter drops by exactly one and the anytime-best
    /// pair is updated if the value strictly exceeds the best seen so far.
    /// A failed gate leaves all state untouched, and a wrong-length
    /// candidate consumes no budget.
    pub fn evaluate(&mut self, candidate: &[bool]) -> Result<f64, EvaluationError> {
        if self.clock.expired() {
            return Err(EvaluationError::TimeExceeded);
        }
        if self.remaining_evaluations <= 0 {
            return Err(EvaluationError::EvaluationsExceeded);
        }

        let value = self.table.evaluate(candidate)?;
        self.remaining_evaluations -= 1;

        // We are maximizing; ties keep the earliest occurrence.
        let improved = match self.best {
            None => true,
            Some((_, best_value)) => value > best_value,
        };
        if improved {
            self.best = Some((self.remaining_evaluations, value));
        }

        Ok(value)
    }

    /// The `(remaining evaluations when the best was reached, best value)`
    /// pair, or the sentinel `(-1, -1.0)` if no evaluation has ever
    /// succeeded. The sentinel, not an absent value, is the contract the
    /// score report consumes.
    #[inline]
    pub fn best_sample(&self) -> (i64, f64) {
        self.best.unwrap_or((-1, -1.0))
    }

    /// Evaluations still permitted on this wrapper.
    #[inline]
    pub fn remaining_evaluations(&self) -> i64 {
        self.remaining_evaluations
    }

    /// The number of variables a candidate must have.
    #[inline]
    pub fn num_variables(&self) -> usize {
        self.table.num_variables()
    }

    /// The wrapped instance's own budget ceiling (not necessarily this
    /// wrapper's starting counter).
    #[inline]
    pub fn max_evaluations_per_instance(&self) -> i64 {
        self.table.max_evaluations()
    }

    /// The phase whose clock gates this objective.
    #[inline]
    pub fn timing_mode(&self) -> TimingMode {
        self.timing_mode
    }
}

impl std::fmt::Display for BudgetedObjective {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let (at_best, best_value) = self.best_sample();
        write!(
            f,
            "BudgetedObjective(num_variables: {}, remaining_evaluations: {}, remaining_evaluations_at_best: {}, best_value: {}, timing_mode: {})",
            self.num_variables(),
            self.remaining_evaluations,
            at_best,
            best_value,
            self.timing_mode
        )
    }
}
