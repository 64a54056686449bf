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

//! The contract an optimization strategy implements to enter the arena.

use crate::{
    category::TrainingCategory,
    objective::{BudgetedObjective, EvaluationError},
};
use std::time::Duration;

/// A black-box optimization strategy under test.
///
/// The harness drives a competitor through an optional training phase and a
/// testing phase. All objective access goes through
/// [`BudgetedObjective::evaluate`]; propagating a budget-exhausted
/// [`EvaluationError`] with `?` is the normal way a turn ends, and the
/// harness catches exactly those errors at the phase boundary. Returning a
/// `Candidate` error (or panicking) is a defect and aborts the run.
///
/// Time enforcement is cooperative: it only takes effect at the moments the
/// competitor calls `evaluate`. A competitor is expected to call `evaluate`
/// periodically; one that spins without evaluating is not bounded by this
/// mechanism.
pub trait Competitor {
    /// The competitor's identity in the score report.
    fn name(&self) -> &str;

    /// The training category this competitor entered with. Fixed at
    /// construction, read once by the harness.
    fn training_category(&self) -> TrainingCategory;

    /// The training turn, invoked once iff the category is not `None`.
    ///
    /// All training objectives arrive together, sharing one budget total
    /// the competitor partitions at its own discretion. `max_time` is the
    /// phase deadline already armed on the objectives' clock.
    fn train(
        &mut self,
        training_set: &mut [BudgetedObjective],
        max_time: Duration,
    ) -> Result<(), EvaluationError>;

    /// One testing turn, invoked once per testing instance in suite order.
    fn test(
        &mut self,
        objective: &mut BudgetedObjective,
        max_time: Duration,
    ) -> Result<(), EvaluationError>;
}

impl std::fmt::Debug for dyn Competitor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Competitor({})", self.name())
    }
}

impl std::fmt::Display for dyn Competitor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Competitor({})", self.name())
    }
}
