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

//! Uniform random sampling.
//!
//! The simplest possible competitor: draw candidates uniformly at random
//! until a budget gate ends the turn. The harness's best tracking does all
//! the bookkeeping, so the loop does not even look at the values.

use crate::bits;
use crucible_harness::{
    category::TrainingCategory,
    competitor::Competitor,
    objective::{BudgetedObjective, EvaluationError},
};
use rand::Rng;
use std::time::Duration;

/// Random search with no training phase.
#[derive(Debug, Clone)]
pub struct RandomSearch<R> {
    rng: R,
}

impl<R> RandomSearch<R> {
    /// Creates a random-search competitor driven by the given generator.
    #[inline]
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: Rng> Competitor for RandomSearch<R> {
    fn name(&self) -> &str {
        "RandomSearch"
    }

    fn training_category(&self) -> TrainingCategory {
        TrainingCategory::None
    }

    fn train(
        &mut self,
        _training_set: &mut [BudgetedObjective],
        _max_time: Duration,
    ) -> Result<(), EvaluationError> {
        unreachable!("train is never invoked for TrainingCategory::None")
    }

    fn test(
        &mut self,
        objective: &mut BudgetedObjective,
        _max_time: Duration,
    ) -> Result<(), EvaluationError> {
        // The loop is terminated by the time or evaluation gate; useful
        // strategies would obviously care about the returned values.
        loop {
            let candidate = bits::random_bitvector(&mut self.rng, objective.num_variables());
            objective.evaluate(&candidate)?;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crucible_harness::clock::PhaseClock;
    use crucible_harness::objective::TimingMode;
    use crucible_model::table::{InstanceFormat, PseudoBooleanTable, Subfunction};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use smallvec::SmallVec;
    use std::rc::Rc;

    fn toy_objective(budget: i64) -> BudgetedObjective {
        let table = Rc::new(PseudoBooleanTable::new(
            2,
            100,
            1,
            InstanceFormat::Indexed,
            vec![Subfunction::new(
                SmallVec::from_slice(&[0, 1]),
                vec![0.0, 1.0, 2.0, 3.0],
            )],
        ));
        let clock = Rc::new(PhaseClock::new());
        clock.start(Duration::from_secs(3600));
        BudgetedObjective::new(table, TimingMode::Testing, clock, budget)
    }

    #[test]
    fn test_runs_until_the_count_gate_fires() {
        let mut competitor = RandomSearch::new(ChaCha8Rng::seed_from_u64(42));
        let mut objective = toy_objective(25);

        let err = competitor
            .test(&mut objective, Duration::from_secs(1))
            .unwrap_err();

        assert_eq!(err, EvaluationError::EvaluationsExceeded);
        assert_eq!(objective.remaining_evaluations(), 0);
        // Something was sampled, so a best must have been recorded.
        assert_ne!(objective.best_sample(), (-1, -1.0));
    }

    #[test]
    fn test_reports_no_training_phase() {
        let competitor = RandomSearch::new(ChaCha8Rng::seed_from_u64(42));
        assert_eq!(competitor.training_category(), TrainingCategory::None);
        assert_eq!(competitor.name(), "RandomSearch");
    }
}
