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

//! Next-ascent hillclimbing.
//!
//! Starting from a random incumbent, the strategy sweeps the Hamming-1
//! neighborhood and re-bases on every strict improvement it meets, repeating
//! until a full sweep yields no improvement or the budget is exhausted.
//! Neighbours are generated from the incumbent the sweep started with, so a
//! mid-sweep re-base affects the comparison baseline but not the sweep's
//! candidate set.

use crate::bits;
use crucible_harness::{
    category::TrainingCategory,
    competitor::Competitor,
    objective::{BudgetedObjective, EvaluationError},
};
use rand::Rng;
use std::time::Duration;

/// Next-ascent hillclimbing over the Hamming-1 neighborhood.
#[derive(Debug, Clone)]
pub struct NextAscentHillClimber<R> {
    rng: R,
}

impl<R> NextAscentHillClimber<R> {
    /// Creates a hillclimbing competitor driven by the given generator.
    #[inline]
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: Rng> Competitor for NextAscentHillClimber<R> {
    fn name(&self) -> &str {
        "NextAscentHillClimber"
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
        let mut incumbent = bits::random_bitvector(&mut self.rng, objective.num_variables());
        let mut best_value = objective.evaluate(&incumbent)?;

        let mut improved = true;
        while improved && objective.remaining_evaluations() > 0 {
            improved = false;
            for neighbour in bits::hamming1_neighbours(&incumbent) {
                let value = objective.evaluate(&neighbour)?;
                if value > best_value {
                    improved = true;
                    incumbent = neighbour;
                    best_value = value;
                }
            }
        }

        Ok(())
    }
}
