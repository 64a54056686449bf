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

//! Simulated annealing with a learned temperature schedule.
//!
//! During training the strategy splits the shared budget evenly across the
//! training instances, records a random-walk fitness trajectory on each,
//! and derives a temperature range per White's scale analysis: the lower
//! bound is the smallest consecutive fitness difference observed, the upper
//! bound the trajectory's standard deviation, both averaged across
//! instances.
//!
//! ```text
//! @inproceedings{white:1984,
//!  address = {Port Chester, NY},
//!  author = {White, S. R.},
//!  booktitle = {Proceedings of the IEEE International Conference on
//!               Computer Design (ICCD) '84},
//!  pages = {646--651},
//!  title = {Concepts of Scale in Simulated Annealing},
//!  year = {1984}
//! }
//! ```
//!
//! Testing then anneals over the instance's whole remaining budget with a
//! linear schedule from the learned upper bound down to the lower bound.
//! Acceptance follows the Metropolis criterion on a maximizing objective:
//! improvements are always taken, and at zero temperature only
//! non-worsening moves survive.

use crate::bits;
use crucible_harness::{
    category::TrainingCategory,
    competitor::Competitor,
    objective::{BudgetedObjective, EvaluationError},
};
use num_traits::ToPrimitive;
use rand::Rng;
use std::time::Duration;
use tracing::debug;

/// Simulated annealing whose schedule bounds are learned in training.
#[derive(Debug, Clone)]
pub struct AnnealingScheduleTuner<R> {
    category: TrainingCategory,
    schedule_lower_bound: f64,
    schedule_upper_bound: f64,
    rng: R,
}

impl<R> AnnealingScheduleTuner<R> {
    /// Creates the competitor for a training category.
    ///
    /// # Panics
    ///
    /// Panics if `category` has no training phase, since without one there
    /// is nothing to learn the schedule from.
    pub fn new(category: TrainingCategory, rng: R) -> Self {
        assert!(
            category.has_training_phase(),
            "called `AnnealingScheduleTuner::new` with category {}, which has no training phase",
            category
        );
        Self {
            category,
            schedule_lower_bound: 0.0,
            schedule_upper_bound: f64::MAX,
            rng,
        }
    }

    /// The learned `(lower, upper)` schedule bounds.
    #[inline]
    pub fn schedule_bounds(&self) -> (f64, f64) {
        (self.schedule_lower_bound, self.schedule_upper_bound)
    }

    fn invariant(&self) -> bool {
        self.schedule_lower_bound < self.schedule_upper_bound
    }
}

/// White's temperature range for a fitness trajectory: the smallest
/// consecutive |difference| and the trajectory's standard deviation.
///
/// # Panics
///
/// Panics if the trajectory is empty.
fn white_temperature_range(trajectory: &[f64]) -> (f64, f64) {
    assert!(
        !trajectory.is_empty(),
        "called `white_temperature_range` with an empty trajectory"
    );

    let mut min_difference = f64::MAX;
    for pair in trajectory.windows(2) {
        let delta = (pair[1] - pair[0]).abs();
        if delta < min_difference {
            min_difference = delta;
        }
    }

    let len = trajectory.len() as f64;
    let mean = trajectory.iter().sum::<f64>() / len;
    let variance = trajectory.iter().map(|d| (d - mean) * (d - mean)).sum::<f64>() / len;

    (min_difference, variance.sqrt())
}

/// Metropolis acceptance for a maximizing objective.
///
/// # Panics
///
/// Panics if `temperature` is negative or NaN.
fn sa_accept<R: Rng>(rng: &mut R, last_value: f64, current_value: f64, temperature: f64) -> bool {
    assert!(
        !temperature.is_nan() && temperature >= 0.0,
        "expected non-negative temperature, found {}",
        temperature
    );

    if current_value > last_value {
        return true;
    }
    if temperature == 0.0 {
        return current_value >= last_value;
    }

    // current_value <= last_value, so the exponent is non-positive and the
    // probability lands in (0, 1].
    let probability = ((current_value - last_value) / temperature).exp();
    rng.random_bool(probability)
}

impl<R: Rng> AnnealingScheduleTuner<R> {
    /// Walks `steps` random Hamming-1 moves, recording each fitness value.
    fn fitness_trajectory_of_random_walk(
        &mut self,
        objective: &mut BudgetedObjective,
        steps: i64,
    ) -> Result<Vec<f64>, EvaluationError> {
        let mut incumbent = bits::random_bitvector(&mut self.rng, objective.num_variables());

        let mut trajectory = Vec::with_capacity(steps.to_usize().unwrap_or(0));
        for _ in 0..steps {
            let incoming = bits::random_hamming1_neighbour(&mut self.rng, &incumbent);
            trajectory.push(objective.evaluate(&incoming)?);
            incumbent = incoming;
        }
        Ok(trajectory)
    }
}

impl<R: Rng> Competitor for AnnealingScheduleTuner<R> {
    fn name(&self) -> &str {
        "AnnealingScheduleTuner"
    }

    fn training_category(&self) -> TrainingCategory {
        self.category
    }

    fn train(
        &mut self,
        training_set: &mut [BudgetedObjective],
        _max_time: Duration,
    ) -> Result<(), EvaluationError> {
        if training_set.is_empty() {
            return Ok(());
        }

        // The remaining evaluations of the training set are one shared
        // total; carve an even slice per instance.
        let evals_per_case =
            training_set[0].remaining_evaluations() / training_set.len() as i64;

        let mut lower_bounds = Vec::with_capacity(training_set.len());
        let mut upper_bounds = Vec::with_capacity(training_set.len());
        for objective in training_set.iter_mut() {
            let trajectory = self.fitness_trajectory_of_random_walk(objective, evals_per_case)?;
            let (lower, upper) = white_temperature_range(&trajectory);
            lower_bounds.push(lower);
            upper_bounds.push(upper);
        }

        self.schedule_lower_bound =
            lower_bounds.iter().sum::<f64>() / lower_bounds.len() as f64;
        self.schedule_upper_bound =
            upper_bounds.iter().sum::<f64>() / upper_bounds.len() as f64;
        debug!(
            lower = self.schedule_lower_bound,
            upper = self.schedule_upper_bound,
            "learned annealing schedule bounds"
        );
        debug_assert!(self.invariant());

        Ok(())
    }

    fn test(
        &mut self,
        objective: &mut BudgetedObjective,
        _max_time: Duration,
    ) -> Result<(), EvaluationError> {
        let mut incumbent = bits::random_bitvector(&mut self.rng, objective.num_variables());
        let mut last_value = objective.evaluate(&incumbent)?;

        let num_evaluations = objective.remaining_evaluations();
        let denominator = (num_evaluations - 1).max(1);
        for i in 0..num_evaluations {
            let incoming = bits::random_hamming1_neighbour(&mut self.rng, &incumbent);
            let value = objective.evaluate(&incoming)?;

            // Linear annealing schedule from the upper to the lower bound.
            let progress = match (i.to_f64(), denominator.to_f64()) {
                (Some(step), Some(total)) => step / total,
                // Unrepresentable counters: treat the schedule as cooled.
                _ => 1.0,
            };
            let temperature = (1.0 - progress)
                * (self.schedule_upper_bound - self.schedule_lower_bound)
                + self.schedule_lower_bound;

            if sa_accept(&mut self.rng, last_value, value, temperature) {
                incumbent = incoming;
                last_value = value;
            }
        }

        Ok(())
    }
}
