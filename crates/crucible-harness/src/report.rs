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

//! The score report emitted after a run.
//!
//! One record per run: competitor and suite identity, the training
//! category, a timestamp, the terminal `(remaining, remaining-at-best,
//! best-value)` triple of every objective in both phases, and the measured
//! wall-clock usage per phase. Field names are camelCased on the wire so
//! existing downstream scoring tools can consume the reports unchanged.

use crate::{
    category::TrainingCategory, objective::BudgetedObjective, suite::ProblemClass,
};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// The terminal state of one objective.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectiveRecord {
    /// Evaluations left on the wrapper when the phase ended.
    pub remaining_evaluations: i64,
    /// Evaluations left at the moment the best value was found, or `-1` if
    /// no evaluation ever succeeded.
    pub remaining_evaluations_when_best_reached: i64,
    /// The best (maximum) value observed, or `-1.0` if none.
    pub best_value: f64,
}

impl ObjectiveRecord {
    /// Snapshots an objective's terminal state.
    pub fn from_objective(objective: &BudgetedObjective) -> Self {
        let (remaining_evaluations_when_best_reached, best_value) = objective.best_sample();
        Self {
            remaining_evaluations: objective.remaining_evaluations(),
            remaining_evaluations_when_best_reached,
            best_value,
        }
    }
}

/// The full score record of one run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreReport {
    /// The competitor's identity.
    pub competitor_name: String,
    /// The implementation language of the competitor.
    pub competitor_language: String,
    /// The suite the run was scored against.
    pub problem_class_name: String,
    /// The training category of the run.
    pub training_category: TrainingCategory,
    /// Timestamp of report assembly, `%Y-%m-%d-%H-%M-%S`.
    pub datetime: String,
    /// Terminal state of every training objective, in suite order.
    pub training_results: Vec<ObjectiveRecord>,
    /// Measured training-phase wall clock, in milliseconds.
    pub training_wall_clock_ms: u64,
    /// Terminal state of every testing objective, in suite order.
    pub testing_results: Vec<ObjectiveRecord>,
    /// Measured testing-phase wall clock, in milliseconds.
    pub testing_wall_clock_ms: u64,
}

impl ScoreReport {
    /// Assembles the report from a finished run.
    pub fn new(
        competitor_name: &str,
        class: &ProblemClass,
        training_elapsed: Duration,
        testing_elapsed: Duration,
    ) -> Self {
        let datetime = chrono::Local::now().format("%Y-%m-%d-%H-%M-%S").to_string();

        Self {
            competitor_name: competitor_name.to_string(),
            competitor_language: "Rust".to_string(),
            problem_class_name: class.name().to_string(),
            training_category: class.training_category(),
            datetime,
            training_results: class
                .training()
                .iter()
                .map(ObjectiveRecord::from_objective)
                .collect(),
            training_wall_clock_ms: training_elapsed.as_millis() as u64,
            testing_results: class
                .testing()
                .iter()
                .map(ObjectiveRecord::from_objective)
                .collect(),
            testing_wall_clock_ms: testing_elapsed.as_millis() as u64,
        }
    }

    /// The conventional file name for this report.
    pub fn file_name(&self) -> String {
        format!(
            "results-{}-{}-{}.json",
            self.competitor_name, self.problem_class_name, self.datetime
        )
    }
}

impl std::fmt::Display for ScoreReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Score Report")?;
        writeln!(f, "  Competitor: {}", self.competitor_name)?;
        writeln!(f, "  Problem Class: {}", self.problem_class_name)?;
        writeln!(f, "  Training Category: {}", self.training_category)?;
        writeln!(f, "  Datetime: {}", self.datetime)?;
        writeln!(
            f,
            "  Training: {} instances, {} ms",
            self.training_results.len(),
            self.training_wall_clock_ms
        )?;
        writeln!(
            f,
            "  Testing: {} instances, {} ms",
            self.testing_results.len(),
            self.testing_wall_clock_ms
        )?;
        for record in &self.testing_results {
            writeln!(
                f,
                "    best {} at {} remaining ({} left at end)",
                record.best_value,
                record.remaining_evaluations_when_best_reached,
                record.remaining_evaluations
            )?;
        }
        Ok(())
    }
}
