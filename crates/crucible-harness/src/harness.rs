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

//! # Competition Orchestrator
//!
//! Runs a competitor through the training phase (when its category asks for
//! one) and the testing phase, arming the phase clocks, catching
//! budget-exceeded turns at the phase boundary, and assembling the score
//! report.
//!
//! ## Phase semantics
//!
//! - **Training** (`Short`/`Long` only): the deadline is
//!   `base_time_per_instance × instance count × category multiplier`, armed
//!   once for the whole phase; the competitor receives every training
//!   objective together.
//! - **Testing**: the phase clock accumulates across all instances, but the
//!   deadline is re-armed to `elapsed + base_time_per_instance` before each
//!   instance, so one instance's termination never eats into the next
//!   instance's slice and never aborts the remaining instances.
//!
//! Budget-exceeded errors are the *expected* steady-state exit of a turn: a
//! well-behaved competitor always eventually hits one of the two gates.
//! Anything else escaping competitor code is a defect and aborts the run
//! loudly rather than being silently absorbed.

use crate::{
    clock::PhaseClocks,
    competitor::Competitor,
    objective::{BudgetedObjective, EvaluationError},
    report::ScoreReport,
    suite::{ProblemClass, SuiteError},
};
use crucible_model::table::CandidateError;
use std::{path::Path, time::Duration};
use tracing::{debug, info};

/// The error type for a harness run.
#[derive(Debug)]
pub enum HarnessError {
    /// The suite could not be loaded; no competitor code has run.
    Suite(SuiteError),
    /// The competitor passed a malformed candidate to an objective: a
    /// defect in the competitor, not a budget condition.
    Competitor(CandidateError),
}

impl std::fmt::Display for HarnessError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Suite(e) => write!(f, "Suite loading failed: {}", e),
            Self::Competitor(e) => write!(f, "Competitor defect: {}", e),
        }
    }
}

impl std::error::Error for HarnessError {}

impl From<SuiteError> for HarnessError {
    fn from(e: SuiteError) -> Self {
        Self::Suite(e)
    }
}

/// The orchestrator: owns the phase clocks and the timing configuration.
#[derive(Debug)]
pub struct Harness {
    base_time_per_instance: Duration,
    clocks: PhaseClocks,
}

impl Harness {
    /// The default wall-clock slice per instance.
    pub const DEFAULT_BASE_TIME_PER_INSTANCE: Duration = Duration::from_secs(250);

    /// The time slice granted per instance (scaled by count and category
    /// multiplier in the training phase).
    #[inline]
    pub fn base_time_per_instance(&self) -> Duration {
        self.base_time_per_instance
    }

    /// Loads the suite at `root` for the competitor's category and runs the
    /// full protocol.
    pub fn run<C>(&mut self, competitor: &mut C, root: &Path) -> Result<ScoreReport, HarnessError>
    where
        C: Competitor + ?Sized,
    {
        let class = ProblemClass::load(root, competitor.training_category(), &self.clocks)?;
        self.run_class(competitor, class)
    }

    /// Runs the full protocol against an already-loaded suite:
    /// `INIT → (TRAINING)? → TESTING → REPORTING → DONE`.
    pub fn run_class<C>(
        &mut self,
        competitor: &mut C,
        mut class: ProblemClass,
    ) -> Result<ScoreReport, HarnessError>
    where
        C: Competitor + ?Sized,
    {
        let training_elapsed = if class.training_category().has_training_phase() {
            self.train_phase(competitor, &mut class)?
        } else {
            Duration::ZERO
        };

        let testing_elapsed = self.test_phase(competitor, &mut class)?;

        Ok(ScoreReport::new(
            competitor.name(),
            &class,
            training_elapsed,
            testing_elapsed,
        ))
    }

    /// The training phase: one turn over the whole training set.
    fn train_phase<C>(
        &mut self,
        competitor: &mut C,
        class: &mut ProblemClass,
    ) -> Result<Duration, HarnessError>
    where
        C: Competitor + ?Sized,
    {
        debug_assert!(
            all_same_num_variables(&class.training),
            "training instances of one suite must share a variable count"
        );

        let multiplier = class.training_category().multiplier() as u32;
        let max_time =
            self.base_time_per_instance * class.training.len() as u32 * multiplier;
        self.clocks.training.start(max_time);

        match competitor.train(&mut class.training, max_time) {
            Ok(()) => {}
            Err(EvaluationError::TimeExceeded) | Err(EvaluationError::EvaluationsExceeded) => {
                debug!("training turn ended by a budget gate");
            }
            Err(EvaluationError::Candidate(e)) => return Err(HarnessError::Competitor(e)),
        }

        let elapsed = self.clocks.training.elapsed();
        info!(elapsed_ms = elapsed.as_millis() as u64, "training phase complete");
        Ok(elapsed)
    }

    /// The testing phase: one turn per instance, in suite order.
    fn test_phase<C>(
        &mut self,
        competitor: &mut C,
        class: &mut ProblemClass,
    ) -> Result<Duration, HarnessError>
    where
        C: Competitor + ?Sized,
    {
        self.clocks.testing.start(self.base_time_per_instance);

        for objective in class.testing.iter_mut() {
            self.clocks.testing.extend_deadline(self.base_time_per_instance);

            match competitor.test(objective, self.base_time_per_instance) {
                Ok(()) => {}
                Err(EvaluationError::TimeExceeded) | Err(EvaluationError::EvaluationsExceeded) => {
                    debug!(objective = %objective, "testing turn ended by a budget gate");
                }
                Err(EvaluationError::Candidate(e)) => return Err(HarnessError::Competitor(e)),
            }
        }

        let elapsed = self.clocks.testing.elapsed();
        info!(elapsed_ms = elapsed.as_millis() as u64, "testing phase complete");
        Ok(elapsed)
    }
}

/// `true` when every objective expects the same candidate length (holds
/// vacuously for empty sets).
fn all_same_num_variables(objectives: &[BudgetedObjective]) -> bool {
    objectives
        .windows(2)
        .all(|pair| pair[0].num_variables() == pair[1].num_variables())
}

/// Builder for [`Harness`].
#[derive(Debug, Clone)]
pub struct HarnessBuilder {
    base_time_per_instance: Duration,
}

impl Default for HarnessBuilder {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl HarnessBuilder {
    /// Creates a builder with the default 250-second slice.
    #[inline]
    pub fn new() -> Self {
        Self {
            base_time_per_instance: Harness::DEFAULT_BASE_TIME_PER_INSTANCE,
        }
    }

    /// Overrides the wall-clock slice granted per instance.
    #[inline]
    pub fn base_time_per_instance(mut self, slice: Duration) -> Self {
        self.base_time_per_instance = slice;
        self
    }

    /// Builds the harness with fresh, unarmed phase clocks.
    #[inline]
    pub fn build(self) -> Harness {
        Harness {
            base_time_per_instance: self.base_time_per_instance,
            clocks: PhaseClocks::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::category::TrainingCategory;
    use crate::objective::TimingMode;
    use crucible_model::table::{InstanceFormat, PseudoBooleanTable, Subfunction};
    use smallvec::SmallVec;
    use std::rc::Rc;

    /// N = 1, K = 1, row [0, 0], table [0, 1, 2, 3]: [false] -> 0.0,
    /// [true] -> 3.0.
    fn toy_table(max_evaluations: i64) -> Rc<PseudoBooleanTable> {
        Rc::new(PseudoBooleanTable::new(
            1,
            max_evaluations,
            1,
            InstanceFormat::Indexed,
            vec![Subfunction::new(
                SmallVec::from_slice(&[0, 0]),
                vec![0.0, 1.0, 2.0, 3.0],
            )],
        ))
    }

    /// Builds a class over the harness's own clocks without touching the
    /// filesystem.
    fn testing_only_class(harness: &Harness, budget: i64) -> ProblemClass {
        ProblemClass {
            name: "toy".to_string(),
            training_category: TrainingCategory::None,
            training: Vec::new(),
            testing: vec![BudgetedObjective::new(
                toy_table(budget),
                TimingMode::Testing,
                Rc::clone(&harness.clocks.testing),
                budget,
            )],
        }
    }

    /// Evaluates `[false]`, then `[true]`, then attempts a third
    /// evaluation that must hit the count gate.
    struct TwoThenExceed {
        third_outcome: Option<EvaluationError>,
    }

    impl Competitor for TwoThenExceed {
        fn name(&self) -> &str {
            "TwoThenExceed"
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
            assert_eq!(objective.evaluate(&[false])?, 0.0);
            assert_eq!(objective.evaluate(&[true])?, 3.0);
            self.third_outcome = Some(objective.evaluate(&[true]).unwrap_err());
            Ok(())
        }
    }

    #[test]
    fn test_end_to_end_budget_exhaustion_and_report() {
        let mut harness = HarnessBuilder::new().build();
        let class = testing_only_class(&harness, 2);

        let mut competitor = TwoThenExceed {
            third_outcome: None,
        };
        let report = harness
            .run_class(&mut competitor, class)
            .expect("run must succeed");

        assert_eq!(
            competitor.third_outcome,
            Some(EvaluationError::EvaluationsExceeded)
        );
        assert!(report.training_results.is_empty());
        assert_eq!(report.testing_results.len(), 1);

        let record = &report.testing_results[0];
        assert_eq!(record.remaining_evaluations, 0);
        // [true] scored 3.0 with 0 evaluations left afterwards.
        assert_eq!(record.remaining_evaluations_when_best_reached, 0);
        assert_eq!(record.best_value, 3.0);
    }

    /// Returns the budget error from inside the turn instead of finishing.
    struct PropagatesExhaustion;

    impl Competitor for PropagatesExhaustion {
        fn name(&self) -> &str {
            "PropagatesExhaustion"
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
            loop {
                objective.evaluate(&[true])?;
            }
        }
    }

    #[test]
    fn test_budget_exhaustion_is_swallowed_at_the_phase_boundary() {
        let mut harness = HarnessBuilder::new().build();
        let class = testing_only_class(&harness, 3);

        let report = harness
            .run_class(&mut PropagatesExhaustion, class)
            .expect("budget exhaustion is a normal turn end, not a failure");

        assert_eq!(report.testing_results[0].remaining_evaluations, 0);
        assert_eq!(report.testing_results[0].best_value, 3.0);
    }

    #[test]
    fn test_one_exhausted_instance_does_not_abort_the_rest() {
        let mut harness = HarnessBuilder::new().build();
        let mut class = testing_only_class(&harness, 2);
        class.testing.push(BudgetedObjective::new(
            toy_table(4),
            TimingMode::Testing,
            Rc::clone(&harness.clocks.testing),
            4,
        ));

        let report = harness
            .run_class(&mut PropagatesExhaustion, class)
            .expect("run must succeed");

        assert_eq!(report.testing_results.len(), 2);
        assert_eq!(report.testing_results[0].remaining_evaluations, 0);
        assert_eq!(report.testing_results[1].remaining_evaluations, 0);
    }

    /// Passes a wrong-length candidate: a defect, not a budget condition.
    struct MalformedCandidate;

    impl Competitor for MalformedCandidate {
        fn name(&self) -> &str {
            "MalformedCandidate"
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
            objective.evaluate(&[true, false])?;
            Ok(())
        }
    }

    #[test]
    fn test_competitor_defect_aborts_the_run() {
        let mut harness = HarnessBuilder::new().build();
        let class = testing_only_class(&harness, 2);

        let res = harness.run_class(&mut MalformedCandidate, class);
        match res {
            Err(HarnessError::Competitor(e)) => {
                assert_eq!(e.expected, 1);
                assert_eq!(e.found, 2);
            }
            other => panic!("Expected HarnessError::Competitor, got {:?}", other),
        }
    }

    /// Loops until the time gate fires; counts how many evaluations were
    /// still allowed through.
    struct SpinsUntilDeadline {
        evaluations: u64,
    }

    impl Competitor for SpinsUntilDeadline {
        fn name(&self) -> &str {
            "SpinsUntilDeadline"
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
            loop {
                objective.evaluate(&[true])?;
                self.evaluations += 1;
            }
        }
    }

    #[test]
    fn test_zero_time_slice_ends_the_turn_without_exhausting_the_counter() {
        let mut harness = HarnessBuilder::new()
            .base_time_per_instance(Duration::ZERO)
            .build();
        let class = testing_only_class(&harness, 1_000_000);

        let mut competitor = SpinsUntilDeadline { evaluations: 0 };
        let report = harness
            .run_class(&mut competitor, class)
            .expect("deadline expiry is a normal turn end");

        // The time gate, not the counter, ended the turn.
        assert!(report.testing_results[0].remaining_evaluations > 0);
        assert_eq!(
            report.testing_results[0].remaining_evaluations,
            1_000_000 - competitor.evaluations as i64
        );
    }

    /// Splits the shared training budget across instances and stops on its
    /// own, recording what it saw.
    struct BudgetInspector {
        seen_training_budgets: Vec<i64>,
        training_deadline: Option<Duration>,
    }

    impl Competitor for BudgetInspector {
        fn name(&self) -> &str {
            "BudgetInspector"
        }

        fn training_category(&self) -> TrainingCategory {
            TrainingCategory::Short
        }

        fn train(
            &mut self,
            training_set: &mut [BudgetedObjective],
            max_time: Duration,
        ) -> Result<(), EvaluationError> {
            self.training_deadline = Some(max_time);
            for objective in training_set.iter() {
                self.seen_training_budgets.push(objective.remaining_evaluations());
            }
            Ok(())
        }

        fn test(
            &mut self,
            _objective: &mut BudgetedObjective,
            _max_time: Duration,
        ) -> Result<(), EvaluationError> {
            Ok(())
        }
    }

    #[test]
    fn test_training_phase_passes_shared_budgets_and_scaled_deadline() {
        let mut harness = HarnessBuilder::new()
            .base_time_per_instance(Duration::from_secs(10))
            .build();

        let training = vec![
            BudgetedObjective::new(
                toy_table(10),
                TimingMode::Training,
                Rc::clone(&harness.clocks.training),
                30,
            ),
            BudgetedObjective::new(
                toy_table(20),
                TimingMode::Training,
                Rc::clone(&harness.clocks.training),
                30,
            ),
        ];
        let class = ProblemClass {
            name: "toy".to_string(),
            training_category: TrainingCategory::Short,
            training,
            testing: Vec::new(),
        };

        let mut competitor = BudgetInspector {
            seen_training_budgets: Vec::new(),
            training_deadline: None,
        };
        harness
            .run_class(&mut competitor, class)
            .expect("run must succeed");

        assert_eq!(competitor.seen_training_budgets, vec![30, 30]);
        // base 10s × 2 instances × multiplier 1.
        assert_eq!(competitor.training_deadline, Some(Duration::from_secs(20)));
    }
}
