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

//! Suite loading and shared-budget computation.
//!
//! A problem class is a directory holding two inventory files
//! (`trainingFiles.txt` and `testingFiles.txt`, each a count line followed
//! by that many relative file names) plus the instance files they list.
//!
//! The one genuinely non-trivial policy here is the training budget: the
//! instances' own `max_evaluations` ceilings are summed, scaled by the
//! category multiplier, and that single shared total becomes the starting
//! counter of **every** training objective alike. The counters are
//! deliberately unlinked copies of one shared number: a competitor is
//! expected to partition the total across instances at its own discretion,
//! and exhausting one wrapper's copy does not reduce another's. Testing
//! objectives carry their own instance-local budgets instead.

use crate::{
    category::TrainingCategory,
    clock::PhaseClocks,
    objective::{BudgetedObjective, TimingMode},
};
use crucible_model::loading::{InstanceLoader, InstanceLoaderError};
use std::{
    fs::File,
    io::{BufRead, BufReader},
    path::{Path, PathBuf},
    rc::Rc,
};

/// The error type for suite loading. All variants are fatal: they abort the
/// run before any competitor code executes.
#[derive(Debug)]
pub enum SuiteError {
    /// An inventory file is absent.
    MissingInventory(PathBuf),
    /// An inventory file's count line or entry list is inconsistent.
    MalformedInventory {
        /// The inventory file in question.
        path: PathBuf,
        /// What was wrong with it.
        reason: String,
    },
    /// A listed instance file failed to parse.
    Instance {
        /// The instance file in question.
        path: PathBuf,
        /// The loader failure.
        source: InstanceLoaderError,
    },
    /// An I/O error occurred while reading an inventory.
    Io(std::io::Error),
}

impl std::fmt::Display for SuiteError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingInventory(path) => {
                write!(f, "Inventory file {} not found", path.display())
            }
            Self::MalformedInventory { path, reason } => {
                write!(f, "Malformed inventory {}: {}", path.display(), reason)
            }
            Self::Instance { path, source } => {
                write!(f, "Failed to load instance {}: {}", path.display(), source)
            }
            Self::Io(e) => write!(f, "I/O error: {e}"),
        }
    }
}

impl std::error::Error for SuiteError {}

impl From<std::io::Error> for SuiteError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

/// A named benchmark suite: the training category, the training objectives
/// sharing one synthetic budget total, and the testing objectives with
/// their private budgets.
#[derive(Debug)]
pub struct ProblemClass {
    pub(crate) name: String,
    pub(crate) training_category: TrainingCategory,
    pub(crate) training: Vec<BudgetedObjective>,
    pub(crate) testing: Vec<BudgetedObjective>,
}

impl ProblemClass {
    /// Loads a suite from its root directory.
    ///
    /// Training instances are only read for `Short`/`Long`; with
    /// `TrainingCategory::None` the training sequence is empty and no
    /// training budget is computed. The clocks are threaded into every
    /// objective so the harness can arm deadlines later.
    pub fn load(
        root: &Path,
        training_category: TrainingCategory,
        clocks: &PhaseClocks,
    ) -> Result<Self, SuiteError> {
        let training_files = read_inventory(&root.join("trainingFiles.txt"))?;
        let testing_files = read_inventory(&root.join("testingFiles.txt"))?;

        let loader = InstanceLoader::new();

        let mut training_tables = Vec::new();
        if training_category.has_training_phase() {
            for name in &training_files {
                training_tables.push(load_instance(&loader, &root.join(name))?);
            }
        }

        let total: i64 = training_tables.iter().map(|t| t.max_evaluations()).sum();
        let shared_training_evaluations = total * training_category.multiplier();

        let training = training_tables
            .into_iter()
            .map(|table| {
                BudgetedObjective::new(
                    table,
                    TimingMode::Training,
                    Rc::clone(&clocks.training),
                    shared_training_evaluations,
                )
            })
            .collect();

        let mut testing = Vec::with_capacity(testing_files.len());
        for name in &testing_files {
            let table = load_instance(&loader, &root.join(name))?;
            let individual_testing_evaluations = table.max_evaluations();
            testing.push(BudgetedObjective::new(
                table,
                TimingMode::Testing,
                Rc::clone(&clocks.testing),
                individual_testing_evaluations,
            ));
        }

        let name = root
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("suite")
            .to_string();

        Ok(Self {
            name,
            training_category,
            training,
            testing,
        })
    }

    /// The suite's name (the root directory's base name).
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The training category this suite was loaded for.
    #[inline]
    pub fn training_category(&self) -> TrainingCategory {
        self.training_category
    }

    /// The training objectives in inventory order (empty for `None`).
    #[inline]
    pub fn training(&self) -> &[BudgetedObjective] {
        &self.training
    }

    /// The testing objectives in inventory order.
    #[inline]
    pub fn testing(&self) -> &[BudgetedObjective] {
        &self.testing
    }
}

impl std::fmt::Display for ProblemClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "ProblemClass(name: {}, training_category: {})",
            self.name, self.training_category
        )?;
        for objective in &self.training {
            writeln!(f, "  {}", objective)?;
        }
        for objective in &self.testing {
            writeln!(f, "  {}", objective)?;
        }
        Ok(())
    }
}

/// Reads an inventory file: a count line, then exactly that many file
/// names. Fewer names than declared, a non-integer count, or trailing
/// non-empty lines are all malformed.
fn read_inventory(path: &Path) -> Result<Vec<String>, SuiteError> {
    if !path.exists() {
        return Err(SuiteError::MissingInventory(path.to_path_buf()));
    }

    let file = File::open(path)?;
    let mut lines = BufReader::new(file).lines();

    let count_line = match lines.next() {
        Some(line) => line?,
        None => {
            return Err(SuiteError::MalformedInventory {
                path: path.to_path_buf(),
                reason: "empty file, expected a count line".to_string(),
            });
        }
    };

    let declared: usize = count_line.trim().parse().map_err(|_| {
        SuiteError::MalformedInventory {
            path: path.to_path_buf(),
            reason: format!("count line '{}' is not a valid integer", count_line.trim()),
        }
    })?;

    let mut entries = Vec::with_capacity(declared);
    for line in lines {
        let line = line?;
        let entry = line.trim();
        if !entry.is_empty() {
            entries.push(entry.to_string());
        }
    }

    if entries.len() != declared {
        return Err(SuiteError::MalformedInventory {
            path: path.to_path_buf(),
            reason: format!("declared {} entries, found {}", declared, entries.len()),
        });
    }

    Ok(entries)
}

fn load_instance(
    loader: &InstanceLoader,
    path: &Path,
) -> Result<Rc<crucible_model::table::PseudoBooleanTable>, SuiteError> {
    loader
        .from_path(path)
        .map(Rc::new)
        .map_err(|source| SuiteError::Instance {
            path: path.to_path_buf(),
            source,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::sync::atomic::{AtomicU64, Ordering};

    /// A throwaway suite directory under the system temp dir, removed on
    /// drop.
    struct TempSuite {
        root: PathBuf,
    }

    impl TempSuite {
        fn new() -> Self {
            static COUNTER: AtomicU64 = AtomicU64::new(0);
            let id = COUNTER.fetch_add(1, Ordering::Relaxed);
            let root = std::env::temp_dir().join(format!(
                "crucible-suite-{}-{}",
                std::process::id(),
                id
            ));
            fs::create_dir_all(&root).expect("failed to create temp suite dir");
            Self { root }
        }

        fn write(&self, name: &str, contents: &str) -> &Self {
            fs::write(self.root.join(name), contents).expect("failed to write suite file");
            self
        }
    }

    impl Drop for TempSuite {
        fn drop(&mut self) {
            let _ = fs::remove_dir_all(&self.root);
        }
    }

    /// One-variable instance with the given budget ceiling.
    fn instance_text(max_evaluations: i64) -> String {
        format!("1 {} 1 1\n0 0 0.0 1.0 2.0 3.0\n", max_evaluations)
    }

    fn populated_suite() -> TempSuite {
        let suite = TempSuite::new();
        suite
            .write("trainingFiles.txt", "2\ntrain-00.txt\ntrain-01.txt\n")
            .write("testingFiles.txt", "1\ntest-00.txt\n")
            .write("train-00.txt", &instance_text(10))
            .write("train-01.txt", &instance_text(20))
            .write("test-00.txt", &instance_text(7));
        suite
    }

    #[test]
    fn test_short_category_shares_summed_budget_across_training_wrappers() {
        let suite = populated_suite();
        let class = ProblemClass::load(&suite.root, TrainingCategory::Short, &PhaseClocks::new())
            .expect("Failed to load suite");

        assert_eq!(class.training().len(), 2);
        for objective in class.training() {
            // (10 + 20) * 1; every wrapper starts at the same shared total.
            assert_eq!(objective.remaining_evaluations(), 30);
            assert_eq!(objective.timing_mode(), TimingMode::Training);
        }
    }

    #[test]
    fn test_long_category_doubles_the_shared_budget() {
        let suite = populated_suite();
        let class = ProblemClass::load(&suite.root, TrainingCategory::Long, &PhaseClocks::new())
            .expect("Failed to load suite");

        for objective in class.training() {
            assert_eq!(objective.remaining_evaluations(), 60);
        }
    }

    #[test]
    fn test_none_category_loads_no_training_instances() {
        let suite = populated_suite();
        let class = ProblemClass::load(&suite.root, TrainingCategory::None, &PhaseClocks::new())
            .expect("Failed to load suite");

        assert!(class.training().is_empty());
        assert_eq!(class.testing().len(), 1);
    }

    #[test]
    fn test_testing_wrappers_carry_their_own_instance_budgets() {
        let suite = populated_suite();
        let class = ProblemClass::load(&suite.root, TrainingCategory::Short, &PhaseClocks::new())
            .expect("Failed to load suite");

        assert_eq!(class.testing()[0].remaining_evaluations(), 7);
        assert_eq!(class.testing()[0].timing_mode(), TimingMode::Testing);
    }

    #[test]
    fn test_missing_inventory_is_fatal() {
        let suite = TempSuite::new();
        suite.write("testingFiles.txt", "0\n");

        let res = ProblemClass::load(&suite.root, TrainingCategory::None, &PhaseClocks::new());
        match res {
            Err(SuiteError::MissingInventory(path)) => {
                assert!(path.ends_with("trainingFiles.txt"));
            }
            other => panic!("Expected MissingInventory, got {:?}", other),
        }
    }

    #[test]
    fn test_non_integer_count_line_is_malformed() {
        let suite = TempSuite::new();
        suite
            .write("trainingFiles.txt", "two\ntrain-00.txt\n")
            .write("testingFiles.txt", "0\n");

        let res = ProblemClass::load(&suite.root, TrainingCategory::None, &PhaseClocks::new());
        match res {
            Err(SuiteError::MalformedInventory { reason, .. }) => {
                assert!(reason.contains("not a valid integer"));
            }
            other => panic!("Expected MalformedInventory, got {:?}", other),
        }
    }

    #[test]
    fn test_entry_count_disagreement_is_malformed() {
        let suite = TempSuite::new();
        suite
            .write("trainingFiles.txt", "3\ntrain-00.txt\n")
            .write("testingFiles.txt", "0\n");

        let res = ProblemClass::load(&suite.root, TrainingCategory::None, &PhaseClocks::new());
        match res {
            Err(SuiteError::MalformedInventory { reason, .. }) => {
                assert!(reason.contains("declared 3 entries, found 1"));
            }
            other => panic!("Expected MalformedInventory, got {:?}", other),
        }
    }

    #[test]
    fn test_broken_instance_file_is_reported_with_its_path() {
        let suite = TempSuite::new();
        suite
            .write("trainingFiles.txt", "0\n")
            .write("testingFiles.txt", "1\ntest-00.txt\n")
            .write("test-00.txt", "1 10 1 1\n0 0 0.0 1.0\n");

        let res = ProblemClass::load(&suite.root, TrainingCategory::None, &PhaseClocks::new());
        match res {
            Err(SuiteError::Instance { path, source }) => {
                assert!(path.ends_with("test-00.txt"));
                assert!(matches!(source, InstanceLoaderError::RowShape(_)));
            }
            other => panic!("Expected Instance error, got {:?}", other),
        }
    }

    #[test]
    fn test_training_instances_are_skipped_entirely_for_none() {
        // The training inventory lists a file that does not exist; with
        // category None it must never be opened.
        let suite = TempSuite::new();
        suite
            .write("trainingFiles.txt", "1\nno-such-file.txt\n")
            .write("testingFiles.txt", "0\n");

        let class = ProblemClass::load(&suite.root, TrainingCategory::None, &PhaseClocks::new())
            .expect("Failed to load suite");
        assert!(class.training().is_empty());
    }
}
