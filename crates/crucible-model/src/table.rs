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

//! K-bounded pseudo-Boolean test functions realized as lookup tables.
//!
//! A `PseudoBooleanTable` is a sum of sub-functions, each depending on a
//! small fixed number of Boolean variables. Every sub-function row carries
//! an ordered list of `arity + 1` variable indices and a lookup table of
//! `2^(arity + 1)` real values indexed by the bit pattern of those
//! variables, most-significant index first.
//!
//! Evaluation is pure: the same candidate always yields the same value, and
//! nothing in this module mutates state. Budget and timing enforcement are
//! the harness crate's concern.

use smallvec::SmallVec;

/// The on-disk format a table was parsed from.
///
/// The indexed format (header `N maxEvals K M`) carries an explicit row
/// count `M`; the legacy format (header `N maxEvals K`) has exactly one row
/// per variable. Both are handled by one parser with a tagged detection
/// step rather than two parallel code paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstanceFormat {
    /// Header of four integers; `M` sub-function rows.
    Indexed,
    /// Header of three integers; exactly `num_variables` rows.
    Legacy,
}

impl std::fmt::Display for InstanceFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InstanceFormat::Indexed => write!(f, "indexed"),
            InstanceFormat::Legacy => write!(f, "legacy"),
        }
    }
}

/// The error returned when a candidate vector has the wrong length.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateError {
    /// The number of variables the table expects.
    pub expected: usize,
    /// The length of the candidate that was passed.
    pub found: usize,
}

impl std::fmt::Display for CandidateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "candidate of length {} expected, found {}",
            self.expected, self.found
        )
    }
}

impl std::error::Error for CandidateError {}

/// One sub-function row: the variables it reads and its value table.
#[derive(Debug, Clone, PartialEq)]
pub struct Subfunction {
    /// Ordered variable indices, most-significant first. Always
    /// `arity + 1` entries.
    indices: SmallVec<[usize; 8]>,
    /// Lookup table of `2^(arity + 1)` values indexed by the bit pattern
    /// of the listed variables.
    table: Vec<f64>,
}

impl Subfunction {
    /// Creates a new sub-function row.
    ///
    /// # Panics
    ///
    /// Panics if `table.len() != 2^indices.len()`.
    pub fn new(indices: SmallVec<[usize; 8]>, table: Vec<f64>) -> Self {
        assert_eq!(
            table.len(),
            1usize << indices.len(),
            "called `Subfunction::new` with inconsistent shapes: {} indices require a table of {} entries, found {}",
            indices.len(),
            1usize << indices.len(),
            table.len()
        );
        Self { indices, table }
    }

    /// The ordered variable indices this row reads.
    #[inline]
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    /// The lookup table of this row.
    #[inline]
    pub fn table(&self) -> &[f64] {
        &self.table
    }
}

/// A parsed, immutable pseudo-Boolean test-function instance.
#[derive(Debug, Clone, PartialEq)]
pub struct PseudoBooleanTable {
    num_variables: usize,
    max_evaluations: i64,
    arity: usize,
    format: InstanceFormat,
    rows: Vec<Subfunction>,
}

impl PseudoBooleanTable {
    /// Constructs a table from already-validated parts.
    ///
    /// The loader is the normal entry point; this constructor exists for
    /// synthetic instances in tests and benchmarks and therefore asserts
    /// rather than returning errors.
    ///
    /// # Panics
    ///
    /// Panics if any dimension is zero, the row count does not match the
    /// format, a row's index list is not `arity + 1` long, or a row reads a
    /// variable index `>= num_variables`.
    pub fn new(
        num_variables: usize,
        max_evaluations: i64,
        arity: usize,
        format: InstanceFormat,
        rows: Vec<Subfunction>,
    ) -> Self {
        assert!(
            num_variables > 0 && max_evaluations > 0 && arity > 0,
            "called `PseudoBooleanTable::new` with non-positive dimensions: N = {}, maxEvaluations = {}, K = {}",
            num_variables,
            max_evaluations,
            arity
        );
        if format == InstanceFormat::Legacy {
            assert_eq!(
                rows.len(),
                num_variables,
                "called `PseudoBooleanTable::new` with {} rows in the legacy format, expected one per variable ({})",
                rows.len(),
                num_variables
            );
        }
        for (i, row) in rows.iter().enumerate() {
            assert_eq!(
                row.indices.len(),
                arity + 1,
                "called `PseudoBooleanTable::new` with row {} of {} indices, expected {}",
                i,
                row.indices.len(),
                arity + 1
            );
            for &index in row.indices.iter() {
                assert!(
                    index < num_variables,
                    "called `PseudoBooleanTable::new` with row {} reading variable {}, but N = {}",
                    i,
                    index,
                    num_variables
                );
            }
        }

        Self {
            num_variables,
            max_evaluations,
            arity,
            format,
            rows,
        }
    }

    /// The number of Boolean variables a candidate must have.
    #[inline]
    pub fn num_variables(&self) -> usize {
        self.num_variables
    }

    /// The per-instance evaluation budget ceiling declared in the header.
    #[inline]
    pub fn max_evaluations(&self) -> i64 {
        self.max_evaluations
    }

    /// The sub-function arity `K` (each row reads `K + 1` variables).
    #[inline]
    pub fn arity(&self) -> usize {
        self.arity
    }

    /// The format this instance was parsed from.
    #[inline]
    pub fn format(&self) -> InstanceFormat {
        self.format
    }

    /// The number of sub-function rows.
    #[inline]
    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    /// The sub-function rows in file order.
    #[inline]
    pub fn rows(&self) -> &[Subfunction] {
        &self.rows
    }

    /// Evaluates the candidate: the sum of every row's table entry at the
    /// bit pattern formed by the candidate's values at the row's indices.
    ///
    /// Pure and deterministic, `O(rows × arity)`. Fails if the candidate
    /// length does not equal `num_variables`.
    pub fn evaluate(&self, candidate: &[bool]) -> Result<f64, CandidateError> {
        if candidate.len() != self.num_variables {
            return Err(CandidateError {
                expected: self.num_variables,
                found: candidate.len(),
            });
        }

        let mut total = 0.0;
        for row in &self.rows {
            let mut table_index = 0usize;
            for &var in row.indices.iter() {
                table_index <<= 1;
                table_index |= usize::from(candidate[var]);
            }
            total += row.table[table_index];
        }

        Ok(total)
    }

    /// Renders the instance in its on-disk format.
    ///
    /// Parsing the result with `InstanceLoader` reproduces this table. Used
    /// by round-trip tests and synthetic-suite generation.
    pub fn to_text(&self) -> String {
        use std::fmt::Write;

        let mut out = String::new();
        match self.format {
            InstanceFormat::Indexed => {
                let _ = writeln!(
                    out,
                    "{} {} {} {}",
                    self.num_variables,
                    self.max_evaluations,
                    self.arity,
                    self.rows.len()
                );
            }
            InstanceFormat::Legacy => {
                let _ = writeln!(
                    out,
                    "{} {} {}",
                    self.num_variables, self.max_evaluations, self.arity
                );
            }
        }
        for row in &self.rows {
            let mut first = true;
            for &index in row.indices.iter() {
                if !first {
                    out.push(' ');
                }
                let _ = write!(out, "{}", index);
                first = false;
            }
            for &value in &row.table {
                let _ = write!(out, " {}", value);
            }
            out.push('\n');
        }
        out
    }
}

impl std::fmt::Display for PseudoBooleanTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "PseudoBooleanTable(num_variables: {}, max_evaluations: {}, arity: {}, format: {}, rows: {})",
            self.num_variables,
            self.max_evaluations,
            self.arity,
            self.format,
            self.rows.len()
        )
    }
}
