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

//! Instance loader for pseudo-Boolean test-function files.
//!
//! This module turns whitespace-delimited text streams into a validated
//! `PseudoBooleanTable`. The on-disk format is a header line of three
//! integers, `N maxEvaluations K` (legacy), or four, `N maxEvaluations K M`
//! (indexed), followed by one line per sub-function row: `K + 1` variable
//! indices then `2^(K + 1)` real table values, all whitespace-separated.
//!
//! The format variant is detected once from the header's token count and
//! recorded on the resulting table; there is a single parsing path for the
//! row bodies. Lines may contain comments introduced by `#`, which are
//! ignored during tokenization.
//!
//! The loader emphasizes clarity and robustness: dimensions must be
//! positive, every row must have exactly the declared token count, and
//! every variable index must fall below `N`, producing descriptive errors
//! that point directly at the offending row. An arity limit guards against
//! headers whose `2^(K + 1)` table size would exhaust memory.
//!
//! The parser accepts any `BufRead`, file path, raw reader, or string
//! slice, making it convenient to integrate with benchmarks, tests, and
//! tooling.

use crate::table::{InstanceFormat, PseudoBooleanTable, Subfunction};
use smallvec::SmallVec;
use std::{
    fs::File,
    io::{BufRead, BufReader, Read},
    path::Path,
};

/// The error type for the instance loading process.
#[derive(Debug)]
pub enum InstanceLoaderError {
    /// An I/O error occurred while reading the input stream.
    Io(std::io::Error),
    /// The input stream ended before all declared rows were read.
    UnexpectedEof,
    /// A token could not be parsed into the expected numeric type.
    Parse(ParseTokenError),
    /// The header line did not contain three or four tokens.
    MalformedHeader {
        /// The number of tokens actually found on the header line.
        found_tokens: usize,
    },
    /// A dimension (N, maxEvaluations, K or M) is not a positive integer.
    InvalidDimensions,
    /// The declared arity would require a table larger than the limit.
    ArityLimitExceeded {
        /// The arity `K` declared in the header.
        arity: usize,
        /// The loader's configured ceiling.
        limit: usize,
    },
    /// A row line's token count does not match the declared shape.
    RowShape(RowShapeError),
    /// A row reads a variable index outside `0..N`.
    IndexOutOfRange {
        /// The zero-based row number.
        row: usize,
        /// The offending variable index.
        index: usize,
        /// The declared number of variables.
        num_variables: usize,
    },
}

/// Details about a failed token parsing attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseTokenError {
    /// The string token that failed to parse.
    pub token: String,
    /// The name of the type we tried to parse into (e.g., "i64").
    pub type_name: &'static str,
}

impl std::fmt::Display for ParseTokenError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Could not parse token '{}' as type {}",
            self.token, self.type_name
        )
    }
}

impl std::error::Error for ParseTokenError {}

/// Details about a row whose token count does not match the header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowShapeError {
    /// The zero-based row number.
    pub row: usize,
    /// The token count the header's `K` implies.
    pub expected_tokens: usize,
    /// The token count actually found on the line.
    pub found_tokens: usize,
}

impl std::fmt::Display for RowShapeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Row {} has {} tokens, expected {}",
            self.row, self.found_tokens, self.expected_tokens
        )
    }
}

impl std::error::Error for RowShapeError {}

impl std::fmt::Display for InstanceLoaderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::UnexpectedEof => write!(f, "Unexpected end of file while parsing instance"),
            Self::Parse(e) => write!(f, "Parse error: {}", e),
            Self::MalformedHeader { found_tokens } => {
                write!(
                    f,
                    "Header line must have 3 or 4 integer fields, found {}",
                    found_tokens
                )
            }
            Self::InvalidDimensions => {
                write!(
                    f,
                    "Instance dimensions (N, maxEvaluations, K, M) must be positive integers"
                )
            }
            Self::ArityLimitExceeded { arity, limit } => {
                write!(
                    f,
                    "Sub-function arity {} exceeds the loader limit of {}",
                    arity, limit
                )
            }
            Self::RowShape(e) => write!(f, "Row shape error: {}", e),
            Self::IndexOutOfRange {
                row,
                index,
                num_variables,
            } => {
                write!(
                    f,
                    "Row {} reads variable {}, but the instance has only {} variables",
                    row, index, num_variables
                )
            }
        }
    }
}

impl std::error::Error for InstanceLoaderError {}

impl From<std::io::Error> for InstanceLoaderError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<ParseTokenError> for InstanceLoaderError {
    fn from(e: ParseTokenError) -> Self {
        Self::Parse(e)
    }
}

impl From<RowShapeError> for InstanceLoaderError {
    fn from(e: RowShapeError) -> Self {
        Self::RowShape(e)
    }
}

/// A configurable loader for pseudo-Boolean test-function instances.
///
/// The format this parser expects is as follows (whitespace-separated
/// tokens, `#` starts a comment):
///
/// ```raw
/// N maxEvaluations K [M]   // number of variables, budget ceiling, arity, optional row count
/// i_1 ... i_{K+1} t_1 ... t_{2^(K+1)}   // row 1: variable indices, then table values
/// ...
/// ```
///
/// With a four-field header there are `M` rows; with a three-field header
/// there are exactly `N`.
///
/// # Configuration
/// * `arity_limit`: headers declaring `K` above this value are rejected
///   before the `2^(K + 1)` table allocation is attempted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InstanceLoader {
    arity_limit: usize,
}

impl Default for InstanceLoader {
    fn default() -> Self {
        Self {
            arity_limit: Self::DEFAULT_ARITY_LIMIT,
        }
    }
}

impl InstanceLoader {
    /// Default ceiling on `K`: a row table of at most 2^21 entries.
    const DEFAULT_ARITY_LIMIT: usize = 20;

    /// Creates a new `InstanceLoader` with default settings.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the maximum accepted sub-function arity.
    #[inline]
    pub fn arity_limit(mut self, limit: usize) -> Self {
        self.arity_limit = limit;
        self
    }

    /// Loads an instance from a type implementing `BufRead`.
    pub fn from_bufread<R: BufRead>(
        &self,
        rdr: R,
    ) -> Result<PseudoBooleanTable, InstanceLoaderError> {
        let mut sc = LineScanner::new(rdr);

        // Header: 3 integers (legacy) or 4 (indexed).
        let header = sc.next_content_line()?.ok_or(InstanceLoaderError::UnexpectedEof)?;
        let fields: Vec<&str> = header.split_whitespace().collect();
        let format = match fields.len() {
            3 => InstanceFormat::Legacy,
            4 => InstanceFormat::Indexed,
            n => return Err(InstanceLoaderError::MalformedHeader { found_tokens: n }),
        };

        let num_variables: i64 = parse_token(fields[0])?;
        let max_evaluations: i64 = parse_token(fields[1])?;
        let arity: i64 = parse_token(fields[2])?;
        let declared_rows: i64 = match format {
            InstanceFormat::Indexed => parse_token(fields[3])?,
            InstanceFormat::Legacy => num_variables,
        };

        if num_variables <= 0 || max_evaluations <= 0 || arity <= 0 || declared_rows <= 0 {
            return Err(InstanceLoaderError::InvalidDimensions);
        }

        let num_variables = num_variables as usize;
        let arity = arity as usize;
        let declared_rows = declared_rows as usize;

        if arity > self.arity_limit {
            return Err(InstanceLoaderError::ArityLimitExceeded {
                arity,
                limit: self.arity_limit,
            });
        }

        let index_count = arity + 1;
        let table_count = 1usize << index_count;

        let mut rows = Vec::with_capacity(declared_rows);
        for row in 0..declared_rows {
            let line = sc.next_content_line()?.ok_or(InstanceLoaderError::UnexpectedEof)?;
            let tokens: Vec<&str> = line.split_whitespace().collect();

            if tokens.len() != index_count + table_count {
                return Err(InstanceLoaderError::RowShape(RowShapeError {
                    row,
                    expected_tokens: index_count + table_count,
                    found_tokens: tokens.len(),
                }));
            }

            let mut indices: SmallVec<[usize; 8]> = SmallVec::with_capacity(index_count);
            for &token in &tokens[..index_count] {
                let index: usize = parse_token(token)?;
                if index >= num_variables {
                    return Err(InstanceLoaderError::IndexOutOfRange {
                        row,
                        index,
                        num_variables,
                    });
                }
                indices.push(index);
            }

            let mut table = Vec::with_capacity(table_count);
            for &token in &tokens[index_count..] {
                table.push(parse_token::<f64>(token)?);
            }

            rows.push(Subfunction::new(indices, table));
        }

        Ok(PseudoBooleanTable::new(
            num_variables,
            max_evaluations,
            arity,
            format,
            rows,
        ))
    }

    /// Loads an instance from a file path.
    #[inline]
    pub fn from_path<P: AsRef<Path>>(
        &self,
        path: P,
    ) -> Result<PseudoBooleanTable, InstanceLoaderError> {
        let file = File::open(path)?;
        self.from_bufread(BufReader::new(file))
    }

    /// Loads an instance from a generic reader.
    #[inline]
    pub fn from_reader<R: Read>(&self, r: R) -> Result<PseudoBooleanTable, InstanceLoaderError> {
        self.from_bufread(BufReader::new(r))
    }

    /// Loads an instance from a string slice.
    #[inline]
    pub fn from_str(&self, s: &str) -> Result<PseudoBooleanTable, InstanceLoaderError> {
        self.from_reader(s.as_bytes())
    }
}

/// Parses one token into `T`, reporting the token and target type on failure.
fn parse_token<T: std::str::FromStr>(token: &str) -> Result<T, InstanceLoaderError> {
    token.parse::<T>().map_err(|_| {
        InstanceLoaderError::Parse(ParseTokenError {
            token: token.to_owned(),
            type_name: std::any::type_name::<T>(),
        })
    })
}

/// A helper that yields successive content lines from a generic reader,
/// skipping blank lines and stripping `#` comments.
struct LineScanner<R> {
    rdr: R,
    buf: String,
}

impl<R: BufRead> LineScanner<R> {
    /// Creates a new `LineScanner` wrapping the given reader.
    #[inline]
    fn new(rdr: R) -> Self {
        Self {
            rdr,
            buf: String::new(),
        }
    }

    /// Returns the next non-empty line with comments removed, or `None` on
    /// end of input.
    fn next_content_line(&mut self) -> Result<Option<String>, InstanceLoaderError> {
        loop {
            self.buf.clear();
            let n = self
                .rdr
                .read_line(&mut self.buf)
                .map_err(InstanceLoaderError::Io)?;
            if n == 0 {
                return Ok(None);
            }

            let line = match self.buf.split_once('#') {
                Some((content, _comment)) => content,
                None => self.buf.as_str(),
            };
            let line = line.trim();
            if !line.is_empty() {
                return Ok(Some(line.to_owned()));
            }
        }
    }
}
