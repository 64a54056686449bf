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

//! # Crucible Model
//!
//! **The test-function data model for the Crucible benchmarking harness.**
//!
//! This crate defines the representation of a single k-bounded pseudo-Boolean
//! test function (a sum of small lookup-table sub-functions over a fixed
//! number of Boolean variables) together with the loader that parses the
//! on-disk instance format.
//!
//! ## Architecture
//!
//! * **`table`**: the immutable `PseudoBooleanTable` and its pure `evaluate`
//!   entry point. No timing or budget logic lives here; metering is layered
//!   on top by the harness crate.
//! * **`loading`**: a configurable `InstanceLoader` turning whitespace-
//!   delimited text streams into validated tables, with descriptive errors
//!   that point at the offending row.
//!
//! ## Design Philosophy
//!
//! 1. **Purity**: evaluating a candidate is deterministic and side-effect
//!    free, so callers can meter and cache around it safely.
//! 2. **Fail-Fast**: the loader validates dimensions, row shapes, and
//!    variable indices eagerly so evaluation never encounters an invalid
//!    state and never needs bounds branches on the hot path.

pub mod loading;
pub mod table;
