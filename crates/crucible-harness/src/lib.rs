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

//! # Crucible Harness
//!
//! **The evaluation-budget enforcement engine for black-box optimization
//! benchmarking.**
//!
//! A *competitor* (an optimization strategy supplied by the caller) is run
//! against a suite of pseudo-Boolean test functions under strict wall-clock
//! and evaluation-count budgets. Every objective call is gated before the
//! candidate is scored, a competitor's turn ends the instant a budget is
//! exceeded, and the anytime-best trajectory of each objective feeds a
//! reproducible score report.
//!
//! ## Architecture
//!
//! * **`clock`**: phase-scoped elapsed-time clocks, one per phase, shared by
//!   every objective active in that phase.
//! * **`objective`**: `BudgetedObjective`, the budget gate wrapping one test
//!   function with a countdown counter and best-value tracking.
//! * **`category`**: the `None`/`Short`/`Long` training categories and their
//!   budget multipliers.
//! * **`suite`**: `ProblemClass`, loading a named suite's training and
//!   testing inventories and computing the shared training budget.
//! * **`competitor`**: the trait a strategy implements to enter the arena.
//! * **`harness`**: the orchestrator running the training and testing
//!   phases and catching budget-exceeded turns at the phase boundary.
//! * **`report`**: the serializable score report emitted after a run.
//!
//! ## Design Philosophy
//!
//! 1. **Gate before work**: both budget gates are checked before the
//!    candidate is evaluated, so a competitor never gets one free expensive
//!    evaluation past a deadline.
//! 2. **Errors as flow control, typed**: budget exhaustion is an ordinary
//!    `Result` error the competitor propagates with `?`; the harness treats
//!    exactly those two variants as the normal end of a turn and everything
//!    else as a defect in the competitor.
//! 3. **Single logical thread**: enforcement is cooperative and the whole
//!    protocol runs on the calling thread, so clocks are `Rc`/`Cell` shared
//!    state with no locking.

pub mod category;
pub mod clock;
pub mod competitor;
pub mod harness;
pub mod objective;
pub mod report;
pub mod suite;
