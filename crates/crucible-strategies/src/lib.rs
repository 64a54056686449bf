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

//! # Crucible Strategies
//!
//! Baseline competitors for the Crucible harness. These are reference
//! strategies, not contenders: they demonstrate the competitor contract
//! (consuming budget through `BudgetedObjective::evaluate` and letting `?`
//! end the turn when a gate fires) and give suite authors something to
//! calibrate against.
//!
//! * **`random_search`**: uniform random sampling until the budget is gone.
//! * **`hill_climber`**: next-ascent hillclimbing over the Hamming-1
//!   neighborhood.
//! * **`annealing`**: simulated annealing whose temperature schedule is
//!   learned from random-walk fitness trajectories during training.
//!
//! All strategies are generic over `R: rand::Rng`, so deterministic tests
//! can seed a `ChaCha8Rng` while production runs use an entropy-seeded one.

pub mod annealing;
pub mod bits;
pub mod hill_climber;
pub mod random_search;
