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

use serde::{Deserialize, Serialize};

/// How much training a competitor receives before the testing phase.
///
/// The category scales both the training wall-clock deadline and the shared
/// training evaluation budget via [`TrainingCategory::multiplier`]. The
/// multiplier is a property of the category, not of any instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrainingCategory {
    /// No training phase at all.
    None,
    /// One budget unit per training instance.
    Short,
    /// Double budget per training instance.
    Long,
}

impl TrainingCategory {
    /// The budget multiplier applied to both the training time deadline and
    /// the shared training evaluation total.
    #[inline]
    pub fn multiplier(&self) -> i64 {
        match self {
            TrainingCategory::None => 0,
            TrainingCategory::Short => 1,
            TrainingCategory::Long => 2,
        }
    }

    /// Returns `true` if a training phase runs for this category.
    #[inline]
    pub fn has_training_phase(&self) -> bool {
        !matches!(self, TrainingCategory::None)
    }

    /// Parses a category from its lowercase name.
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "none" => Some(Self::None),
            "short" => Some(Self::Short),
            "long" => Some(Self::Long),
            _ => None,
        }
    }

    /// The lowercase name of this category.
    pub fn as_str(&self) -> &'static str {
        match self {
            TrainingCategory::None => "none",
            TrainingCategory::Short => "short",
            TrainingCategory::Long => "long",
        }
    }
}

impl std::fmt::Display for TrainingCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
