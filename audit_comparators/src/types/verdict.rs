//! Comparison verdicts

use serde::{Deserialize, Serialize};
use std::fmt;

/// Outcome of a single comparison
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Passed,
    Failed,
    /// The rule did not apply to the data (e.g. the identified entity was absent).
    /// Counts as a pass.
    NotApplicable,
}

impl Outcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::Passed => "passed",
            Outcome::Failed => "failed",
            Outcome::NotApplicable => "not_applicable",
        }
    }
}

/// Verdict plus a human-readable diagnostic for the audit report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verdict {
    pub outcome: Outcome,
    pub message: String,
}

impl Verdict {
    pub fn pass(message: impl Into<String>) -> Self {
        Self {
            outcome: Outcome::Passed,
            message: message.into(),
        }
    }

    pub fn fail(message: impl Into<String>) -> Self {
        Self {
            outcome: Outcome::Failed,
            message: message.into(),
        }
    }

    pub fn not_applicable(message: impl Into<String>) -> Self {
        Self {
            outcome: Outcome::NotApplicable,
            message: message.into(),
        }
    }

    /// Standard success verdict
    pub fn check_passed() -> Self {
        Self::pass("Check Passed")
    }

    /// Pass-or-fail from a boolean with the failure message built lazily
    pub fn from_bool<F>(passed: bool, on_failure: F) -> Self
    where
        F: FnOnce() -> String,
    {
        if passed {
            Self::check_passed()
        } else {
            Self::fail(on_failure())
        }
    }

    /// True for `Passed` and `NotApplicable`
    pub fn passed(&self) -> bool {
        !matches!(self.outcome, Outcome::Failed)
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.outcome.as_str(), self.message)
    }
}
