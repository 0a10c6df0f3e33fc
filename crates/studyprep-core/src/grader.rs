//! Answer grading policy.
//!
//! Grading is pure: it classifies one submitted answer against a question's
//! expected answer and never fails. Comparison problems (an unparseable
//! number, an expression the symbolic engine cannot handle) degrade to a
//! case-insensitive, whitespace-trimmed string comparison.

use crate::model::{ExpectedAnswer, Grade, Question};
use crate::symbolic;

/// Absolute tolerance for numeric answers.
pub const NUMERIC_TOLERANCE: f64 = 1e-6;

/// Whether symbolic comparison is available to the grader.
///
/// Resolved once when the grader is built, typically from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SymbolicCapability {
    #[default]
    Enabled,
    Disabled,
}

impl SymbolicCapability {
    pub fn from_flag(enabled: bool) -> Self {
        if enabled {
            SymbolicCapability::Enabled
        } else {
            SymbolicCapability::Disabled
        }
    }
}

/// Grades submitted answers.
#[derive(Debug, Clone, Copy, Default)]
pub struct Grader {
    symbolic: SymbolicCapability,
}

impl Grader {
    pub fn new(symbolic: SymbolicCapability) -> Self {
        Self { symbolic }
    }

    pub fn symbolic(&self) -> SymbolicCapability {
        self.symbolic
    }

    /// Grade `submitted` against `question`.
    ///
    /// Questions without an expected answer go to manual review; everything
    /// else is auto-graded regardless of which comparison path decided it.
    pub fn grade(&self, question: &Question, submitted: &str) -> Grade {
        let Some(expected) = &question.answer else {
            tracing::debug!(kind = %question.kind, "no expected answer, routing to manual review");
            return Grade::manual_review();
        };

        let correct = match expected {
            ExpectedAnswer::Numeric(value) => grade_numeric(*value, submitted),
            ExpectedAnswer::Text(text) => self.grade_text(text, submitted),
        };
        Grade::auto(correct)
    }

    fn grade_text(&self, expected: &str, submitted: &str) -> bool {
        if text_matches(expected, submitted) {
            return true;
        }
        if self.symbolic == SymbolicCapability::Disabled || !symbolic::looks_symbolic(expected) {
            return false;
        }
        match symbolic::equivalent(expected, submitted) {
            Ok(equal) => equal,
            Err(e) => {
                tracing::debug!("symbolic comparison failed ({e}), using string match");
                false
            }
        }
    }
}

fn grade_numeric(expected: f64, submitted: &str) -> bool {
    match submitted.trim().parse::<f64>() {
        Ok(value) => (value - expected).abs() < NUMERIC_TOLERANCE,
        Err(_) => {
            tracing::debug!("submitted answer is not numeric, using string match");
            text_matches(&expected.to_string(), submitted)
        }
    }
}

/// Case-insensitive, whitespace-trimmed equality.
pub fn text_matches(expected: &str, submitted: &str) -> bool {
    expected.trim().to_lowercase() == submitted.trim().to_lowercase()
}
