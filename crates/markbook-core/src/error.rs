//! Typed errors for the grading engine.
//!
//! Only structural failures get a variant here: a roster or index the
//! session controller cannot work with, or a total-points value a caller
//! chose to validate before scoring. Missing grading data (no selection for
//! a criterion, unknown late-policy key, unknown rubric level) is never an
//! error — the engine scores it as zero contribution so a half-graded
//! assignment still renders a number.

use thiserror::Error;

/// Structural failures surfaced at the engine's API boundary.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum GradingError {
    /// A grading session cannot be started over zero students.
    #[error("cannot start a grading session with an empty roster")]
    EmptyRoster,

    /// Session navigation outside the roster bounds.
    #[error("student index {index} out of range for roster of {len}")]
    OutOfRange { index: isize, len: usize },

    /// An assignment's total points must be positive for percentages to
    /// mean anything. Only raised by [`crate::scoring::validate_total_points`];
    /// the scoring functions themselves degrade to 0% instead.
    #[error("total points must be positive and finite, got {0}")]
    InvalidTotalPoints(f64),
}

impl GradingError {
    /// Returns `true` for errors callers typically map to disabled
    /// navigation controls rather than a user-visible failure.
    pub fn is_navigation(&self) -> bool {
        matches!(
            self,
            GradingError::EmptyRoster | GradingError::OutOfRange { .. }
        )
    }
}
