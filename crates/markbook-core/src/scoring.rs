//! Pure scoring functions.
//!
//! Everything here is a synchronous computation over plain data: no I/O,
//! no stored state, no panics. Missing or partial grading data is never an
//! error — it contributes zero points, so a grading session in progress
//! always produces a well-defined (if low) score.

use std::collections::HashMap;

use serde::Serialize;

use crate::error::GradingError;
use crate::model::{Criterion, CriterionSelection, LatePolicy, Rubric, NONE_LEVEL};
use crate::scale::GradeScale;

/// Points earned on one criterion.
///
/// Returns 0.0 when the selection is absent ("not yet assessed") or names a
/// level the rubric doesn't have. Multipliers are trusted as-is: a rubric
/// built through [`Rubric::new`] guarantees `[0, 1]`, and the engine does
/// not clamp malformed ones on the caller's behalf.
pub fn criterion_points(
    criterion: &Criterion,
    selection: Option<&CriterionSelection>,
    rubric: &Rubric,
) -> f64 {
    let Some(selection) = selection else {
        return 0.0;
    };
    match rubric.level_for(&selection.selected_level_key) {
        Some(level) => criterion.max_points * level.multiplier,
        None => {
            tracing::warn!(
                criterion = %criterion.id,
                level = %selection.selected_level_key,
                "selection references unknown rubric level, scoring 0"
            );
            0.0
        }
    }
}

/// Sum of criterion points over the whole rubric.
///
/// A pure sum, so the result is independent of criterion order. Selections
/// are keyed by criterion id; criteria without a selection contribute 0.
pub fn raw_score(rubric: &Rubric, selections: &HashMap<String, CriterionSelection>) -> f64 {
    rubric
        .criteria()
        .iter()
        .map(|c| criterion_points(c, selections.get(&c.id), rubric))
        .sum()
}

/// Result of applying a late policy to a raw score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LateOutcome {
    /// `raw_score * multiplier`.
    pub final_score: f64,
    /// The multiplier that was applied.
    pub multiplier_applied: f64,
    /// Whether a non-`"none"` tier was selected. By convention this is true
    /// for any other tier even if its multiplier happens to be 1.0.
    pub penalty_applied: bool,
}

/// Apply a late-submission penalty tier to a raw score.
///
/// Unknown tier keys degrade to the `"none"` identity tier (no penalty),
/// but still count as `penalty_applied = false` only when the key literally
/// is `"none"` — see [`LateOutcome::penalty_applied`].
pub fn apply_late_policy(raw_score: f64, policy: &LatePolicy, level_key: &str) -> LateOutcome {
    let level = policy.level_for(level_key);
    LateOutcome {
        final_score: raw_score * level.multiplier,
        multiplier_applied: level.multiplier,
        penalty_applied: level_key != NONE_LEVEL,
    }
}

/// A score expressed against an assignment's total.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FinalGrade {
    /// Rounded percentage in `[0, 100]` for well-formed input.
    pub percentage: f64,
    /// Letter under the active [`GradeScale`].
    pub letter_grade: String,
    /// Whether the percentage meets the passing threshold.
    pub passed: bool,
}

/// Convert a score to a percentage, letter grade, and pass/fail verdict.
///
/// `total_points <= 0` (or non-finite) yields 0% rather than NaN/Infinity;
/// callers that prefer an error should run [`validate_total_points`] first.
pub fn final_grade(
    score: f64,
    total_points: f64,
    passing_threshold_percent: f64,
    scale: GradeScale,
) -> FinalGrade {
    let percentage = if total_points > 0.0 && total_points.is_finite() {
        (score / total_points * 100.0).round()
    } else {
        0.0
    };
    FinalGrade {
        percentage,
        letter_grade: scale.letter_for(percentage).to_string(),
        passed: percentage >= passing_threshold_percent,
    }
}

/// Optional pre-flight check for callers that want a typed failure instead
/// of the 0% degradation built into [`final_grade`].
pub fn validate_total_points(total_points: f64) -> Result<(), GradingError> {
    if total_points > 0.0 && total_points.is_finite() {
        Ok(())
    } else {
        Err(GradingError::InvalidTotalPoints(total_points))
    }
}
