//! Export-facing result shapes.
//!
//! The HTML/Excel/PDF adapters live outside this crate; these are the
//! plain serializable rows and summaries they consume. The builders run
//! the scoring pipeline so adapters never compute grades themselves.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::gradebook::{ClassStatistics, GradeBook, StatisticsConfig};
use crate::model::{LatePolicy, Rubric, Student};
use crate::scale::GradeScale;
use crate::scoring::{apply_late_policy, final_grade, raw_score};
use crate::store::GradeRecord;

/// One student's scored assignment, ready for export.
#[derive(Debug, Clone, Serialize)]
pub struct StudentReportRow {
    pub student_id: String,
    pub raw_score: f64,
    pub final_score: f64,
    pub percentage: f64,
    pub letter_grade: String,
    pub passed: bool,
    pub penalty_applied: bool,
    pub late_policy_description: String,
}

/// Score one student's record through the full pipeline.
///
/// Recomputes from the stored selections rather than trusting any cached
/// score fields on the record, so exports always reflect the rubric and
/// policy they are handed.
pub fn student_row(
    rubric: &Rubric,
    policy: &LatePolicy,
    record: &GradeRecord,
    scale: GradeScale,
) -> StudentReportRow {
    let raw = raw_score(rubric, &record.selections);
    let late = apply_late_policy(raw, policy, &record.late_policy_level);
    let grade = final_grade(
        late.final_score,
        rubric.assignment().total_points,
        rubric.assignment().passing_threshold_percent,
        scale,
    );
    StudentReportRow {
        student_id: record.student_id.clone(),
        raw_score: raw,
        final_score: late.final_score,
        percentage: grade.percentage,
        letter_grade: grade.letter_grade,
        passed: grade.passed,
        penalty_applied: late.penalty_applied,
        late_policy_description: policy
            .level_for(&record.late_policy_level)
            .description
            .clone(),
    }
}

/// Class-level rollup for export.
#[derive(Debug, Clone, Serialize)]
pub struct ClassSummary {
    pub statistics: ClassStatistics,
    pub student_count: usize,
    pub column_count: usize,
    pub created_at: DateTime<Utc>,
}

/// Aggregate a gradebook into an export-ready class summary.
pub fn class_summary(
    book: &GradeBook,
    roster: &[Student],
    passing_threshold_percent: f64,
    config: StatisticsConfig,
) -> ClassSummary {
    ClassSummary {
        statistics: book.class_statistics(roster, passing_threshold_percent, config),
        student_count: roster.len(),
        column_count: book.columns().len(),
        created_at: Utc::now(),
    }
}
