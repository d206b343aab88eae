//! Weighted gradebook aggregation and class statistics.
//!
//! Columns are assignments; cells hold one student's score in one column.
//! Cells are derived data: only the raw score is input, the percentage and
//! letter are recomputed on entry and never edited directly.

use std::collections::HashMap;

use serde::Serialize;

use crate::model::Student;
use crate::scale::GradeScale;

/// Letter-grade sentinel for a student with no graded columns.
pub const UNGRADED: &str = "N/A";

/// One assignment column in the gradebook.
#[derive(Debug, Clone, Serialize)]
pub struct AssignmentColumn {
    /// Stable column identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Points the assignment is out of.
    pub max_points: f64,
    /// Weight of this column in the course grade.
    pub weight: f64,
}

/// A student's entry in one column. Derived from the raw score on entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GradeCell {
    pub raw_score: f64,
    pub percentage: f64,
    pub letter_grade: String,
}

/// A student's aggregated course grade.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CourseGrade {
    pub percentage: f64,
    pub letter_grade: String,
}

/// Class-level aggregates over final course percentages.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ClassStatistics {
    pub average: f64,
    pub max: f64,
    pub min: f64,
    pub passing_rate_percent: f64,
    /// Average percentage per column, over students with a cell there.
    pub per_column_average: HashMap<String, f64>,
}

/// Knobs for class statistics.
#[derive(Debug, Clone, Copy, Default)]
pub struct StatisticsConfig {
    /// When false (the default, matching long-standing gradebook behavior),
    /// students whose final percentage is exactly 0 are treated as ungraded
    /// and excluded from the statistics. A legitimately earned 0% is then
    /// indistinguishable from "not graded yet"; turn this on to count it.
    pub include_zero_percentages: bool,
}

/// Columns plus cells for a whole class.
#[derive(Debug)]
pub struct GradeBook {
    columns: Vec<AssignmentColumn>,
    cells: HashMap<(String, String), GradeCell>,
    scale: GradeScale,
}

impl GradeBook {
    pub fn new(columns: Vec<AssignmentColumn>, scale: GradeScale) -> Self {
        Self {
            columns,
            cells: HashMap::new(),
            scale,
        }
    }

    pub fn columns(&self) -> &[AssignmentColumn] {
        &self.columns
    }

    /// Record a raw score, recomputing the derived percentage and letter.
    /// An unknown column id is dropped with a warning rather than erroring;
    /// the surrounding UI only offers known columns.
    pub fn enter_score(&mut self, student_id: &str, column_id: &str, raw_score: f64) {
        let Some(column) = self.columns.iter().find(|c| c.id == column_id) else {
            tracing::warn!(column = column_id, "score entered for unknown column, ignoring");
            return;
        };
        let percentage = if column.max_points > 0.0 {
            (raw_score / column.max_points * 100.0).round()
        } else {
            0.0
        };
        let cell = GradeCell {
            raw_score,
            percentage,
            letter_grade: self.scale.letter_for(percentage).to_string(),
        };
        self.cells
            .insert((student_id.to_string(), column_id.to_string()), cell);
    }

    /// The cell for one student in one column, if graded.
    pub fn cell(&self, student_id: &str, column_id: &str) -> Option<&GradeCell> {
        self.cells
            .get(&(student_id.to_string(), column_id.to_string()))
    }

    /// Combine a student's graded columns into one weighted course grade.
    ///
    /// Columns with no cell for the student are excluded from the
    /// denominator, not scored as zero: a student graded on one of four
    /// equally weighted columns gets that column's percentage, not a
    /// quarter of it. With no graded columns at all the `N/A` sentinel is
    /// returned instead of an error.
    pub fn finalize_student(&self, student_id: &str) -> CourseGrade {
        let mut weighted_sum = 0.0;
        let mut total_weight = 0.0;
        for column in &self.columns {
            if let Some(cell) = self.cell(student_id, &column.id) {
                weighted_sum += cell.percentage * column.weight;
                total_weight += column.weight;
            }
        }
        if total_weight == 0.0 {
            return CourseGrade {
                percentage: 0.0,
                letter_grade: UNGRADED.to_string(),
            };
        }
        let percentage = weighted_sum / total_weight;
        CourseGrade {
            percentage,
            letter_grade: self.scale.letter_for(percentage).to_string(),
        }
    }

    /// Class-level statistics over the students' final course percentages.
    ///
    /// Ungraded students (the `N/A` sentinel) never count. Whether an
    /// earned 0% counts is governed by
    /// [`StatisticsConfig::include_zero_percentages`].
    pub fn class_statistics(
        &self,
        roster: &[Student],
        passing_threshold_percent: f64,
        config: StatisticsConfig,
    ) -> ClassStatistics {
        let mut included: Vec<f64> = Vec::new();
        for student in roster {
            let grade = self.finalize_student(&student.student_id);
            if grade.letter_grade == UNGRADED {
                continue;
            }
            if grade.percentage > 0.0 || config.include_zero_percentages {
                included.push(grade.percentage);
            }
        }

        let mut per_column_average = HashMap::new();
        for column in &self.columns {
            let percentages: Vec<f64> = roster
                .iter()
                .filter_map(|s| self.cell(&s.student_id, &column.id))
                .map(|cell| cell.percentage)
                .collect();
            if !percentages.is_empty() {
                per_column_average.insert(
                    column.id.clone(),
                    percentages.iter().sum::<f64>() / percentages.len() as f64,
                );
            }
        }

        if included.is_empty() {
            return ClassStatistics {
                per_column_average,
                ..ClassStatistics::default()
            };
        }

        let count = included.len() as f64;
        let average = included.iter().sum::<f64>() / count;
        let max = included.iter().cloned().fold(f64::MIN, f64::max);
        let min = included.iter().cloned().fold(f64::MAX, f64::min);
        let passing = included
            .iter()
            .filter(|p| **p >= passing_threshold_percent)
            .count() as f64;

        ClassStatistics {
            average,
            max,
            min,
            passing_rate_percent: passing / count * 100.0,
            per_column_average,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn columns(n: usize) -> Vec<AssignmentColumn> {
        (1..=n)
            .map(|i| AssignmentColumn {
                id: format!("a{i}"),
                name: format!("Assignment {i}"),
                max_points: 100.0,
                weight: 1.0,
            })
            .collect()
    }

    fn student(id: &str) -> Student {
        Student {
            student_id: id.into(),
            name: id.to_uppercase(),
            email: String::new(),
        }
    }

    #[test]
    fn enter_score_derives_percentage_and_letter() {
        let mut book = GradeBook::new(columns(1), GradeScale::Standard);
        book.enter_score("s1", "a1", 87.0);
        let cell = book.cell("s1", "a1").unwrap();
        assert_eq!(cell.percentage, 87.0);
        assert_eq!(cell.letter_grade, "B+");
    }

    #[test]
    fn enter_score_guards_zero_max_points() {
        let mut book = GradeBook::new(
            vec![AssignmentColumn {
                id: "a1".into(),
                name: "Broken".into(),
                max_points: 0.0,
                weight: 1.0,
            }],
            GradeScale::Standard,
        );
        book.enter_score("s1", "a1", 50.0);
        assert_eq!(book.cell("s1", "a1").unwrap().percentage, 0.0);
    }

    #[test]
    fn enter_score_ignores_unknown_column() {
        let mut book = GradeBook::new(columns(1), GradeScale::Standard);
        book.enter_score("s1", "missing", 90.0);
        assert!(book.cell("s1", "missing").is_none());
    }

    #[test]
    fn ungraded_student_gets_sentinel_not_error() {
        let book = GradeBook::new(columns(4), GradeScale::Standard);
        let grade = book.finalize_student("s1");
        assert_eq!(grade.percentage, 0.0);
        assert_eq!(grade.letter_grade, UNGRADED);
    }

    #[test]
    fn missing_columns_excluded_from_denominator() {
        // Graded on 2 of 4 equally weighted columns: the course grade is
        // the simple average of those 2, not the sum divided by 4.
        let mut book = GradeBook::new(columns(4), GradeScale::Standard);
        book.enter_score("s1", "a1", 80.0);
        book.enter_score("s1", "a2", 90.0);
        let grade = book.finalize_student("s1");
        assert_eq!(grade.percentage, 85.0);
        assert_eq!(grade.letter_grade, "B");
    }

    #[test]
    fn weights_shift_the_average() {
        let mut cols = columns(2);
        cols[0].weight = 3.0;
        let mut book = GradeBook::new(cols, GradeScale::Standard);
        book.enter_score("s1", "a1", 100.0);
        book.enter_score("s1", "a2", 60.0);
        // (100*3 + 60*1) / 4 = 90
        assert_eq!(book.finalize_student("s1").percentage, 90.0);
    }

    #[test]
    fn single_graded_column_is_the_whole_grade() {
        let mut book = GradeBook::new(columns(4), GradeScale::Standard);
        book.enter_score("s1", "a3", 72.0);
        assert_eq!(book.finalize_student("s1").percentage, 72.0);
    }

    #[test]
    fn class_statistics_over_graded_students() {
        let mut book = GradeBook::new(columns(1), GradeScale::Standard);
        book.enter_score("s1", "a1", 90.0);
        book.enter_score("s2", "a1", 70.0);
        // s3 is ungraded.
        let roster = vec![student("s1"), student("s2"), student("s3")];

        let stats = book.class_statistics(&roster, 65.0, StatisticsConfig::default());
        assert_eq!(stats.average, 80.0);
        assert_eq!(stats.max, 90.0);
        assert_eq!(stats.min, 70.0);
        assert_eq!(stats.passing_rate_percent, 100.0);
        assert_eq!(stats.per_column_average["a1"], 80.0);
    }

    #[test]
    fn zero_percent_excluded_by_default_included_when_configured() {
        let mut book = GradeBook::new(columns(1), GradeScale::Standard);
        book.enter_score("s1", "a1", 100.0);
        book.enter_score("s2", "a1", 0.0); // earned zero
        let roster = vec![student("s1"), student("s2")];

        let default_stats = book.class_statistics(&roster, 65.0, StatisticsConfig::default());
        assert_eq!(default_stats.average, 100.0);

        let inclusive = book.class_statistics(
            &roster,
            65.0,
            StatisticsConfig {
                include_zero_percentages: true,
            },
        );
        assert_eq!(inclusive.average, 50.0);
        assert_eq!(inclusive.min, 0.0);
        assert_eq!(inclusive.passing_rate_percent, 50.0);
    }

    #[test]
    fn empty_class_yields_zeroed_statistics() {
        let book = GradeBook::new(columns(2), GradeScale::Standard);
        let stats = book.class_statistics(&[student("s1")], 65.0, StatisticsConfig::default());
        assert_eq!(stats, ClassStatistics::default());
    }
}
