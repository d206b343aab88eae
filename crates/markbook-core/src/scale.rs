//! Letter-grade boundary tables.
//!
//! The active table is a configuration input to scoring, not a hardcoded
//! constant. Tables are ordered high-to-low and evaluated top-down: the
//! first boundary the percentage meets or exceeds wins.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Which letter-grade table to evaluate percentages against.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GradeScale {
    /// 12-tier A+ through F scheme.
    #[default]
    Standard,
    /// 4-tier A/B/C/F scheme used by programs that don't report +/- grades.
    Simplified,
}

/// Minimum percentage for each letter, highest first.
const STANDARD_BOUNDARIES: &[(f64, &str)] = &[
    (97.0, "A+"),
    (93.0, "A"),
    (90.0, "A-"),
    (87.0, "B+"),
    (83.0, "B"),
    (80.0, "B-"),
    (77.0, "C+"),
    (73.0, "C"),
    (70.0, "C-"),
    (67.0, "D+"),
    (60.0, "D"),
    (0.0, "F"),
];

const SIMPLIFIED_BOUNDARIES: &[(f64, &str)] = &[(90.0, "A"), (80.0, "B"), (70.0, "C"), (0.0, "F")];

impl GradeScale {
    /// The boundary table for this scale, highest cutoff first.
    pub fn boundaries(&self) -> &'static [(f64, &'static str)] {
        match self {
            GradeScale::Standard => STANDARD_BOUNDARIES,
            GradeScale::Simplified => SIMPLIFIED_BOUNDARIES,
        }
    }

    /// Map a percentage to a letter grade.
    pub fn letter_for(&self, percentage: f64) -> &'static str {
        for (cutoff, letter) in self.boundaries() {
            if percentage >= *cutoff {
                return letter;
            }
        }
        // Only reachable for negative input; score like a zero.
        "F"
    }
}

impl fmt::Display for GradeScale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GradeScale::Standard => write!(f, "standard"),
            GradeScale::Simplified => write!(f, "simplified"),
        }
    }
}

impl FromStr for GradeScale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "standard" => Ok(GradeScale::Standard),
            "simplified" | "simple" => Ok(GradeScale::Simplified),
            other => Err(format!("unknown grade scale: {other}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_table_has_twelve_tiers() {
        assert_eq!(GradeScale::Standard.boundaries().len(), 12);
        assert_eq!(GradeScale::Simplified.boundaries().len(), 4);
    }

    #[test]
    fn standard_letters_at_boundaries() {
        let scale = GradeScale::Standard;
        assert_eq!(scale.letter_for(100.0), "A+");
        assert_eq!(scale.letter_for(97.0), "A+");
        assert_eq!(scale.letter_for(96.9), "A");
        assert_eq!(scale.letter_for(90.0), "A-");
        assert_eq!(scale.letter_for(76.0), "C");
        assert_eq!(scale.letter_for(60.0), "D");
        assert_eq!(scale.letter_for(59.9), "F");
        assert_eq!(scale.letter_for(0.0), "F");
    }

    #[test]
    fn simplified_letters() {
        let scale = GradeScale::Simplified;
        assert_eq!(scale.letter_for(95.0), "A");
        assert_eq!(scale.letter_for(85.0), "B");
        assert_eq!(scale.letter_for(76.0), "C");
        assert_eq!(scale.letter_for(42.0), "F");
    }

    #[test]
    fn negative_percentage_scores_f() {
        assert_eq!(GradeScale::Standard.letter_for(-5.0), "F");
    }

    #[test]
    fn display_and_parse() {
        assert_eq!(GradeScale::Standard.to_string(), "standard");
        assert_eq!(
            "simplified".parse::<GradeScale>().unwrap(),
            GradeScale::Simplified
        );
        assert_eq!("simple".parse::<GradeScale>().unwrap(), GradeScale::Simplified);
        assert!("honors".parse::<GradeScale>().is_err());
    }
}
