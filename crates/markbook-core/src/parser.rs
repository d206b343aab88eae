//! JSON load boundary for rubric and late-policy documents.
//!
//! Rubric and policy documents arrive as JSON from the authoring/import
//! layer. They are parsed into intermediate raw structs and then pushed
//! through the checked model constructors, so a malformed document fails
//! fast with a descriptive error here instead of propagating a bad shape
//! into the engine. Soft invariants surface as warnings, not failures.

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::model::{
    AssignmentInfo, Criterion, LatePolicy, PolicyLevel, Rubric, RubricLevel,
};

/// Intermediate JSON structure for rubric documents.
#[derive(Debug, Deserialize)]
struct JsonRubricFile {
    assignment: JsonAssignment,
    levels: Vec<JsonLevel>,
    criteria: Vec<JsonCriterion>,
}

#[derive(Debug, Deserialize)]
struct JsonAssignment {
    title: String,
    total_points: f64,
    #[serde(default = "default_passing_threshold")]
    passing_threshold_percent: f64,
    #[serde(default)]
    weight: f64,
}

fn default_passing_threshold() -> f64 {
    65.0
}

#[derive(Debug, Deserialize)]
struct JsonLevel {
    key: String,
    name: String,
    multiplier: f64,
    #[serde(default)]
    color: String,
    #[serde(default)]
    description: String,
}

#[derive(Debug, Deserialize)]
struct JsonCriterion {
    id: String,
    name: String,
    max_points: f64,
    #[serde(default)]
    weight: f64,
    #[serde(default)]
    level_descriptions: HashMap<String, String>,
    #[serde(default)]
    feedback_library: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct JsonPolicyFile {
    name: String,
    levels: HashMap<String, JsonPolicyLevel>,
}

#[derive(Debug, Deserialize)]
struct JsonPolicyLevel {
    multiplier: f64,
    #[serde(default)]
    description: String,
}

/// Parse a rubric JSON document from a file.
pub fn parse_rubric(path: &Path) -> Result<Rubric> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read rubric file: {}", path.display()))?;
    parse_rubric_str(&content)
        .with_context(|| format!("invalid rubric document: {}", path.display()))
}

/// Parse a rubric JSON string into a validated [`Rubric`].
pub fn parse_rubric_str(content: &str) -> Result<Rubric> {
    let parsed: JsonRubricFile =
        serde_json::from_str(content).context("failed to parse rubric JSON")?;

    let assignment = AssignmentInfo {
        title: parsed.assignment.title,
        total_points: parsed.assignment.total_points,
        passing_threshold_percent: parsed.assignment.passing_threshold_percent,
        weight: parsed.assignment.weight,
    };
    let levels = parsed
        .levels
        .into_iter()
        .map(|l| RubricLevel {
            key: l.key,
            name: l.name,
            multiplier: l.multiplier,
            color: l.color,
            description: l.description,
        })
        .collect();
    let criteria = parsed
        .criteria
        .into_iter()
        .map(|c| Criterion {
            id: c.id,
            name: c.name,
            max_points: c.max_points,
            weight: c.weight,
            level_descriptions: c.level_descriptions,
            feedback_library: c.feedback_library,
        })
        .collect();

    Rubric::new(assignment, levels, criteria)
}

/// Parse a late-policy JSON document from a file.
pub fn parse_policy(path: &Path) -> Result<LatePolicy> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read late policy file: {}", path.display()))?;
    parse_policy_str(&content)
        .with_context(|| format!("invalid late policy document: {}", path.display()))
}

/// Parse a late-policy JSON string into a validated [`LatePolicy`].
pub fn parse_policy_str(content: &str) -> Result<LatePolicy> {
    let parsed: JsonPolicyFile =
        serde_json::from_str(content).context("failed to parse late policy JSON")?;
    let levels = parsed
        .levels
        .into_iter()
        .map(|(key, l)| {
            (
                key,
                PolicyLevel {
                    multiplier: l.multiplier,
                    description: l.description,
                },
            )
        })
        .collect();
    LatePolicy::new(parsed.name, levels)
}

/// A soft-invariant warning from rubric validation.
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    /// The criterion involved, if any.
    pub criterion_id: Option<String>,
    /// Warning message.
    pub message: String,
}

/// Check the soft invariants a rubric author probably intended.
///
/// These do not block loading: score percentages merely assume criterion
/// points sum to the assignment total.
pub fn validate_rubric(rubric: &Rubric) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    let points_sum: f64 = rubric.criteria().iter().map(|c| c.max_points).sum();
    if (points_sum - rubric.assignment().total_points).abs() > 1e-9 {
        warnings.push(ValidationWarning {
            criterion_id: None,
            message: format!(
                "criterion points sum to {points_sum} but the assignment is out of {}",
                rubric.assignment().total_points
            ),
        });
    }

    let weight_sum: f64 = rubric.criteria().iter().map(|c| c.weight).sum();
    if weight_sum != 0.0 && (weight_sum - 100.0).abs() > 1e-9 {
        warnings.push(ValidationWarning {
            criterion_id: None,
            message: format!("criterion weights sum to {weight_sum}, expected 100"),
        });
    }

    for criterion in rubric.criteria() {
        for key in criterion.level_descriptions.keys() {
            if rubric.level_for(key).is_none() {
                warnings.push(ValidationWarning {
                    criterion_id: Some(criterion.id.clone()),
                    message: format!("level description references unknown level: {key}"),
                });
            }
        }
    }

    warnings
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID_RUBRIC: &str = r#"{
        "assignment": {
            "title": "Essay 1",
            "total_points": 100,
            "passing_threshold_percent": 65
        },
        "levels": [
            { "key": "exemplary", "name": "Exemplary", "multiplier": 1.0 },
            { "key": "accomplished", "name": "Accomplished", "multiplier": 0.95 },
            { "key": "missing", "name": "Missing", "multiplier": 0.0 }
        ],
        "criteria": [
            { "id": "structure", "name": "Structure", "max_points": 60, "weight": 60 },
            { "id": "style", "name": "Style", "max_points": 40, "weight": 40 }
        ]
    }"#;

    const VALID_POLICY: &str = r#"{
        "name": "department",
        "levels": {
            "none": { "multiplier": 1.0, "description": "On time" },
            "within24": { "multiplier": 0.8, "description": "Up to 24 hours late" }
        }
    }"#;

    #[test]
    fn parse_valid_rubric() {
        let rubric = parse_rubric_str(VALID_RUBRIC).unwrap();
        assert_eq!(rubric.assignment().title, "Essay 1");
        assert_eq!(rubric.criteria().len(), 2);
        assert_eq!(rubric.full_credit_level().key, "exemplary");
        assert!(validate_rubric(&rubric).is_empty());
    }

    #[test]
    fn parse_rubric_defaults_optional_fields() {
        let minimal = r#"{
            "assignment": { "title": "Quiz", "total_points": 10 },
            "levels": [
                { "key": "full", "name": "Full", "multiplier": 1.0 },
                { "key": "zero", "name": "Zero", "multiplier": 0.0 }
            ],
            "criteria": [ { "id": "q1", "name": "Q1", "max_points": 10 } ]
        }"#;
        let rubric = parse_rubric_str(minimal).unwrap();
        assert_eq!(rubric.assignment().passing_threshold_percent, 65.0);
        assert!(rubric.criteria()[0].feedback_library.is_empty());
    }

    #[test]
    fn parse_rejects_malformed_json() {
        assert!(parse_rubric_str("{ not json").is_err());
        assert!(parse_policy_str("[]").is_err());
    }

    #[test]
    fn parse_rejects_invariant_violations() {
        let two_full = VALID_RUBRIC.replace("0.95", "1.0");
        let err = parse_rubric_str(&two_full).unwrap_err();
        assert!(err.to_string().contains("full-credit"));
    }

    #[test]
    fn parse_valid_policy() {
        let policy = parse_policy_str(VALID_POLICY).unwrap();
        assert_eq!(policy.name(), "department");
        assert_eq!(policy.level_for("within24").multiplier, 0.8);
    }

    #[test]
    fn parse_policy_requires_none_tier() {
        let missing_none = r#"{
            "name": "strict",
            "levels": { "within24": { "multiplier": 0.5 } }
        }"#;
        let err = parse_policy_str(missing_none).unwrap_err();
        assert!(err.to_string().contains("'none' tier"));
    }

    #[test]
    fn validate_flags_points_mismatch() {
        let off_by_ten = VALID_RUBRIC.replace("\"total_points\": 100", "\"total_points\": 110");
        let rubric = parse_rubric_str(&off_by_ten).unwrap();
        let warnings = validate_rubric(&rubric);
        assert!(warnings.iter().any(|w| w.message.contains("sum to 100")));
    }

    #[test]
    fn validate_flags_weight_mismatch() {
        let lopsided = VALID_RUBRIC.replace("\"weight\": 40", "\"weight\": 30");
        let rubric = parse_rubric_str(&lopsided).unwrap();
        let warnings = validate_rubric(&rubric);
        assert!(warnings.iter().any(|w| w.message.contains("weights sum to 90")));
    }

    #[test]
    fn validate_flags_unknown_level_description() {
        let rubric = parse_rubric_str(
            r#"{
            "assignment": { "title": "Quiz", "total_points": 10 },
            "levels": [
                { "key": "full", "name": "Full", "multiplier": 1.0 },
                { "key": "zero", "name": "Zero", "multiplier": 0.0 }
            ],
            "criteria": [ {
                "id": "q1", "name": "Q1", "max_points": 10,
                "level_descriptions": { "heroic": "over the top" }
            } ]
        }"#,
        )
        .unwrap();
        let warnings = validate_rubric(&rubric);
        assert!(warnings.iter().any(|w| {
            w.criterion_id.as_deref() == Some("q1") && w.message.contains("heroic")
        }));
    }

    #[test]
    fn load_from_files() {
        let dir = tempfile::tempdir().unwrap();
        let rubric_path = dir.path().join("rubric.json");
        let policy_path = dir.path().join("policy.json");
        std::fs::write(&rubric_path, VALID_RUBRIC).unwrap();
        std::fs::write(&policy_path, VALID_POLICY).unwrap();

        assert!(parse_rubric(&rubric_path).is_ok());
        assert!(parse_policy(&policy_path).is_ok());
        assert!(parse_rubric(&dir.path().join("absent.json")).is_err());
    }
}
