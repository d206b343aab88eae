//! Core data model: rubrics, late policies, rosters, and selections.
//!
//! A [`Rubric`] and a [`LatePolicy`] are validated once at construction and
//! treated as immutable for the rest of the grading session. The scoring
//! functions consume them without re-checking invariants, so the only way
//! to obtain one is through the checked constructors here (or the JSON
//! load boundary in [`crate::parser`]).

use std::collections::HashMap;

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

/// Level key that always means "no late penalty".
pub const NONE_LEVEL: &str = "none";

/// A single performance level in a rubric (e.g. "accomplished").
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RubricLevel {
    /// Stable key referenced by criterion selections.
    pub key: String,
    /// Human-readable name.
    pub name: String,
    /// Fraction of a criterion's max points awarded at this level.
    pub multiplier: f64,
    /// Display color used by the UI layer.
    #[serde(default)]
    pub color: String,
    /// Description shown to the grader.
    #[serde(default)]
    pub description: String,
}

/// A single assessed criterion (e.g. "Code quality", 40 pts).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Criterion {
    /// Unique identifier within the rubric.
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Points awarded at full credit. Always positive.
    pub max_points: f64,
    /// Relative weight shown to students (informational; points carry the
    /// actual weighting).
    #[serde(default)]
    pub weight: f64,
    /// Per-level descriptive text, keyed by level key.
    #[serde(default)]
    pub level_descriptions: HashMap<String, String>,
    /// Reusable feedback snippets for this criterion.
    #[serde(default)]
    pub feedback_library: Vec<String>,
}

/// Assignment-level context attached to a rubric.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssignmentInfo {
    /// Assignment title.
    pub title: String,
    /// Total points the assignment is out of. Soft invariant: equals the
    /// sum of criterion `max_points` (see `parser::validate_rubric`).
    pub total_points: f64,
    /// Minimum percentage considered passing.
    pub passing_threshold_percent: f64,
    /// Weight of this assignment within the course.
    #[serde(default)]
    pub weight: f64,
}

/// A validated rubric: ordered levels plus ordered criteria.
///
/// Invariant (enforced by [`Rubric::new`]): every level multiplier lies in
/// `[0, 1]` and exactly one level carries multiplier `1.0` — the full-credit
/// level.
#[derive(Debug, Clone, Serialize)]
pub struct Rubric {
    assignment: AssignmentInfo,
    levels: Vec<RubricLevel>,
    criteria: Vec<Criterion>,
}

impl Rubric {
    /// Build a rubric, validating the authoring-time invariants.
    pub fn new(
        assignment: AssignmentInfo,
        levels: Vec<RubricLevel>,
        criteria: Vec<Criterion>,
    ) -> Result<Self> {
        if levels.is_empty() {
            bail!("rubric must define at least one performance level");
        }
        if criteria.is_empty() {
            bail!("rubric must define at least one criterion");
        }
        if !(assignment.total_points > 0.0) {
            bail!(
                "assignment total points must be positive, got {}",
                assignment.total_points
            );
        }
        for level in &levels {
            if !(0.0..=1.0).contains(&level.multiplier) {
                bail!(
                    "level '{}' multiplier {} is outside [0, 1]",
                    level.key,
                    level.multiplier
                );
            }
        }
        let full_credit = levels.iter().filter(|l| l.multiplier == 1.0).count();
        if full_credit != 1 {
            bail!(
                "rubric must have exactly one full-credit level (multiplier 1.0), found {full_credit}"
            );
        }
        let mut seen = std::collections::HashSet::new();
        for criterion in &criteria {
            if !seen.insert(criterion.id.as_str()) {
                bail!("duplicate criterion id: {}", criterion.id);
            }
            if !(criterion.max_points > 0.0) {
                bail!(
                    "criterion '{}' max points must be positive, got {}",
                    criterion.id,
                    criterion.max_points
                );
            }
        }
        Ok(Self {
            assignment,
            levels,
            criteria,
        })
    }

    /// Assignment-level context.
    pub fn assignment(&self) -> &AssignmentInfo {
        &self.assignment
    }

    /// Ordered performance levels.
    pub fn levels(&self) -> &[RubricLevel] {
        &self.levels
    }

    /// Ordered criteria.
    pub fn criteria(&self) -> &[Criterion] {
        &self.criteria
    }

    /// Look up a level by key.
    pub fn level_for(&self, key: &str) -> Option<&RubricLevel> {
        self.levels.iter().find(|l| l.key == key)
    }

    /// The unique level with multiplier 1.0.
    pub fn full_credit_level(&self) -> &RubricLevel {
        // Guaranteed by construction; the fallback keeps this panic-free.
        self.levels
            .iter()
            .find(|l| l.multiplier == 1.0)
            .unwrap_or(&self.levels[0])
    }
}

/// One tier of a late policy (penalty multiplier plus description).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolicyLevel {
    /// Fraction of the raw score retained at this lateness tier.
    pub multiplier: f64,
    /// Human-readable description (e.g. "Up to 24 hours late").
    #[serde(default)]
    pub description: String,
}

/// A named, validated late-submission penalty schedule.
///
/// Invariant (enforced by [`LatePolicy::new`]): a `"none"` tier with
/// multiplier 1.0 exists. Lookups for unknown keys fall back to it, so a
/// policy lookup never fails.
#[derive(Debug, Clone, Serialize)]
pub struct LatePolicy {
    name: String,
    none: PolicyLevel,
    levels: HashMap<String, PolicyLevel>,
}

impl LatePolicy {
    /// Build a policy, validating the `"none"` identity tier and the
    /// multiplier ranges.
    pub fn new(name: impl Into<String>, levels: HashMap<String, PolicyLevel>) -> Result<Self> {
        let mut levels = levels;
        let Some(none) = levels.remove(NONE_LEVEL) else {
            bail!("late policy must contain a '{NONE_LEVEL}' tier");
        };
        if none.multiplier != 1.0 {
            bail!(
                "'{NONE_LEVEL}' tier must have multiplier 1.0, got {}",
                none.multiplier
            );
        }
        for (key, level) in &levels {
            if !(0.0..=1.0).contains(&level.multiplier) {
                bail!(
                    "late policy tier '{key}' multiplier {} is outside [0, 1]",
                    level.multiplier
                );
            }
        }
        Ok(Self {
            name: name.into(),
            none,
            levels,
        })
    }

    /// The institutional default schedule: 20% off within 24 hours, 40% off
    /// within 48, nothing awarded beyond that.
    pub fn standard() -> Self {
        let tier = |multiplier: f64, description: &str| PolicyLevel {
            multiplier,
            description: description.to_string(),
        };
        let mut levels = HashMap::new();
        levels.insert("within24".to_string(), tier(0.8, "Up to 24 hours late"));
        levels.insert("within48".to_string(), tier(0.6, "Up to 48 hours late"));
        levels.insert("beyond48".to_string(), tier(0.0, "More than 48 hours late"));
        Self {
            name: "standard".to_string(),
            none: tier(1.0, "On time"),
            levels,
        }
    }

    /// Policy name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Look up a tier by key, falling back to the `"none"` identity tier
    /// for absent or unknown keys. Unknown keys degrade to no penalty.
    pub fn level_for(&self, key: &str) -> &PolicyLevel {
        if key == NONE_LEVEL {
            return &self.none;
        }
        match self.levels.get(key) {
            Some(level) => level,
            None => {
                tracing::warn!(key, "unknown late policy tier, applying no penalty");
                &self.none
            }
        }
    }

    /// Keys of the non-identity tiers, for UI enumeration.
    pub fn tier_keys(&self) -> impl Iterator<Item = &str> {
        self.levels.keys().map(String::as_str)
    }
}

/// The grader's judgment for one criterion of one student's submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CriterionSelection {
    /// Which criterion this selection is for.
    pub criterion_id: String,
    /// Key of the chosen performance level.
    pub selected_level_key: String,
    /// Free-form comments for this criterion.
    #[serde(default)]
    pub custom_comments: String,
}

/// A roster entry. Identity fields are foreign, read-only references owned
/// by the import layer; the engine only keys on `student_id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Student {
    /// Stable identifier used as the grade record key.
    pub student_id: String,
    /// Display name.
    pub name: String,
    /// Contact email.
    #[serde(default)]
    pub email: String,
}

/// A commonly used six-level performance scale, handy as a starting point
/// for rubric authoring and for tests.
pub fn standard_levels() -> Vec<RubricLevel> {
    let level = |key: &str, name: &str, multiplier: f64, color: &str| RubricLevel {
        key: key.to_string(),
        name: name.to_string(),
        multiplier,
        color: color.to_string(),
        description: String::new(),
    };
    vec![
        level("exemplary", "Exemplary", 1.0, "#2e7d32"),
        level("accomplished", "Accomplished", 0.95, "#558b2f"),
        level("proficient", "Proficient", 0.85, "#9e9d24"),
        level("developing", "Developing", 0.70, "#ef6c00"),
        level("beginning", "Beginning", 0.50, "#d84315"),
        level("missing", "Missing", 0.0, "#b71c1c"),
    ]
}
