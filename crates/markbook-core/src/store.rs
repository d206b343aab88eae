//! In-memory grade record storage with the draft/final lifecycle.
//!
//! A student has at most one active record at a time, tagged either draft
//! or final. Finalizing a record removes any draft for that student in the
//! same operation, so the two maps never both hold an entry for one id
//! under normal operation. Records only die on an explicit [`GradeRecordStore::reset`].

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::model::{CriterionSelection, NONE_LEVEL};

/// Lifecycle tag carried on a grade record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GradeStatus {
    Draft,
    Final,
}

/// Answer to a status query, including the not-yet-started case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordStatus {
    Final,
    Draft,
    NotStarted,
}

/// One student's grading state for one assignment.
#[derive(Debug, Clone, Serialize)]
pub struct GradeRecord {
    /// Roster key this record belongs to.
    pub student_id: String,
    /// Selections keyed by criterion id; absent means not yet assessed.
    pub selections: HashMap<String, CriterionSelection>,
    /// Late policy tier key selected for this submission.
    pub late_policy_level: String,
    /// Score before the late penalty.
    pub raw_score: f64,
    /// Score after the late penalty.
    pub final_score: f64,
    /// Draft or final; stamped by the store on save.
    pub status: GradeStatus,
    /// Stamped by the store on save.
    pub last_modified: DateTime<Utc>,
}

impl GradeRecord {
    /// A fresh, unassessed record for a student.
    pub fn empty(student_id: impl Into<String>) -> Self {
        Self {
            student_id: student_id.into(),
            selections: HashMap::new(),
            late_policy_level: NONE_LEVEL.to_string(),
            raw_score: 0.0,
            final_score: 0.0,
            status: GradeStatus::Draft,
            last_modified: Utc::now(),
        }
    }
}

/// Keyed storage of per-student grade records.
///
/// Synchronous and in-memory; the process model assumes a single grader.
/// A multi-user adaptation would need per-student write locks to keep the
/// draft/final mutual exclusion intact.
#[derive(Debug, Default)]
pub struct GradeRecordStore {
    drafts: HashMap<String, GradeRecord>,
    finals: HashMap<String, GradeRecord>,
}

impl GradeRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Upsert a draft. Leaves any final record for the student untouched.
    pub fn save_draft(&mut self, mut record: GradeRecord) {
        record.status = GradeStatus::Draft;
        record.last_modified = Utc::now();
        tracing::debug!(student = %record.student_id, "saving draft record");
        self.drafts.insert(record.student_id.clone(), record);
    }

    /// Upsert a final record and remove any draft for the same student in
    /// the same operation.
    pub fn save_final(&mut self, mut record: GradeRecord) {
        record.status = GradeStatus::Final;
        record.last_modified = Utc::now();
        tracing::debug!(student = %record.student_id, "finalizing record");
        self.drafts.remove(&record.student_id);
        self.finals.insert(record.student_id.clone(), record);
    }

    /// Grading status for a student. Final wins over draft should both ever
    /// exist (the save path prevents it, but the priority is fixed here).
    pub fn status(&self, student_id: &str) -> RecordStatus {
        if self.finals.contains_key(student_id) {
            RecordStatus::Final
        } else if self.drafts.contains_key(student_id) {
            RecordStatus::Draft
        } else {
            RecordStatus::NotStarted
        }
    }

    /// The student's active record, preferring final over draft.
    pub fn load(&self, student_id: &str) -> Option<&GradeRecord> {
        self.finals
            .get(student_id)
            .or_else(|| self.drafts.get(student_id))
    }

    /// Number of finalized records.
    pub fn finalized_count(&self) -> usize {
        self.finals.len()
    }

    /// Number of in-progress drafts.
    pub fn draft_count(&self) -> usize {
        self.drafts.len()
    }

    /// Iterate over all finalized records.
    pub fn finals(&self) -> impl Iterator<Item = &GradeRecord> {
        self.finals.values()
    }

    /// Destroy every record. The only way records expire.
    pub fn reset(&mut self) {
        tracing::debug!(
            drafts = self.drafts.len(),
            finals = self.finals.len(),
            "resetting grade record store"
        );
        self.drafts.clear();
        self.finals.clear();
    }
}
