//! Roster-ordered grading session state machine.
//!
//! The controller walks an ordered roster, persisting the current student's
//! record through [`GradeRecordStore`] on every [`advance`] and
//! re-presenting the stored record (final over draft over fresh) on every
//! index change. It holds no ambient globals: the store is injected per
//! call, and assignment-level context lives with the caller, untouched by
//! navigation.
//!
//! [`advance`]: GradingSessionController::advance

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::GradingError;
use crate::model::Student;
use crate::store::{GradeRecord, GradeRecordStore};

/// Where the session is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// A student is being graded.
    Active,
    /// The grader advanced past the last student.
    Completed,
}

/// Ordered iteration over a student roster during one grading sitting.
///
/// Transient by design: the session exists only while actively grading and
/// is never persisted.
#[derive(Debug)]
pub struct GradingSessionController {
    id: Uuid,
    roster: Vec<Student>,
    current_index: usize,
    state: SessionState,
    started_at: DateTime<Utc>,
}

impl GradingSessionController {
    /// Start a session over a roster, positioned at the first student.
    pub fn start(roster: Vec<Student>) -> Result<Self, GradingError> {
        if roster.is_empty() {
            return Err(GradingError::EmptyRoster);
        }
        let session = Self {
            id: Uuid::new_v4(),
            roster,
            current_index: 0,
            state: SessionState::Active,
            started_at: Utc::now(),
        };
        tracing::debug!(session = %session.id, students = session.roster.len(), "session started");
        Ok(session)
    }

    /// Session identifier, for correlating log lines and exports.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// When the session was started.
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    /// The roster being graded, in order.
    pub fn roster(&self) -> &[Student] {
        &self.roster
    }

    /// The student at the current index.
    pub fn current_student(&self) -> &Student {
        &self.roster[self.current_index]
    }

    /// Persist the current student's record and move to the next student.
    ///
    /// `finalize` selects [`GradeRecordStore::save_final`] over
    /// [`GradeRecordStore::save_draft`]. Advancing from the last index
    /// transitions to [`SessionState::Completed`] and leaves the index in
    /// place — there is no wraparound or auto-restart.
    pub fn advance(&mut self, store: &mut GradeRecordStore, record: GradeRecord, finalize: bool) {
        if finalize {
            store.save_final(record);
        } else {
            store.save_draft(record);
        }

        if self.current_index < self.roster.len() - 1 {
            self.current_index += 1;
            tracing::debug!(session = %self.id, index = self.current_index, "advanced");
        } else {
            self.state = SessionState::Completed;
            tracing::debug!(session = %self.id, "session completed");
        }
    }

    /// Step back one student, floor zero.
    ///
    /// Deliberately does NOT persist the record being left — only `advance`
    /// writes to the store. Stepping back out of the completed state
    /// re-activates the session at the last student without moving the
    /// index (it never moved past the end).
    pub fn retreat(&mut self) {
        if self.state == SessionState::Completed {
            self.state = SessionState::Active;
            return;
        }
        self.current_index = self.current_index.saturating_sub(1);
    }

    /// Jump directly to a roster index.
    ///
    /// Like `retreat`, jumping does not persist the record being left.
    pub fn jump_to(&mut self, index: isize) -> Result<(), GradingError> {
        if index < 0 || index as usize >= self.roster.len() {
            return Err(GradingError::OutOfRange {
                index,
                len: self.roster.len(),
            });
        }
        self.current_index = index as usize;
        self.state = SessionState::Active;
        Ok(())
    }

    /// The record to present for the current student: final if one exists,
    /// else the draft, else a fresh empty record.
    pub fn record_for_current(&self, store: &GradeRecordStore) -> GradeRecord {
        let student_id = &self.current_student().student_id;
        store
            .load(student_id)
            .cloned()
            .unwrap_or_else(|| GradeRecord::empty(student_id.clone()))
    }
}
