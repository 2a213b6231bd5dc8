/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Failure types for timetable generation.
//!
//! Two types model the two failure layers:
//!
//! * [`RejectReason`] — why one candidate slot was refused for one lesson
//!   occurrence (low-level, carries exact load values).
//! * [`ReferenceError`] — a lesson whose course, faculty or class id does not
//!   resolve against the snapshot.
//!
//! Neither is ever returned from
//! [`TimetableGenerator::generate()`](super::TimetableGenerator::generate):
//! rejected slots only feed logging, and unresolvable lessons are skipped.
//! [`check_references`](super::check_references) exposes the latter up front.

use thiserror::Error;

use crate::model::EntityId;

// ── Slot rejection ────────────────────────────────────────────────────────────

/// Why a candidate slot failed validation.  Variants are listed in the order
/// the checks run; the first failing check wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// The class already has a placement in this slot.
    ClassSlotOccupied,

    /// The faculty member is teaching another class in this slot.
    FacultyBusy,

    /// The slot is listed in the faculty member's `time_off`.
    FacultyTimeOff,

    /// The faculty member already teaches `load` periods this day and the
    /// daily cap is `limit`.
    DailyLimitReached { load: usize, limit: usize },

    /// A single-period lesson already has an occurrence on this day.
    LessonAlreadyToday,
}

impl RejectReason {
    /// Stable short name, used as a key when tallying rejections.
    pub fn kind(&self) -> &'static str {
        match self {
            RejectReason::ClassSlotOccupied => "class_slot_occupied",
            RejectReason::FacultyBusy => "faculty_busy",
            RejectReason::FacultyTimeOff => "faculty_time_off",
            RejectReason::DailyLimitReached { .. } => "daily_limit_reached",
            RejectReason::LessonAlreadyToday => "lesson_already_today",
        }
    }
}

impl std::fmt::Display for RejectReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RejectReason::ClassSlotOccupied => write!(f, "class already has a lesson in this slot"),
            RejectReason::FacultyBusy => {
                write!(f, "faculty is teaching another class in this slot")
            }
            RejectReason::FacultyTimeOff => write!(f, "slot is in the faculty's time off"),
            RejectReason::DailyLimitReached { load, limit } => write!(
                f,
                "faculty already teaches {} of at most {} periods this day",
                load, limit
            ),
            RejectReason::LessonAlreadyToday => {
                write!(f, "lesson already has a single-period occurrence this day")
            }
        }
    }
}

// ── Dangling references ───────────────────────────────────────────────────────

/// A lesson that points at an entity missing from the snapshot.
///
/// Lessons reported here are skipped by generation: none of their
/// occurrences is placed and none is recorded as pending.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReferenceError {
    #[error("lesson {lesson} references unknown course {course}")]
    MissingCourse { lesson: EntityId, course: EntityId },

    #[error("lesson {lesson} references unknown faculty {faculty}")]
    MissingFaculty { lesson: EntityId, faculty: EntityId },

    #[error("lesson {lesson} references unknown class {class}")]
    MissingClass { lesson: EntityId, class: EntityId },
}

impl ReferenceError {
    pub fn lesson_id(&self) -> EntityId {
        match self {
            ReferenceError::MissingCourse { lesson, .. }
            | ReferenceError::MissingFaculty { lesson, .. }
            | ReferenceError::MissingClass { lesson, .. } => *lesson,
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn daily_limit_message_carries_values() {
        let reason = RejectReason::DailyLimitReached { load: 6, limit: 6 };
        assert_eq!(
            reason.to_string(),
            "faculty already teaches 6 of at most 6 periods this day"
        );
        assert_eq!(reason.kind(), "daily_limit_reached");
    }

    #[test]
    fn reference_error_names_lesson_and_target() {
        let err = ReferenceError::MissingFaculty {
            lesson: 3,
            faculty: 42,
        };
        assert_eq!(err.to_string(), "lesson 3 references unknown faculty 42");
        assert_eq!(err.lesson_id(), 3);
    }
}
