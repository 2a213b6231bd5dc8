/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Entity snapshot consumed by the timetable generator.
//!
//! ```text
//! YAML / data layer  ──►  Snapshot  ──(TimetableGenerator)──►  TimetableResult
//!                          ↑ read-only for the whole run
//! ```
//!
//! # Ownership model
//! A [`Snapshot`] is borrowed immutably by the generator; every mutable piece
//! of a run lives in [`GridState`](crate::grid::GridState) instead.
//!
//! # Unused fields
//! Several fields are carried for completeness but are **not** consulted by
//! placement: `ClassGroup::restrictions`, `ClassGroup::available_slots`,
//! `ClassGroup::batch_count`, `Classroom::availability`,
//! `Lesson::shared_faculty_ids`, `Lesson::classroom_type` and `Lesson::group`.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::slot::SlotLabel;

/// Primary key shared by every entity kind.
pub type EntityId = u32;

// ── Course ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Course {
    pub id: EntityId,
    pub title: String,
    pub abbreviation: String,
    /// Display color, e.g. `"#3B82F6"`.
    pub color: String,
}

// ── ClassGroup ────────────────────────────────────────────────────────────────

/// A group of students sharing one weekly timetable.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassGroup {
    pub id: EntityId,
    pub name: String,
    pub division: Option<String>,
    pub batch_count: u32,
    /// Free-form restrictions, stringified.  Not consulted by placement.
    pub restrictions: BTreeMap<String, String>,
    /// Allowed slots.  Not consulted by placement.
    pub available_slots: Vec<SlotLabel>,
}

impl ClassGroup {
    /// Display label used as the timetable key: `"<name> <division>"`, or
    /// just `"<name>"` when the division is absent or empty.
    pub fn label(&self) -> String {
        match self.division.as_deref() {
            Some(division) if !division.is_empty() => format!("{} {}", self.name, division),
            _ => self.name.clone(),
        }
    }
}

// ── Faculty ───────────────────────────────────────────────────────────────────

/// Recognised faculty workload options.
///
/// | Option | Default | Effect |
/// |---|---|---|
/// | `max_periods_per_day` | the grid's `periods_per_day` | a slot is rejected once the faculty already teaches this many periods that day |
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FacultyConstraints {
    pub max_periods_per_day: Option<usize>,
}

impl FacultyConstraints {
    /// Daily cap, falling back to the full day length when unset.
    pub fn max_periods_per_day_or(&self, periods_per_day: usize) -> usize {
        self.max_periods_per_day.unwrap_or(periods_per_day)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Faculty {
    pub id: EntityId,
    pub first_name: String,
    pub last_name: String,
    pub abbreviation: String,
    pub title: String,
    pub email: Option<String>,
    pub color: String,
    pub constraints: FacultyConstraints,
    /// Slots during which this faculty member is never schedulable.
    pub time_off: BTreeSet<SlotLabel>,
}

impl Faculty {
    /// `"<first> <last>"`.
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    pub fn is_off(&self, label: &SlotLabel) -> bool {
        self.time_off.contains(label)
    }
}

// ── Classroom ─────────────────────────────────────────────────────────────────

/// A physical room.  Room allocation is not performed yet; classrooms only get
/// an (unused) occupancy table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Classroom {
    pub id: EntityId,
    pub name: String,
    pub abbreviation: String,
    pub color: String,
    pub is_homeroom: bool,
    pub is_shared: bool,
    pub requires_supervision: bool,
    /// Free-form availability bag, stringified.  Not consulted by placement.
    pub availability: BTreeMap<String, String>,
}

// ── Lesson ────────────────────────────────────────────────────────────────────

/// The unit of work: one course taught by one faculty to one class,
/// `periods_per_week` times.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Lesson {
    pub id: EntityId,
    pub course_id: EntityId,
    pub class_id: EntityId,
    pub faculty_id: EntityId,
    /// Batch group name.  Not consulted by placement.
    pub group: Option<String>,
    /// Number of discrete occurrences to place each week.
    pub periods_per_week: u32,
    /// Consecutive-period length.  Only `1` takes part in the "once per day"
    /// rule; longer durations are still placed as single periods.
    pub duration: u32,
    /// Co-teaching faculty.  Not enforced.
    pub shared_faculty_ids: Vec<EntityId>,
    /// e.g. `"regular"`, `"lab"`.  Not enforced.
    pub classroom_type: String,
}

impl Default for Lesson {
    fn default() -> Self {
        Self {
            id: 0,
            course_id: 0,
            class_id: 0,
            faculty_id: 0,
            group: None,
            periods_per_week: 1,
            duration: 1,
            shared_faculty_ids: Vec::new(),
            classroom_type: String::from("regular"),
        }
    }
}

// ── Snapshot ──────────────────────────────────────────────────────────────────

/// Everything one generation run reads.
///
/// Courses and faculties are keyed by id; classes, lessons and classrooms
/// keep their input order (lesson order is the priority tie-break).
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Snapshot {
    pub classes: Vec<ClassGroup>,
    pub lessons: Vec<Lesson>,
    pub courses: BTreeMap<EntityId, Course>,
    pub faculties: BTreeMap<EntityId, Faculty>,
    pub classrooms: Vec<Classroom>,
}

impl Snapshot {
    /// First class with the given id, if any.
    pub fn find_class(&self, id: EntityId) -> Option<&ClassGroup> {
        self.classes.iter().find(|c| c.id == id)
    }

    /// Total occurrences requested by all lessons.
    pub fn requested_occurrences(&self) -> u64 {
        self.lessons.iter().map(|l| u64::from(l.periods_per_week)).sum()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn class(name: &str, division: Option<&str>) -> ClassGroup {
        ClassGroup {
            id: 1,
            name: name.to_string(),
            division: division.map(str::to_string),
            batch_count: 1,
            restrictions: BTreeMap::new(),
            available_slots: Vec::new(),
        }
    }

    #[test]
    fn class_label_includes_division() {
        assert_eq!(class("Grade 10", Some("A")).label(), "Grade 10 A");
    }

    #[test]
    fn class_label_without_division_is_name() {
        assert_eq!(class("Grade 9", None).label(), "Grade 9");
        assert_eq!(class("Grade 9", Some("")).label(), "Grade 9");
    }

    #[test]
    fn max_periods_defaults_to_day_length() {
        let unset = FacultyConstraints::default();
        assert_eq!(unset.max_periods_per_day_or(8), 8);

        let capped = FacultyConstraints {
            max_periods_per_day: Some(3),
        };
        assert_eq!(capped.max_periods_per_day_or(8), 3);
    }

    #[test]
    fn faculty_time_off_lookup() {
        let faculty = Faculty {
            id: 7,
            first_name: "Sarah".into(),
            last_name: "Johnson".into(),
            abbreviation: "SJ".into(),
            title: "Ms.".into(),
            email: None,
            color: "#8B5CF6".into(),
            constraints: FacultyConstraints::default(),
            time_off: [SlotLabel::new("Monday", 0)].into_iter().collect(),
        };
        assert_eq!(faculty.display_name(), "Sarah Johnson");
        assert!(faculty.is_off(&SlotLabel::new("Monday", 0)));
        assert!(!faculty.is_off(&SlotLabel::new("Monday", 1)));
    }

    #[test]
    fn lesson_default_matches_record_defaults() {
        let lesson = Lesson::default();
        assert_eq!(lesson.periods_per_week, 1);
        assert_eq!(lesson.duration, 1);
        assert_eq!(lesson.classroom_type, "regular");
    }

    #[test]
    fn find_class_returns_first_match() {
        let mut first = class("Grade 10", Some("A"));
        first.id = 3;
        let mut second = class("Grade 10", Some("B"));
        second.id = 3;
        let snapshot = Snapshot {
            classes: vec![first, second],
            ..Default::default()
        };
        assert_eq!(snapshot.find_class(3).unwrap().label(), "Grade 10 A");
        assert!(snapshot.find_class(4).is_none());
    }

    #[test]
    fn requested_occurrences_sums_periods() {
        let snapshot = Snapshot {
            lessons: vec![
                Lesson {
                    periods_per_week: 5,
                    ..Default::default()
                },
                Lesson {
                    periods_per_week: 3,
                    ..Default::default()
                },
            ],
            ..Default::default()
        };
        assert_eq!(snapshot.requested_occurrences(), 8);
    }
}
