/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Slot search and validation for one lesson occurrence.
//!
//! A slot is valid iff **all** of the following hold (checked in this order):
//!
//! | # | Rule | Rejection |
//! |---|---|---|
//! | 1 | the class cell is empty | [`RejectReason::ClassSlotOccupied`] |
//! | 2 | the faculty is not teaching elsewhere at that slot | [`RejectReason::FacultyBusy`] |
//! | 3 | `"<day>-<period>"` is not in the faculty's `time_off` | [`RejectReason::FacultyTimeOff`] |
//! | 4 | the faculty's load that day is `< max_periods_per_day` | [`RejectReason::DailyLimitReached`] |
//! | 5 | for `duration == 1`, the lesson is not already on that day | [`RejectReason::LessonAlreadyToday`] |
//!
//! Every slot of the grid is checked (`O(days × periods)`), the valid ones
//! are shuffled, and the first is taken.  The shuffle removes any bias toward
//! early days or periods; the random source is injected so tests can fix it.

use std::collections::BTreeMap;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::grid::GridState;
use crate::model::{Faculty, Lesson};
use crate::slot::Slot;

use super::error::RejectReason;

/// The lesson occurrence being placed, with its references resolved.
#[derive(Debug, Clone, Copy)]
pub struct Occurrence<'a> {
    pub lesson: &'a Lesson,
    pub faculty: &'a Faculty,
    pub class_label: &'a str,
}

/// Outcome of scanning the whole grid for one occurrence.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SlotSearch {
    /// Valid slots in enumeration order (day-major).
    pub candidates: Vec<Slot>,
    /// Rejected slot count per [`RejectReason::kind`].
    pub rejected: BTreeMap<&'static str, usize>,
}

/// Applies the five validity rules to `slot`.
pub fn check_slot(state: &GridState, occ: &Occurrence<'_>, slot: Slot) -> Result<(), RejectReason> {
    let config = state.config();
    let faculty_id = occ.faculty.id;

    // 1. Class cell must be empty
    if !state.classes().is_free(occ.class_label, slot) {
        return Err(RejectReason::ClassSlotOccupied);
    }

    // 2. Faculty must not be teaching elsewhere
    if state.faculty().is_busy(faculty_id, slot) {
        return Err(RejectReason::FacultyBusy);
    }

    // 3. Faculty time off
    if let Some(label) = config.label(slot) {
        if occ.faculty.is_off(&label) {
            return Err(RejectReason::FacultyTimeOff);
        }
    }

    // 4. Per-day cap
    let limit = occ
        .faculty
        .constraints
        .max_periods_per_day_or(config.periods_per_day);
    let load = state.faculty().day_load(faculty_id, slot.day);
    if load >= limit {
        return Err(RejectReason::DailyLimitReached { load, limit });
    }

    // 5. Single-period lessons at most once per day
    if occ.lesson.duration == 1
        && state
            .classes()
            .has_lesson_on_day(occ.class_label, slot.day, occ.lesson.id)
    {
        return Err(RejectReason::LessonAlreadyToday);
    }

    Ok(())
}

/// Checks every slot of the grid for `occ`.
pub fn candidate_slots(state: &GridState, occ: &Occurrence<'_>) -> SlotSearch {
    let mut search = SlotSearch::default();
    for slot in state.config().slots() {
        match check_slot(state, occ, slot) {
            Ok(()) => search.candidates.push(slot),
            Err(reason) => *search.rejected.entry(reason.kind()).or_insert(0) += 1,
        }
    }
    search
}

/// Uniformly random pick: shuffle, then take the first.
pub fn choose_slot<R: Rng + ?Sized>(mut candidates: Vec<Slot>, rng: &mut R) -> Option<Slot> {
    candidates.shuffle(rng);
    candidates.first().copied()
}

// ── Tests ─────────────────────────────────────────────────────────────────────
