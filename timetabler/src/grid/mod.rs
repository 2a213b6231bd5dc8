/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Per-run occupancy state.
//!
//! [`GridState`] is built from scratch by [`GridState::initialize`] at the
//! start of every generation run and consumed by the reporter at the end of
//! it, so nothing can leak from one run into the next.
//!
//! | Table | Key | Cell |
//! |---|---|---|
//! | [`ScheduleGrid`] | class label | `Option<Placement>` |
//! | faculty [`Occupancy`] | faculty id | `bool` |
//! | classroom [`Occupancy`] | classroom id | `bool` (reserved, never written yet) |
//!
//! All maps are `BTreeMap` so iteration (and therefore the report) is
//! deterministic for a given seed.

use std::collections::BTreeMap;

use tracing::{debug, warn};

use crate::config::GridConfig;
use crate::model::{EntityId, Snapshot};
use crate::report::Placement;
use crate::slot::Slot;

/// `day → period → cell`.
pub type WeekRows<T> = Vec<Vec<T>>;

fn empty_week<T: Clone>(config: &GridConfig, cell: T) -> WeekRows<T> {
    vec![vec![cell; config.periods_per_day]; config.day_count()]
}

// ── ScheduleGrid ──────────────────────────────────────────────────────────────

/// Class label → weekly rows of placements.
#[derive(Debug, Clone, Default)]
pub struct ScheduleGrid {
    classes: BTreeMap<String, WeekRows<Option<Placement>>>,
}

impl ScheduleGrid {
    /// Adds an empty week for `label`.  Returns `false` (and leaves the
    /// existing week untouched) if the label is already present.
    pub fn add_class(&mut self, label: &str, config: &GridConfig) -> bool {
        if self.classes.contains_key(label) {
            return false;
        }
        self.classes.insert(label.to_string(), empty_week(config, None));
        true
    }

    pub fn contains(&self, label: &str) -> bool {
        self.classes.contains_key(label)
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.classes.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// The placement at `slot`, `None` when empty or out of range.
    pub fn cell(&self, label: &str, slot: Slot) -> Option<&Placement> {
        self.classes
            .get(label)?
            .get(slot.day)?
            .get(slot.period)?
            .as_ref()
    }

    /// `true` only for an existing, empty cell.
    pub fn is_free(&self, label: &str, slot: Slot) -> bool {
        matches!(
            self.classes
                .get(label)
                .and_then(|week| week.get(slot.day))
                .and_then(|row| row.get(slot.period)),
            Some(None)
        )
    }

    /// Whether `lesson_id` already occupies any period of `day` for `label`.
    pub fn has_lesson_on_day(&self, label: &str, day: usize, lesson_id: EntityId) -> bool {
        self.classes
            .get(label)
            .and_then(|week| week.get(day))
            .map(|row| row.iter().flatten().any(|p| p.lesson_id == lesson_id))
            .unwrap_or(false)
    }

    /// Writes `placement` into an empty cell.  Returns `false` if the cell is
    /// occupied or does not exist.
    pub fn place(&mut self, label: &str, slot: Slot, placement: Placement) -> bool {
        let Some(cell) = self
            .classes
            .get_mut(label)
            .and_then(|week| week.get_mut(slot.day))
            .and_then(|row| row.get_mut(slot.period))
        else {
            return false;
        };
        if cell.is_some() {
            return false;
        }
        *cell = Some(placement);
        true
    }

    /// Number of non-empty cells across every class.
    pub fn filled_count(&self) -> usize {
        self.classes
            .values()
            .flatten()
            .map(|row| row.iter().filter(|c| c.is_some()).count())
            .sum()
    }

    pub fn into_weeks(self) -> BTreeMap<String, WeekRows<Option<Placement>>> {
        self.classes
    }
}

// ── Occupancy ─────────────────────────────────────────────────────────────────

/// Entity id → weekly busy flags.
#[derive(Debug, Clone, Default)]
pub struct Occupancy {
    rows: BTreeMap<EntityId, WeekRows<bool>>,
}

impl Occupancy {
    pub fn add(&mut self, id: EntityId, config: &GridConfig) {
        self.rows.entry(id).or_insert_with(|| empty_week(config, false));
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.rows.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Unknown ids and out-of-range slots read as busy.
    pub fn is_busy(&self, id: EntityId, slot: Slot) -> bool {
        self.rows
            .get(&id)
            .and_then(|week| week.get(slot.day))
            .and_then(|row| row.get(slot.period))
            .copied()
            .unwrap_or(true)
    }

    /// Busy periods on `day`.
    pub fn day_load(&self, id: EntityId, day: usize) -> usize {
        self.rows
            .get(&id)
            .and_then(|week| week.get(day))
            .map(|row| row.iter().filter(|&&busy| busy).count())
            .unwrap_or(0)
    }

    /// Marks `slot` busy.  Returns `false` if it was already busy or does not
    /// exist.
    pub fn mark(&mut self, id: EntityId, slot: Slot) -> bool {
        match self
            .rows
            .get_mut(&id)
            .and_then(|week| week.get_mut(slot.day))
            .and_then(|row| row.get_mut(slot.period))
        {
            Some(busy) if !*busy => {
                *busy = true;
                true
            }
            _ => false,
        }
    }
}

// ── GridState ─────────────────────────────────────────────────────────────────

/// All mutable state of one generation run.
#[derive(Debug, Clone)]
pub struct GridState {
    config: GridConfig,
    classes: ScheduleGrid,
    faculty: Occupancy,
    classrooms: Occupancy,
}

impl GridState {
    /// Builds empty grids for every class, faculty and classroom in
    /// `snapshot`, sized `days × periods_per_day`.
    ///
    /// Classes that share a display label share one grid.
    pub fn initialize(config: &GridConfig, snapshot: &Snapshot) -> Self {
        let mut classes = ScheduleGrid::default();
        for class in &snapshot.classes {
            let label = class.label();
            if !classes.add_class(&label, config) {
                warn!(
                    class_id = class.id,
                    label = %label,
                    "duplicate class label; classes will share one timetable"
                );
            }
        }

        let mut faculty = Occupancy::default();
        for id in snapshot.faculties.keys() {
            faculty.add(*id, config);
        }

        let mut classrooms = Occupancy::default();
        for room in &snapshot.classrooms {
            classrooms.add(room.id, config);
        }

        debug!(
            classes = classes.len(),
            faculties = faculty.len(),
            classrooms = classrooms.len(),
            days = config.day_count(),
            periods_per_day = config.periods_per_day,
            "grids initialised"
        );

        Self {
            config: config.clone(),
            classes,
            faculty,
            classrooms,
        }
    }

    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    pub fn classes(&self) -> &ScheduleGrid {
        &self.classes
    }

    pub fn faculty(&self) -> &Occupancy {
        &self.faculty
    }

    pub fn classrooms(&self) -> &Occupancy {
        &self.classrooms
    }

    /// Commits one placement: fills the class cell and marks the faculty busy.
    ///
    /// Returns `false` without touching either table if the class cell is
    /// unavailable or the faculty is already busy at `slot`.
    pub fn commit(
        &mut self,
        label: &str,
        slot: Slot,
        placement: Placement,
        faculty_id: EntityId,
    ) -> bool {
        if !self.classes.is_free(label, slot) || self.faculty.is_busy(faculty_id, slot) {
            return false;
        }
        self.classes.place(label, slot, placement);
        self.faculty.mark(faculty_id, slot);
        true
    }

    /// Ends the building phase, handing the class grid to the reporter.
    pub fn into_schedule(self) -> (GridConfig, ScheduleGrid) {
        (self.config, self.classes)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
