/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Generation output.
//!
//! [`finalize`] consumes the run's [`ScheduleGrid`] and pending list and
//! produces a [`TimetableResult`], whose JSON form is:
//!
//! ```text
//! {
//!   "timetable": { "Grade 10 A": { "Monday": [ {placement} | "", ... ], ... } },
//!   "pending":   [ { "lesson_id", "course", "class", "faculty", "reason" } ],
//!   "stats":     { "total_classes", "total_lessons_placed", "total_pending" }
//! }
//! ```

use std::collections::BTreeMap;
use std::fmt;

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::config::GridConfig;
use crate::grid::ScheduleGrid;
use crate::model::EntityId;

/// Classroom value reported until room allocation exists.
pub const CLASSROOM_PLACEHOLDER: &str = "TBD";

/// Pending reason for an occurrence with no valid slot.
pub const NO_VALID_SLOT: &str = "No valid slot found";

// ── Placement ─────────────────────────────────────────────────────────────────

/// One committed lesson occurrence, as shown in a timetable cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Placement {
    pub lesson_id: EntityId,
    pub course_name: String,
    pub course_abbr: String,
    pub faculty_name: String,
    pub faculty_abbr: String,
    pub classroom: String,
    pub color: String,
}

// ── Cell ──────────────────────────────────────────────────────────────────────

/// A reported timetable cell.  `Empty` serialises as `""`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cell {
    Empty,
    Placed(Placement),
}

impl Cell {
    pub fn placement(&self) -> Option<&Placement> {
        match self {
            Cell::Empty => None,
            Cell::Placed(p) => Some(p),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }
}

impl From<Option<Placement>> for Cell {
    fn from(value: Option<Placement>) -> Self {
        value.map_or(Cell::Empty, Cell::Placed)
    }
}

impl Serialize for Cell {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Cell::Empty => serializer.serialize_str(""),
            Cell::Placed(p) => p.serialize(serializer),
        }
    }
}

// ── ClassTimetable ────────────────────────────────────────────────────────────

/// One class's week.  Serialises as a map `day → cells` in week order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassTimetable {
    pub days: Vec<(String, Vec<Cell>)>,
}

impl ClassTimetable {
    pub fn day(&self, name: &str) -> Option<&[Cell]> {
        self.days
            .iter()
            .find(|(day, _)| day == name)
            .map(|(_, cells)| cells.as_slice())
    }

    pub fn placements(&self) -> impl Iterator<Item = (&str, usize, &Placement)> {
        self.days.iter().flat_map(|(day, cells)| {
            cells
                .iter()
                .enumerate()
                .filter_map(move |(period, cell)| {
                    cell.placement().map(|p| (day.as_str(), period, p))
                })
        })
    }
}

impl Serialize for ClassTimetable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.days.len()))?;
        for (day, cells) in &self.days {
            map.serialize_entry(day, cells)?;
        }
        map.end()
    }
}

// ── Pending / stats / result ──────────────────────────────────────────────────

/// An occurrence that could not be placed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PendingEntry {
    pub lesson_id: EntityId,
    pub course: String,
    #[serde(rename = "class")]
    pub class_label: String,
    pub faculty: String,
    pub reason: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TimetableStats {
    pub total_classes: usize,
    pub total_lessons_placed: usize,
    pub total_pending: usize,
}

/// Final output of one generation run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TimetableResult {
    pub timetable: BTreeMap<String, ClassTimetable>,
    pub pending: Vec<PendingEntry>,
    pub stats: TimetableStats,
}

impl TimetableResult {
    /// Cell at `(label, day, period)`; `None` if any key is unknown.
    pub fn cell(&self, label: &str, day: &str, period: usize) -> Option<&Cell> {
        self.timetable.get(label)?.day(day)?.get(period)
    }
}

/// Flattens the grid into transport form and computes statistics.
pub fn finalize(
    config: &GridConfig,
    grid: ScheduleGrid,
    pending: Vec<PendingEntry>,
) -> TimetableResult {
    let total_lessons_placed = grid.filled_count();

    let timetable: BTreeMap<String, ClassTimetable> = grid
        .into_weeks()
        .into_iter()
        .map(|(label, week)| {
            let days = config
                .days
                .iter()
                .cloned()
                .zip(week)
                .map(|(day, row)| (day, row.into_iter().map(Cell::from).collect()))
                .collect();
            (label, ClassTimetable { days })
        })
        .collect();

    let stats = TimetableStats {
        total_classes: timetable.len(),
        total_lessons_placed,
        total_pending: pending.len(),
    };

    TimetableResult {
        timetable,
        pending,
        stats,
    }
}

// ── Text rendering ────────────────────────────────────────────────────────────

/// Renders every class as a period × day table (`COURSE/FAC` per cell, `-`
/// when empty) followed by the pending list.
pub fn render_text(result: &TimetableResult) -> String {
    result.to_string()
}

impl fmt::Display for TimetableResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let stats = &self.stats;
        writeln!(
            f,
            "classes: {}  placed: {}  pending: {}",
            stats.total_classes, stats.total_lessons_placed, stats.total_pending
        )?;

        for (label, week) in &self.timetable {
            writeln!(f, "\n{label}")?;
            write_week(f, week)?;
        }

        if !self.pending.is_empty() {
            writeln!(f, "\nPending lessons:")?;
            for entry in &self.pending {
                writeln!(
                    f,
                    "  {} - {} (faculty: {}): {}",
                    entry.course, entry.class_label, entry.faculty, entry.reason
                )?;
            }
        }
        Ok(())
    }
}

fn cell_text(cell: Option<&Cell>) -> String {
    match cell.and_then(Cell::placement) {
        Some(p) => format!("{}/{}", p.course_abbr, p.faculty_abbr),
        None => String::from("-"),
    }
}

fn write_week(f: &mut fmt::Formatter<'_>, week: &ClassTimetable) -> fmt::Result {
    let periods = week.days.iter().map(|(_, c)| c.len()).max().unwrap_or(0);

    // Column widths: header vs. widest cell in each day.
    let widths: Vec<usize> = week
        .days
        .iter()
        .map(|(day, cells)| {
            cells
                .iter()
                .map(|c| cell_text(Some(c)).len())
                .chain(std::iter::once(day.len()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    write!(f, "{:>6}", "Period")?;
    for ((day, _), width) in week.days.iter().zip(widths.iter().copied()) {
        write!(f, " | {day:<width$}")?;
    }
    writeln!(f)?;

    for period in 0..periods {
        write!(f, "{:>6}", period + 1)?;
        for ((_, cells), width) in week.days.iter().zip(widths.iter().copied()) {
            write!(f, " | {:<width$}", cell_text(cells.get(period)))?;
        }
        writeln!(f)?;
    }
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
