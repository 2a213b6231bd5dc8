/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Grid configuration and snapshot loading.
//!
//! The expected YAML structure is:
//! ```yaml
//! grid:                       # optional, defaults shown
//!   days: [Monday, Tuesday, Wednesday, Thursday, Friday]
//!   periods_per_day: 8
//! courses:
//!   - { id: 1, title: Mathematics, abbreviation: MATH, color: "#3B82F6" }
//! classes:
//!   - { id: 1, name: Grade 10, division: A }
//! faculties:
//!   - id: 1
//!     first_name: John
//!     last_name: Smith
//!     abbreviation: JS
//!     constraints: { max_periods_per_day: 6 }
//!     time_off: [Monday-0, Friday-7]
//! classrooms:
//!   - { id: 1, name: Room 101, abbreviation: R101, is_homeroom: true }
//! lessons:
//!   - { id: 1, course_id: 1, class_id: 1, faculty_id: 1, periods_per_week: 5 }
//! ```

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::model::{
    ClassGroup, Classroom, Course, EntityId, Faculty, FacultyConstraints, Lesson, Snapshot,
};
use crate::slot::{Slot, SlotLabel};

// ── GridConfig ────────────────────────────────────────────────────────────────

/// Default teaching days.
pub const DEFAULT_DAYS: [&str; 5] = ["Monday", "Tuesday", "Wednesday", "Thursday", "Friday"];

/// Default number of periods in one day.
pub const DEFAULT_PERIODS_PER_DAY: usize = 8;

/// Upper bound accepted for `periods_per_day` when loading a snapshot.
pub const MAX_PERIODS_PER_DAY: usize = 24;

/// The slot domain every grid and every validity check is defined over.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridConfig {
    #[serde(default = "default_days")]
    pub days: Vec<String>,
    #[serde(default = "default_periods_per_day")]
    pub periods_per_day: usize,
}

fn default_days() -> Vec<String> {
    DEFAULT_DAYS.iter().map(|d| d.to_string()).collect()
}

fn default_periods_per_day() -> usize {
    DEFAULT_PERIODS_PER_DAY
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            days: default_days(),
            periods_per_day: DEFAULT_PERIODS_PER_DAY,
        }
    }
}

impl GridConfig {
    pub fn new<S: Into<String>>(
        days: impl IntoIterator<Item = S>,
        periods_per_day: usize,
    ) -> Self {
        Self {
            days: days.into_iter().map(Into::into).collect(),
            periods_per_day,
        }
    }

    pub fn day_count(&self) -> usize {
        self.days.len()
    }

    /// `days × periods_per_day`, or `None` on overflow.
    pub fn slot_count(&self) -> Option<usize> {
        self.days.len().checked_mul(self.periods_per_day)
    }

    /// Rejects grids the generator cannot work with: more than
    /// [`MAX_PERIODS_PER_DAY`] periods, an empty day name, or a day listed
    /// twice (slot labels and timetable keys are per day name).
    ///
    /// An empty grid is valid; it just leaves every occurrence pending.
    pub fn validate(&self) -> Result<()> {
        if self.periods_per_day > MAX_PERIODS_PER_DAY {
            bail!(
                "periods_per_day is {}, at most {} is supported",
                self.periods_per_day,
                MAX_PERIODS_PER_DAY
            );
        }
        let mut seen = BTreeSet::new();
        for day in &self.days {
            if day.trim().is_empty() {
                bail!("grid day names must not be empty");
            }
            if !seen.insert(day.as_str()) {
                bail!("grid day '{}' is listed more than once", day);
            }
        }
        Ok(())
    }

    pub fn day_index(&self, name: &str) -> Option<usize> {
        self.days.iter().position(|d| d == name)
    }

    pub fn day_name(&self, index: usize) -> Option<&str> {
        self.days.get(index).map(String::as_str)
    }

    /// Every slot, day-major, periods ascending.
    pub fn slots(&self) -> impl Iterator<Item = Slot> + '_ {
        (0..self.days.len()).flat_map(move |day| {
            (0..self.periods_per_day).map(move |period| Slot::new(day, period))
        })
    }

    /// Named form of `slot`.  `None` if the day index is out of range.
    pub fn label(&self, slot: Slot) -> Option<SlotLabel> {
        self.day_name(slot.day)
            .map(|day| SlotLabel::new(day, slot.period))
    }
}

// ── Private YAML deserialization types ────────────────────────────────────────

/// Top-level wrapper that maps directly onto the YAML file layout.
#[derive(Debug, Default, Deserialize)]
struct SnapshotFile {
    #[serde(default)]
    grid: Option<GridConfig>,
    #[serde(default)]
    courses: Vec<CourseEntry>,
    #[serde(default)]
    classes: Vec<ClassEntry>,
    #[serde(default)]
    faculties: Vec<FacultyEntry>,
    #[serde(default)]
    classrooms: Vec<ClassroomEntry>,
    #[serde(default)]
    lessons: Vec<LessonEntry>,
}

#[derive(Debug, Deserialize)]
struct CourseEntry {
    id: EntityId,
    title: String,
    abbreviation: String,
    #[serde(default = "default_course_color")]
    color: String,
}

#[derive(Debug, Deserialize)]
struct ClassEntry {
    id: EntityId,
    name: String,
    division: Option<String>,
    #[serde(default = "default_one")]
    batch_count: u32,
    #[serde(default)]
    restrictions: BTreeMap<String, serde_yaml::Value>,
    #[serde(default)]
    available_slots: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct FacultyEntry {
    id: EntityId,
    first_name: String,
    last_name: String,
    abbreviation: String,
    #[serde(default = "default_title")]
    title: String,
    email: Option<String>,
    #[serde(default = "default_faculty_color")]
    color: String,
    #[serde(default)]
    constraints: ConstraintsEntry,
    #[serde(default)]
    time_off: Vec<String>,
}

/// The faculty `constraints` bag.  Recognised keys are typed; anything else
/// is collected into `other` and reported.
#[derive(Debug, Default, Deserialize)]
struct ConstraintsEntry {
    max_periods_per_day: Option<usize>,
    #[serde(flatten)]
    other: BTreeMap<String, serde_yaml::Value>,
}

#[derive(Debug, Deserialize)]
struct ClassroomEntry {
    id: EntityId,
    name: String,
    abbreviation: String,
    #[serde(default = "default_classroom_color")]
    color: String,
    #[serde(default)]
    is_homeroom: bool,
    #[serde(default = "default_true")]
    is_shared: bool,
    #[serde(default)]
    requires_supervision: bool,
    #[serde(default)]
    availability: BTreeMap<String, serde_yaml::Value>,
}

#[derive(Debug, Deserialize)]
struct LessonEntry {
    id: EntityId,
    course_id: EntityId,
    class_id: EntityId,
    faculty_id: EntityId,
    group: Option<String>,
    #[serde(default = "default_one")]
    periods_per_week: u32,
    #[serde(default = "default_one")]
    duration: u32,
    #[serde(default)]
    shared_faculty_ids: Vec<EntityId>,
    #[serde(default = "default_classroom_type")]
    classroom_type: String,
}

fn default_course_color() -> String {
    String::from("#3B82F6")
}

fn default_faculty_color() -> String {
    String::from("#8B5CF6")
}

fn default_classroom_color() -> String {
    String::from("#10B981")
}

fn default_title() -> String {
    String::from("Mr.")
}

fn default_classroom_type() -> String {
    String::from("regular")
}

fn default_one() -> u32 {
    1
}

fn default_true() -> bool {
    true
}

// ── Public loading API ────────────────────────────────────────────────────────

/// A loaded generation input: the slot domain plus the entity snapshot.
#[derive(Debug, Clone, Default)]
pub struct TimetableInput {
    pub grid: GridConfig,
    pub snapshot: Snapshot,
}

/// Parses the YAML file at `path`.
///
/// # Errors
/// Returns an error if the file cannot be read, the YAML is structurally
/// invalid, the `grid` section fails [`GridConfig::validate`], or a faculty
/// `time_off` entry is not a `"<Day>-<Period>"` label.
pub fn load_from_file(path: &Path) -> Result<TimetableInput> {
    info!("Loading timetable snapshot from: {}", path.display());

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Cannot open snapshot file: {}", path.display()))?;

    load_from_str(&content)
        .with_context(|| format!("Failed to load snapshot file: {}", path.display()))
}

/// Parses a YAML snapshot held in memory.  See [`load_from_file`].
pub fn load_from_str(content: &str) -> Result<TimetableInput> {
    // An empty document deserialises to unit, not to an empty mapping.
    let file: SnapshotFile = if content.trim().is_empty() {
        SnapshotFile::default()
    } else {
        serde_yaml::from_str(content).context("Failed to parse snapshot YAML")?
    };

    let grid = file.grid.unwrap_or_default();
    grid.validate().context("Invalid grid section")?;
    if grid.slot_count() == Some(0) {
        warn!(
            days = grid.day_count(),
            periods_per_day = grid.periods_per_day,
            "grid has no slots; every lesson occurrence will go pending"
        );
    }

    let mut snapshot = Snapshot::default();

    for entry in file.courses {
        snapshot.courses.insert(
            entry.id,
            Course {
                id: entry.id,
                title: entry.title,
                abbreviation: entry.abbreviation,
                color: entry.color,
            },
        );
    }

    for entry in file.classes {
        let available_slots = lenient_slot_labels(&entry.name, &entry.available_slots);
        snapshot.classes.push(ClassGroup {
            id: entry.id,
            name: entry.name,
            division: entry.division,
            batch_count: entry.batch_count,
            restrictions: stringify_bag(entry.restrictions),
            available_slots,
        });
    }

    for entry in file.faculties {
        let faculty = convert_faculty(entry)?;
        debug!(
            "  Faculty: {} | max/day: {:?} | time off: {}",
            faculty.display_name(),
            faculty.constraints.max_periods_per_day,
            faculty.time_off.len(),
        );
        snapshot.faculties.insert(faculty.id, faculty);
    }

    for entry in file.classrooms {
        snapshot.classrooms.push(Classroom {
            id: entry.id,
            name: entry.name,
            abbreviation: entry.abbreviation,
            color: entry.color,
            is_homeroom: entry.is_homeroom,
            is_shared: entry.is_shared,
            requires_supervision: entry.requires_supervision,
            availability: stringify_bag(entry.availability),
        });
    }

    for entry in file.lessons {
        snapshot.lessons.push(Lesson {
            id: entry.id,
            course_id: entry.course_id,
            class_id: entry.class_id,
            faculty_id: entry.faculty_id,
            group: entry.group,
            periods_per_week: entry.periods_per_week,
            duration: entry.duration,
            shared_faculty_ids: entry.shared_faculty_ids,
            classroom_type: entry.classroom_type,
        });
    }

    info!(
        courses = snapshot.courses.len(),
        classes = snapshot.classes.len(),
        faculties = snapshot.faculties.len(),
        classrooms = snapshot.classrooms.len(),
        lessons = snapshot.lessons.len(),
        "Snapshot loaded"
    );

    Ok(TimetableInput { grid, snapshot })
}

fn convert_faculty(entry: FacultyEntry) -> Result<Faculty> {
    let name = format!("{} {}", entry.first_name, entry.last_name);

    if !entry.constraints.other.is_empty() {
        let keys: Vec<&str> = entry.constraints.other.keys().map(String::as_str).collect();
        warn!(faculty = %name, ignored = ?keys, "unrecognised faculty constraints ignored");
    }

    let time_off = entry
        .time_off
        .iter()
        .map(|raw| raw.parse::<SlotLabel>())
        .collect::<Result<BTreeSet<_>, _>>()
        .with_context(|| format!("Invalid time_off entry for faculty '{}'", name))?;

    Ok(Faculty {
        id: entry.id,
        first_name: entry.first_name,
        last_name: entry.last_name,
        abbreviation: entry.abbreviation,
        title: entry.title,
        email: entry.email,
        color: entry.color,
        constraints: FacultyConstraints {
            max_periods_per_day: entry.constraints.max_periods_per_day,
        },
        time_off,
    })
}

/// Parses advisory slot lists.  Accepts `"Monday-0"` and the one-based
/// `"Monday-P1"` form; anything else is logged and dropped.
fn lenient_slot_labels(owner: &str, raw: &[String]) -> Vec<SlotLabel> {
    raw.iter()
        .filter_map(|text| {
            let label = text
                .parse::<SlotLabel>()
                .ok()
                .or_else(|| SlotLabel::parse_display_name(text));
            if label.is_none() {
                warn!(owner = %owner, slot = %text, "unrecognised slot label ignored");
            }
            label
        })
        .collect()
}

/// Flattens an opaque YAML bag into strings; scalars keep their plain text.
fn stringify_bag(bag: BTreeMap<String, serde_yaml::Value>) -> BTreeMap<String, String> {
    bag.into_iter()
        .map(|(key, value)| {
            let text = match value {
                serde_yaml::Value::String(s) => s,
                other => serde_yaml::to_string(&other)
                    .map(|s| s.trim_end().to_string())
                    .unwrap_or_default(),
            };
            (key, text)
        })
        .collect()
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    /// Helper: write a YAML string to a temp file and return it.
    fn yaml_tempfile(content: &str) -> NamedTempFile {
        let mut f = NamedTempFile::new().unwrap();
        f.write_all(content.as_bytes()).unwrap();
        f
    }

    // ── GridConfig ────────────────────────────────────────────────────────────

    #[test]
    fn default_grid_is_five_days_of_eight_periods() {
        let grid = GridConfig::default();
        assert_eq!(grid.days, DEFAULT_DAYS);
        assert_eq!(grid.periods_per_day, 8);
        assert_eq!(grid.slot_count(), Some(40));
    }

    #[test]
    fn slots_are_day_major() {
        let grid = GridConfig::new(["Mon", "Tue"], 2);
        let slots: Vec<Slot> = grid.slots().collect();
        assert_eq!(
            slots,
            vec![
                Slot::new(0, 0),
                Slot::new(0, 1),
                Slot::new(1, 0),
                Slot::new(1, 1)
            ]
        );
    }

    #[test]
    fn slot_count_overflow_is_none() {
        let grid = GridConfig::new(["Mon", "Tue"], usize::MAX);
        assert_eq!(grid.slot_count(), None);
    }

    #[test]
    fn validate_accepts_default_and_empty_grids() {
        assert!(GridConfig::default().validate().is_ok());
        assert!(GridConfig::new(Vec::<String>::new(), 0).validate().is_ok());
        assert!(GridConfig::new(["Mon"], MAX_PERIODS_PER_DAY).validate().is_ok());
    }

    #[test]
    fn validate_rejects_duplicate_and_empty_days() {
        let err = GridConfig::new(["Monday", "Monday"], 8).validate().unwrap_err();
        assert!(err.to_string().contains("Monday"), "{err}");
        assert!(GridConfig::new(["Monday", ""], 8).validate().is_err());
    }

    #[test]
    fn day_lookup_and_labels() {
        let grid = GridConfig::default();
        assert_eq!(grid.day_index("Wednesday"), Some(2));
        assert_eq!(grid.day_index("Sunday"), None);
        assert_eq!(
            grid.label(Slot::new(4, 7)),
            Some(SlotLabel::new("Friday", 7))
        );
        assert_eq!(grid.label(Slot::new(5, 0)), None);
    }

    // ── load_from_file ────────────────────────────────────────────────────────

    #[test]
    fn load_full_snapshot() {
        let yaml = r##"
courses:
  - { id: 1, title: Mathematics, abbreviation: MATH, color: "#3B82F6" }
  - { id: 2, title: Art, abbreviation: ART }
classes:
  - { id: 1, name: Grade 10, division: A }
  - { id: 2, name: Grade 9, restrictions: { max_gap: 2, note: mornings } }
faculties:
  - id: 1
    first_name: John
    last_name: Smith
    abbreviation: JS
    constraints: { max_periods_per_day: 6 }
    time_off: [Monday-0, Friday-7]
classrooms:
  - { id: 1, name: Room 101, abbreviation: R101, is_homeroom: true }
lessons:
  - { id: 1, course_id: 1, class_id: 1, faculty_id: 1, periods_per_week: 5 }
  - { id: 2, course_id: 2, class_id: 2, faculty_id: 1 }
"##;
        let f = yaml_tempfile(yaml);
        let input = load_from_file(f.path()).unwrap();
        let snap = &input.snapshot;

        assert_eq!(input.grid, GridConfig::default());
        assert_eq!(snap.courses.len(), 2);
        assert_eq!(snap.courses[&2].color, "#3B82F6");
        assert_eq!(snap.classes[0].label(), "Grade 10 A");
        assert_eq!(snap.classes[1].restrictions["max_gap"], "2");
        assert_eq!(snap.classes[1].restrictions["note"], "mornings");

        let john = &snap.faculties[&1];
        assert_eq!(john.constraints.max_periods_per_day, Some(6));
        assert!(john.is_off(&SlotLabel::new("Monday", 0)));
        assert!(john.is_off(&SlotLabel::new("Friday", 7)));
        assert_eq!(john.title, "Mr.");

        let room = &snap.classrooms[0];
        assert!(room.is_homeroom);
        assert!(room.is_shared);

        assert_eq!(snap.lessons[0].periods_per_week, 5);
        assert_eq!(snap.lessons[1].periods_per_week, 1);
        assert_eq!(snap.lessons[1].duration, 1);
        assert_eq!(snap.lessons[1].classroom_type, "regular");
    }

    #[test]
    fn grid_section_overrides_defaults() {
        let input = load_from_str("grid:\n  days: [Sat, Sun]\n").unwrap();
        assert_eq!(input.grid.days, vec!["Sat", "Sun"]);
        assert_eq!(input.grid.periods_per_day, 8);
    }

    #[test]
    fn empty_document_yields_empty_snapshot() {
        let input = load_from_str("").unwrap();
        assert!(input.snapshot.lessons.is_empty());
        assert!(input.snapshot.classes.is_empty());
        assert_eq!(input.grid, GridConfig::default());
    }

    #[test]
    fn unknown_constraint_keys_are_ignored() {
        let yaml = r#"
faculties:
  - id: 4
    first_name: Emily
    last_name: Davis
    abbreviation: ED
    constraints: { max_days: 4 }
"#;
        let input = load_from_str(yaml).unwrap();
        assert_eq!(input.snapshot.faculties[&4].constraints.max_periods_per_day, None);
    }

    #[test]
    fn malformed_time_off_returns_error() {
        let yaml = r#"
faculties:
  - { id: 1, first_name: A, last_name: B, abbreviation: AB, time_off: [Monday] }
"#;
        let err = load_from_str(yaml).unwrap_err();
        assert!(format!("{err:#}").contains("A B"), "error should name the faculty: {err:#}");
    }

    #[test]
    fn oversized_periods_per_day_returns_error() {
        let err = load_from_str("grid:\n  periods_per_day: 18446744073709551615\n").unwrap_err();
        assert!(format!("{err:#}").contains("periods_per_day"), "{err:#}");

        assert!(load_from_str("grid:\n  periods_per_day: 1000000000\n").is_err());
        assert!(load_from_str("grid:\n  periods_per_day: 24\n").is_ok());
    }

    #[test]
    fn duplicate_grid_days_return_error() {
        let err = load_from_str("grid:\n  days: [Monday, Monday]\n").unwrap_err();
        assert!(format!("{err:#}").contains("more than once"), "{err:#}");
    }

    #[test]
    fn classroom_availability_map_is_accepted() {
        let yaml = r#"
classrooms:
  - { id: 1, name: Room 101, abbreviation: R101, availability: {} }
  - { id: 2, name: Lab, abbreviation: LAB, availability: { Monday: [0, 1], note: mornings } }
"#;
        let input = load_from_str(yaml).unwrap();
        let rooms = &input.snapshot.classrooms;
        assert!(rooms[0].availability.is_empty());
        assert_eq!(rooms[1].availability["note"], "mornings");
        assert!(rooms[1].availability.contains_key("Monday"));
    }

    #[test]
    fn available_slots_accept_both_label_forms() {
        let yaml = r#"
classes:
  - { id: 1, name: Grade 10, available_slots: [Monday-P1, Tuesday-3, someday] }
"#;
        let input = load_from_str(yaml).unwrap();
        assert_eq!(
            input.snapshot.classes[0].available_slots,
            vec![SlotLabel::new("Monday", 0), SlotLabel::new("Tuesday", 3)]
        );
    }

    #[test]
    fn load_sample_snapshot() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("../demos/sample_snapshot.yaml");
        let input = load_from_file(&path).unwrap();

        assert_eq!(input.grid.slot_count(), Some(40));
        assert_eq!(input.snapshot.classes.len(), 3);
        assert_eq!(input.snapshot.faculties.len(), 4);
        assert_eq!(input.snapshot.classrooms.len(), 4);
        assert_eq!(input.snapshot.lessons.len(), 12);
        assert_eq!(input.snapshot.requested_occurrences(), 47);
        assert!(input.snapshot.faculties[&2].is_off(&SlotLabel::new("Friday", 7)));
    }

    #[test]
    fn missing_file_returns_error() {
        let result = load_from_file(Path::new("/nonexistent/path/snapshot.yaml"));
        assert!(result.is_err());
    }

    #[test]
    fn malformed_yaml_returns_error() {
        let f = yaml_tempfile("this is: not: valid: yaml: content:::");
        assert!(load_from_file(f.path()).is_err());
    }
}
