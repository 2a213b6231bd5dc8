/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Weekly timetable generator.
//!
//! [`TimetableGenerator`] places every occurrence of every [`Lesson`] into a
//! `(day, period)` slot of its class's week, honouring faculty availability
//! and workload, and reports what it could not place.
//!
//! # Pipeline
//! ```text
//! GridState::initialize ─► prioritize ─► for each lesson, for each occurrence:
//!                                           candidate_slots ─► choose_slot ─► commit | pending
//!                                        ─► report::finalize
//! ```
//!
//! | Topic | Behaviour |
//! |---|---|
//! | State | Stateless `generate()` — all per-run state is a local `GridState` |
//! | Priority | Descending `periods_per_week`, ties keep input order |
//! | Search | Single greedy pass, no backtracking |
//! | Tie-break | Uniform shuffle of valid slots; seedable via [`with_seed`](TimetableGenerator::with_seed) |
//! | Failure | Never an `Err` — unplaceable occurrences go to `pending` |
//! | Dangling references | Lesson skipped (no pending entry), logged with `warn!` |
//!
//! # Example
//! ```rust
//! use timetabler::config::GridConfig;
//! use timetabler::model::Snapshot;
//! use timetabler::scheduler::TimetableGenerator;
//!
//! let result = TimetableGenerator::new(GridConfig::default())
//!     .with_seed(7)
//!     .generate(&Snapshot::default());
//! assert_eq!(result.stats.total_lessons_placed, 0);
//! ```

pub mod error;
pub mod validator;

pub use error::{RejectReason, ReferenceError};

use std::time::{SystemTime, UNIX_EPOCH};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info, warn};

use crate::config::GridConfig;
use crate::grid::GridState;
use crate::model::{ClassGroup, Course, Faculty, Lesson, Snapshot};
use crate::report::{
    self, PendingEntry, Placement, TimetableResult, CLASSROOM_PLACEHOLDER, NO_VALID_SLOT,
};

use validator::{candidate_slots, choose_slot, Occurrence};

// ── Prioritizer ───────────────────────────────────────────────────────────────

/// Orders lessons for placement: most weekly occurrences first.
///
/// The sort is stable, so lessons with equal `periods_per_week` keep their
/// input order.
pub fn prioritize(lessons: &[Lesson]) -> Vec<&Lesson> {
    let mut ordered: Vec<&Lesson> = lessons.iter().collect();
    ordered.sort_by(|a, b| b.periods_per_week.cmp(&a.periods_per_week));
    ordered
}

// ── Reference checks ──────────────────────────────────────────────────────────

/// Lists every lesson whose course, faculty or class id does not resolve.
///
/// Generation skips such lessons silently; call this at ingestion time to
/// surface them instead.
pub fn check_references(snapshot: &Snapshot) -> Vec<ReferenceError> {
    let mut problems = Vec::new();
    for lesson in &snapshot.lessons {
        if !snapshot.courses.contains_key(&lesson.course_id) {
            problems.push(ReferenceError::MissingCourse {
                lesson: lesson.id,
                course: lesson.course_id,
            });
        }
        if !snapshot.faculties.contains_key(&lesson.faculty_id) {
            problems.push(ReferenceError::MissingFaculty {
                lesson: lesson.id,
                faculty: lesson.faculty_id,
            });
        }
        if snapshot.find_class(lesson.class_id).is_none() {
            problems.push(ReferenceError::MissingClass {
                lesson: lesson.id,
                class: lesson.class_id,
            });
        }
    }
    problems
}

/// A lesson with its references resolved.
struct Resolved<'a> {
    course: &'a Course,
    faculty: &'a Faculty,
    class: &'a ClassGroup,
}

fn resolve<'a>(snapshot: &'a Snapshot, lesson: &Lesson) -> Option<Resolved<'a>> {
    Some(Resolved {
        course: snapshot.courses.get(&lesson.course_id)?,
        faculty: snapshot.faculties.get(&lesson.faculty_id)?,
        class: snapshot.find_class(lesson.class_id)?,
    })
}

// ── TimetableGenerator ────────────────────────────────────────────────────────

/// The timetable generator.
///
/// Holds only configuration; every run builds and drops its own
/// [`GridState`], so one generator can serve any number of runs (including
/// concurrent ones, as it is `Send + Sync`).
#[derive(Debug, Clone)]
pub struct TimetableGenerator {
    config: GridConfig,
    seed: Option<u64>,
}

impl TimetableGenerator {
    /// Create a generator over the given slot domain.  Without a seed each
    /// run draws a time-based one.
    pub fn new(config: GridConfig) -> Self {
        Self { config, seed: None }
    }

    /// Fix the random seed so repeated runs produce identical timetables.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    // ── Public entry points ───────────────────────────────────────────────────

    /// Generate a timetable for `snapshot`.
    ///
    /// Always completes; partial placement is reported through
    /// [`TimetableResult::pending`] and [`TimetableResult::stats`].
    pub fn generate(&self, snapshot: &Snapshot) -> TimetableResult {
        let seed = self.seed.unwrap_or_else(time_seed);
        info!(seed = seed, fixed = self.seed.is_some(), "random seed");
        let mut rng = StdRng::seed_from_u64(seed);
        self.generate_with_rng(snapshot, &mut rng)
    }

    /// Same as [`generate`](Self::generate) with a caller-supplied random
    /// source (ignores any configured seed).
    pub fn generate_with_rng<R: Rng + ?Sized>(
        &self,
        snapshot: &Snapshot,
        rng: &mut R,
    ) -> TimetableResult {
        // ── Per-run state ─────────────────────────────────────────────────────
        let mut state = GridState::initialize(&self.config, snapshot);
        let mut pending: Vec<PendingEntry> = Vec::new();

        let ordered = prioritize(&snapshot.lessons);

        info!(
            lesson_count = ordered.len(),
            occurrences = snapshot.requested_occurrences(),
            class_count = state.classes().len(),
            faculty_count = state.faculty().len(),
            "=== TimetableGenerator::generate() ==="
        );

        // ── Placement ─────────────────────────────────────────────────────────
        for lesson in ordered {
            Self::place_lesson(snapshot, lesson, &mut state, &mut pending, rng);
        }

        // ── Collect results ───────────────────────────────────────────────────
        let (config, grid) = state.into_schedule();
        let result = report::finalize(&config, grid, pending);

        info!(
            total_classes = result.stats.total_classes,
            placed = result.stats.total_lessons_placed,
            pending = result.stats.total_pending,
            "=== Generation complete ==="
        );

        result
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Assigner
    // ─────────────────────────────────────────────────────────────────────────

    /// Place all `periods_per_week` occurrences of `lesson`, in sequence.
    fn place_lesson<R: Rng + ?Sized>(
        snapshot: &Snapshot,
        lesson: &Lesson,
        state: &mut GridState,
        pending: &mut Vec<PendingEntry>,
        rng: &mut R,
    ) {
        let Some(resolved) = resolve(snapshot, lesson) else {
            warn!(
                lesson = lesson.id,
                course = lesson.course_id,
                faculty = lesson.faculty_id,
                class = lesson.class_id,
                "✗ unresolvable reference — lesson skipped"
            );
            return;
        };

        let class_label = resolved.class.label();
        let faculty_name = resolved.faculty.display_name();
        let occ = Occurrence {
            lesson,
            faculty: resolved.faculty,
            class_label: &class_label,
        };

        let mut placed = 0u32;
        for occurrence in 0..lesson.periods_per_week {
            let search = candidate_slots(state, &occ);
            let candidate_count = search.candidates.len();

            match choose_slot(search.candidates, rng) {
                Some(slot) => {
                    let placement = Placement {
                        lesson_id: lesson.id,
                        course_name: resolved.course.title.clone(),
                        course_abbr: resolved.course.abbreviation.clone(),
                        faculty_name: faculty_name.clone(),
                        faculty_abbr: resolved.faculty.abbreviation.clone(),
                        classroom: CLASSROOM_PLACEHOLDER.to_string(),
                        color: resolved.course.color.clone(),
                    };
                    // Validated against the same state a moment ago.
                    let committed =
                        state.commit(&class_label, slot, placement, resolved.faculty.id);
                    debug_assert!(committed, "validated slot refused by commit");
                    placed += 1;
                    debug!(
                        lesson = lesson.id,
                        class = %class_label,
                        day = state.config().day_name(slot.day).unwrap_or("?"),
                        period = slot.period,
                        candidates = candidate_count,
                        "✓ placed"
                    );
                }
                None => {
                    debug!(
                        lesson = lesson.id,
                        class = %class_label,
                        occurrence = occurrence + 1,
                        rejected = ?search.rejected,
                        "✗ no valid slot"
                    );
                    pending.push(PendingEntry {
                        lesson_id: lesson.id,
                        course: resolved.course.title.clone(),
                        class_label: class_label.clone(),
                        faculty: faculty_name.clone(),
                        reason: NO_VALID_SLOT.to_string(),
                    });
                }
            }
        }

        if placed < lesson.periods_per_week {
            warn!(
                lesson = lesson.id,
                course = %resolved.course.title,
                class = %class_label,
                placed = placed,
                requested = lesson.periods_per_week,
                "lesson only partially placed"
            );
        }
    }
}

/// Seed derived from the wall clock.
fn time_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
