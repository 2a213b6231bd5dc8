/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Timetabler – weekly class timetable generator
//!
//! Module layout:
//!
//! ```text
//! lib.rs
//! ├── config/         – slot domain (days × periods) + YAML snapshot loading
//! ├── model           – read-only entity snapshot (courses, classes, faculties, ...)
//! ├── slot            – slot indices and "<Day>-<Period>" labels
//! ├── grid/           – per-run occupancy state
//! ├── scheduler/      – prioritizer, slot search & validation, assigner
//! └── report          – result types, statistics, text rendering
//! ```

pub mod config;
pub mod grid;
pub mod model;
pub mod report;
pub mod scheduler;
pub mod slot;
