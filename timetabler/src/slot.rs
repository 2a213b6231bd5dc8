/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Slot addressing.
//!
//! Two representations of the same cell of the weekly grid:
//!
//! ```text
//! Slot { day: 0, period: 3 }   ◄── GridConfig ──►   SlotLabel "Monday-3"
//!   index form, used by grids                        name form, used by time_off
//! ```
//!
//! `SlotLabel` periods are **zero-based** (`"Monday-0"` is the first period).
//! The one-based `"Monday-P1"` form is only produced for human display.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ── Slot ──────────────────────────────────────────────────────────────────────

/// One `(day, period)` cell, addressed by indices into a
/// [`GridConfig`](crate::config::GridConfig).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Slot {
    pub day: usize,
    pub period: usize,
}

impl Slot {
    pub fn new(day: usize, period: usize) -> Self {
        Self { day, period }
    }
}

// ── SlotLabel ─────────────────────────────────────────────────────────────────

/// Errors produced when parsing a [`SlotLabel`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SlotLabelError {
    #[error("slot label '{0}' has no '-' separator")]
    MissingSeparator(String),

    #[error("slot label '{0}' has an empty day name")]
    EmptyDay(String),

    #[error("slot label '{label}' has a non-numeric period '{period}'")]
    InvalidPeriod { label: String, period: String },
}

/// Named slot, serialised as `"<Day>-<PeriodIndex>"`.
///
/// Ordering is by day name, then period; it is only used to keep
/// `BTreeSet<SlotLabel>` deterministic, not to order the week.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SlotLabel {
    pub day: String,
    pub period: usize,
}

impl SlotLabel {
    pub fn new(day: impl Into<String>, period: usize) -> Self {
        Self {
            day: day.into(),
            period,
        }
    }

    /// Human form with a one-based period, e.g. `"Monday-P1"`.
    pub fn display_name(&self) -> String {
        format!("{}-P{}", self.day, self.period + 1)
    }

    /// Inverse of [`display_name`](Self::display_name).
    ///
    /// Returns `None` unless the text has exactly one `-P` separator followed
    /// by a period number `>= 1`.
    pub fn parse_display_name(s: &str) -> Option<Self> {
        let mut parts = s.split("-P");
        let day = parts.next()?;
        let period = parts.next()?;
        if parts.next().is_some() || day.is_empty() {
            return None;
        }
        let one_based: usize = period.parse().ok()?;
        one_based.checked_sub(1).map(|p| SlotLabel::new(day, p))
    }
}

impl fmt::Display for SlotLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.day, self.period)
    }
}

impl FromStr for SlotLabel {
    type Err = SlotLabelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Split on the last '-' so day names containing dashes survive.
        let (day, period) = s
            .rsplit_once('-')
            .ok_or_else(|| SlotLabelError::MissingSeparator(s.to_string()))?;

        let day = day.trim();
        if day.is_empty() {
            return Err(SlotLabelError::EmptyDay(s.to_string()));
        }

        let period = period
            .trim()
            .parse::<usize>()
            .map_err(|_| SlotLabelError::InvalidPeriod {
                label: s.to_string(),
                period: period.to_string(),
            })?;

        Ok(SlotLabel::new(day, period))
    }
}

impl Serialize for SlotLabel {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for SlotLabel {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_formats_zero_based_period() {
        assert_eq!(SlotLabel::new("Monday", 0).to_string(), "Monday-0");
        assert_eq!(SlotLabel::new("Friday", 7).to_string(), "Friday-7");
    }

    #[test]
    fn label_parses_day_and_period() {
        let label: SlotLabel = "Wednesday-4".parse().unwrap();
        assert_eq!(label, SlotLabel::new("Wednesday", 4));
    }

    #[test]
    fn label_splits_on_last_dash() {
        let label: SlotLabel = "Day-One-2".parse().unwrap();
        assert_eq!(label.day, "Day-One");
        assert_eq!(label.period, 2);
    }

    #[test]
    fn label_without_separator_is_rejected() {
        let err = "Monday".parse::<SlotLabel>().unwrap_err();
        assert!(matches!(err, SlotLabelError::MissingSeparator(_)));
    }

    #[test]
    fn label_with_empty_day_is_rejected() {
        let err = "-3".parse::<SlotLabel>().unwrap_err();
        assert!(matches!(err, SlotLabelError::EmptyDay(_)));
    }

    #[test]
    fn label_with_non_numeric_period_is_rejected() {
        let err = "Monday-P1".parse::<SlotLabel>().unwrap_err();
        assert!(matches!(err, SlotLabelError::InvalidPeriod { .. }));
    }

    #[test]
    fn display_name_is_one_based() {
        assert_eq!(SlotLabel::new("Tuesday", 0).display_name(), "Tuesday-P1");
        assert_eq!(
            SlotLabel::parse_display_name("Tuesday-P1"),
            Some(SlotLabel::new("Tuesday", 0))
        );
    }

    #[test]
    fn display_name_rejects_period_zero_and_garbage() {
        assert_eq!(SlotLabel::parse_display_name("Tuesday-P0"), None);
        assert_eq!(SlotLabel::parse_display_name("Tuesday-3"), None);
        assert_eq!(SlotLabel::parse_display_name("-P2"), None);
    }

    #[test]
    fn label_deserializes_from_yaml_string() {
        let labels: Vec<SlotLabel> = serde_yaml::from_str("[Monday-0, Friday-7]").unwrap();
        assert_eq!(
            labels,
            vec![SlotLabel::new("Monday", 0), SlotLabel::new("Friday", 7)]
        );
    }
}
