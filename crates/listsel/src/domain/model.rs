//! Domain models for intervals, selection modes, and model snapshots.

use std::fmt;
use std::str::FromStr;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::domain::errors::DomainError;

/// Largest addressable index unless configured otherwise (a signed 32-bit list index).
pub const DEFAULT_MAX_INDEX: usize = i32::MAX as usize;

/// Closed, inclusive range of indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Interval {
    pub start: usize,
    pub end: usize,
}

impl Interval {
    /// Build an interval from two endpoints given in any order.
    pub fn new(a: usize, b: usize) -> Self {
        Self {
            start: a.min(b),
            end: a.max(b),
        }
    }

    pub fn single(index: usize) -> Self {
        Self {
            start: index,
            end: index,
        }
    }

    /// Number of indices covered, saturating at `usize::MAX`.
    pub fn span(&self) -> usize {
        (self.end - self.start).saturating_add(1)
    }

    pub fn contains(&self, index: usize) -> bool {
        self.start <= index && index <= self.end
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.start == self.end {
            write!(f, "{}", self.start)
        } else {
            write!(f, "{}..={}", self.start, self.end)
        }
    }
}

/// How many indices and intervals a gesture may select.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize, Deserialize, ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
#[value(rename_all = "kebab-case")]
pub enum SelectionMode {
    /// At most one index is selected.
    Single,
    /// One contiguous interval.
    SingleInterval,
    /// Any number of intervals.
    #[default]
    MultipleInterval,
}

impl SelectionMode {
    /// Return a stable identifier for scripts and configuration.
    pub fn as_str(&self) -> &'static str {
        match self {
            SelectionMode::Single => "single",
            SelectionMode::SingleInterval => "single-interval",
            SelectionMode::MultipleInterval => "multiple-interval",
        }
    }
}

impl FromStr for SelectionMode {
    type Err = DomainError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "single" => Ok(SelectionMode::Single),
            "single-interval" | "interval" => Ok(SelectionMode::SingleInterval),
            "multiple-interval" | "multiple" | "multi" => Ok(SelectionMode::MultipleInterval),
            other => Err(DomainError::UnknownMode(other.to_string())),
        }
    }
}

/// What happens to a cursor that an insertion pushes past the max index.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize, Deserialize, ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
#[value(rename_all = "kebab-case")]
pub enum CursorOverflow {
    /// Clamp the cursor to the max index.
    #[default]
    Saturate,
    /// Unset the cursor.
    Clear,
}

impl CursorOverflow {
    pub fn as_str(&self) -> &'static str {
        match self {
            CursorOverflow::Saturate => "saturate",
            CursorOverflow::Clear => "clear",
        }
    }
}

impl FromStr for CursorOverflow {
    type Err = DomainError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "saturate" => Ok(CursorOverflow::Saturate),
            "clear" | "unset" => Ok(CursorOverflow::Clear),
            other => Err(DomainError::UnknownCursorOverflow(other.to_string())),
        }
    }
}

/// What happens to selected indices that an insertion pushes past the max index.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize, Deserialize, ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
#[value(rename_all = "kebab-case")]
pub enum ShiftOverflow {
    /// Drop every selected index at or after the insertion point.
    #[default]
    DiscardTail,
    /// Drop only the indices that land past the max index.
    Truncate,
}

impl ShiftOverflow {
    pub fn as_str(&self) -> &'static str {
        match self {
            ShiftOverflow::DiscardTail => "discard-tail",
            ShiftOverflow::Truncate => "truncate",
        }
    }
}

impl FromStr for ShiftOverflow {
    type Err = DomainError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "discard-tail" | "discard" => Ok(ShiftOverflow::DiscardTail),
            "truncate" => Ok(ShiftOverflow::Truncate),
            other => Err(DomainError::UnknownShiftOverflow(other.to_string())),
        }
    }
}

/// Behavioral knobs for a selection model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelOptions {
    pub max_index: usize,
    pub mode: SelectionMode,
    pub cursor_overflow: CursorOverflow,
    pub shift_overflow: ShiftOverflow,
}

impl Default for ModelOptions {
    fn default() -> Self {
        Self {
            max_index: DEFAULT_MAX_INDEX,
            mode: SelectionMode::default(),
            cursor_overflow: CursorOverflow::default(),
            shift_overflow: ShiftOverflow::default(),
        }
    }
}

/// Serializable view of a selection model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionSnapshot {
    pub options: ModelOptions,
    pub intervals: Vec<Interval>,
    pub anchor: Option<usize>,
    pub lead: Option<usize>,
}
