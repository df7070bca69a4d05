//! Interval selection over list indices with anchor/lead tracking.

use std::fmt;

use crate::domain::model::{
    CursorOverflow, Interval, ModelOptions, SelectionMode, SelectionSnapshot,
};
use crate::domain::runs::IndexRuns;

/// Tracks the selected indices of a list along with the anchor and lead of the most recent
/// gesture, and keeps both aligned when the list grows or shrinks.
///
/// Indices above the configured max index are clamped to it. Cursors are `None` when unset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IntervalSelectionModel {
    selected: IndexRuns,
    anchor: Option<usize>,
    lead: Option<usize>,
    options: ModelOptions,
}

impl IntervalSelectionModel {
    /// Create an empty model with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty model with the provided options.
    pub fn with_options(options: ModelOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    /// Rebuild a model from a snapshot, clamping anything past its max index.
    pub fn restore(snapshot: &SelectionSnapshot) -> Self {
        let mut model = Self::with_options(snapshot.options);
        for interval in &snapshot.intervals {
            let interval = model.clamp_interval(interval.start, interval.end);
            model.selected.insert(interval);
        }
        model.anchor = snapshot.anchor.map(|index| model.clamp(index));
        model.lead = snapshot.lead.map(|index| model.clamp(index));
        model
    }

    pub fn options(&self) -> ModelOptions {
        self.options
    }

    pub fn max_index(&self) -> usize {
        self.options.max_index
    }

    pub fn mode(&self) -> SelectionMode {
        self.options.mode
    }

    /// Change the selection mode. Applies to subsequent gestures only.
    pub fn set_mode(&mut self, mode: SelectionMode) {
        self.options.mode = mode;
    }

    /// Replace the selection with the closed interval between `index0` and `index1`.
    pub fn set_selection_interval(&mut self, index0: usize, index1: usize) {
        let (index0, index1) = match self.options.mode {
            SelectionMode::Single => (index1, index1),
            _ => (index0, index1),
        };
        let interval = self.clamp_interval(index0, index1);
        tracing::trace!(%interval, "set selection interval");

        self.selected.clear();
        self.selected.insert(interval);
        self.anchor = Some(self.clamp(index0));
        self.lead = Some(self.clamp(index1));
    }

    /// Union the closed interval between `index0` and `index1` into the selection.
    ///
    /// In [`SelectionMode::Single`] this behaves like
    /// [`set_selection_interval`](Self::set_selection_interval). In
    /// [`SelectionMode::SingleInterval`] it does so only when the union would not be a single
    /// interval, i.e. when the new interval neither overlaps nor touches the selection.
    pub fn add_selection_interval(&mut self, index0: usize, index1: usize) {
        let interval = self.clamp_interval(index0, index1);
        let replace = match self.options.mode {
            SelectionMode::Single => true,
            SelectionMode::SingleInterval => !self.touches_selection(interval),
            SelectionMode::MultipleInterval => false,
        };
        if replace {
            self.set_selection_interval(index0, index1);
            return;
        }
        tracing::trace!(%interval, "add selection interval");

        self.selected.insert(interval);
        self.anchor = Some(self.clamp(index0));
        self.lead = Some(self.clamp(index1));
    }

    /// Deselect the closed interval between `index0` and `index1`.
    ///
    /// In [`SelectionMode::SingleInterval`], deselecting the middle of the interval also
    /// deselects everything after it so a single interval remains.
    pub fn remove_selection_interval(&mut self, index0: usize, index1: usize) {
        let mut interval = self.clamp_interval(index0, index1);
        if self.options.mode == SelectionMode::SingleInterval {
            if let (Some(first), Some(last)) = (self.selected.first(), self.selected.last()) {
                if interval.start > first && interval.end < last {
                    interval.end = last;
                }
            }
        }
        tracing::trace!(%interval, "remove selection interval");

        self.selected.remove(interval);
        self.anchor = Some(self.clamp(index0));
        self.lead = Some(self.clamp(index1));
    }

    /// Deselect everything. Cursors are left in place.
    pub fn clear_selection(&mut self) {
        self.selected.clear();
    }

    /// Delete the list indices between `index0` and `index1`, shifting later selected indices
    /// and cursors down to close the hole.
    pub fn remove_index_interval(&mut self, index0: usize, index1: usize) {
        let removed = self.clamp_interval(index0, index1);
        let span = removed.span();
        // Removing every addressable index cannot shift by more than the max index.
        let gap = span.min(self.options.max_index);
        if gap < span {
            tracing::debug!(%removed, gap, "removal shift saturated at max index");
        }
        tracing::trace!(%removed, "remove index interval");

        self.selected.collapse(removed.start, gap);
        self.anchor = collapse_cursor(self.anchor, removed, span);
        self.lead = collapse_cursor(self.lead, removed, span);
    }

    /// Insert `length` list indices at `index`, before it when `before` is set and after it
    /// otherwise. The new indices are selected when `index` was.
    pub fn insert_index_interval(&mut self, index: usize, length: usize, before: bool) {
        if length == 0 {
            return;
        }
        let max = self.options.max_index;
        let index = self.clamp(index);
        let fill =
            self.options.mode != SelectionMode::Single && self.selected.contains(index);
        tracing::trace!(index, length, before, fill, "insert index interval");

        let first_new = if before { Some(index) } else { index.checked_add(1) };
        if let Some(first_new) = first_new.filter(|first| *first <= max) {
            let overflowed =
                self.selected
                    .expand(first_new, length, max, self.options.shift_overflow);
            if overflowed {
                tracing::debug!(
                    index,
                    length,
                    policy = self.options.shift_overflow.as_str(),
                    "insertion pushed selected indices past max index"
                );
            }
            if fill {
                let last_new = first_new.saturating_add(length - 1).min(max);
                self.selected.insert(Interval::new(first_new, last_new));
            }
        }

        self.anchor = self.expand_cursor(self.anchor, index, length, before);
        self.lead = self.expand_cursor(self.lead, index, length, before);
    }

    /// Move the anchor without touching the selection.
    pub fn set_anchor_selection_index(&mut self, index: Option<usize>) {
        self.anchor = index.map(|index| self.clamp(index));
    }

    /// Move the lead without touching the selection.
    pub fn move_lead_selection_index(&mut self, index: Option<usize>) {
        self.lead = index.map(|index| self.clamp(index));
    }

    pub fn is_selection_empty(&self) -> bool {
        self.selected.is_empty()
    }

    pub fn is_selected_index(&self, index: usize) -> bool {
        self.selected.contains(index)
    }

    /// Returns whether every index between `index0` and `index1` is selected.
    pub fn is_interval_selected(&self, index0: usize, index1: usize) -> bool {
        self.selected.covers(Interval::new(index0, index1))
    }

    /// Returns whether any index between `index0` and `index1` is selected.
    pub fn intersects_interval(&self, index0: usize, index1: usize) -> bool {
        self.selected.intersects(Interval::new(index0, index1))
    }

    pub fn min_selection_index(&self) -> Option<usize> {
        self.selected.first()
    }

    pub fn max_selection_index(&self) -> Option<usize> {
        self.selected.last()
    }

    pub fn anchor_selection_index(&self) -> Option<usize> {
        self.anchor
    }

    pub fn lead_selection_index(&self) -> Option<usize> {
        self.lead
    }

    /// Number of selected indices.
    pub fn selected_count(&self) -> usize {
        self.selected.count()
    }

    /// Selected intervals in ascending order.
    pub fn intervals(&self) -> impl Iterator<Item = Interval> + '_ {
        self.selected.runs().iter().copied()
    }

    /// Selected indices in ascending order.
    pub fn selected_indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.intervals().flat_map(|interval| interval.start..=interval.end)
    }

    pub fn snapshot(&self) -> SelectionSnapshot {
        SelectionSnapshot {
            options: self.options,
            intervals: self.intervals().collect(),
            anchor: self.anchor,
            lead: self.lead,
        }
    }

    fn clamp(&self, index: usize) -> usize {
        index.min(self.options.max_index)
    }

    fn clamp_interval(&self, index0: usize, index1: usize) -> Interval {
        Interval::new(self.clamp(index0), self.clamp(index1))
    }

    /// Whether `interval` overlaps or is adjacent to the selected span.
    fn touches_selection(&self, interval: Interval) -> bool {
        match (self.selected.first(), self.selected.last()) {
            (Some(first), Some(last)) => {
                interval.end.saturating_add(1) >= first && interval.start <= last.saturating_add(1)
            }
            _ => false,
        }
    }

    fn expand_cursor(
        &self,
        cursor: Option<usize>,
        index: usize,
        length: usize,
        before: bool,
    ) -> Option<usize> {
        let cursor = cursor?;
        if cursor < index || (cursor == index && !before) {
            return Some(cursor);
        }
        match cursor
            .checked_add(length)
            .filter(|shifted| *shifted <= self.options.max_index)
        {
            Some(shifted) => Some(shifted),
            None => match self.options.cursor_overflow {
                CursorOverflow::Saturate => Some(self.options.max_index),
                CursorOverflow::Clear => None,
            },
        }
    }
}

fn collapse_cursor(cursor: Option<usize>, removed: Interval, span: usize) -> Option<usize> {
    let cursor = cursor?;
    if cursor == 0 && removed.start == 0 {
        Some(0)
    } else if cursor > removed.end {
        Some(cursor - span)
    } else if cursor >= removed.start {
        removed.start.checked_sub(1)
    } else {
        Some(cursor)
    }
}

fn write_cursor(f: &mut fmt::Formatter<'_>, label: &str, cursor: Option<usize>) -> fmt::Result {
    match cursor {
        Some(index) => writeln!(f, "{label}: {index}"),
        None => writeln!(f, "{label}: none"),
    }
}

impl fmt::Display for IntervalSelectionModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.selected.is_empty() {
            writeln!(f, "selected: none")?;
        } else {
            let rendered: Vec<String> = self.intervals().map(|run| run.to_string()).collect();
            writeln!(f, "selected: {}", rendered.join(", "))?;
        }
        write_cursor(f, "anchor", self.anchor)?;
        write_cursor(f, "lead", self.lead)
    }
}
