//! Run-length storage for sets of indices.

use std::cmp::Ordering;

use crate::domain::model::{Interval, ShiftOverflow};

/// Set of indices stored as sorted, disjoint, non-adjacent inclusive runs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IndexRuns {
    runs: Vec<Interval>,
}

impl IndexRuns {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }

    pub fn clear(&mut self) {
        self.runs.clear();
    }

    /// Smallest stored index.
    pub fn first(&self) -> Option<usize> {
        self.runs.first().map(|run| run.start)
    }

    /// Largest stored index.
    pub fn last(&self) -> Option<usize> {
        self.runs.last().map(|run| run.end)
    }

    /// Access the runs in ascending order.
    pub fn runs(&self) -> &[Interval] {
        &self.runs
    }

    /// Number of stored indices.
    pub fn count(&self) -> usize {
        self.runs
            .iter()
            .map(Interval::span)
            .fold(0, usize::saturating_add)
    }

    pub fn contains(&self, index: usize) -> bool {
        self.locate(index).is_ok()
    }

    /// Returns whether every index of `interval` is stored.
    pub fn covers(&self, interval: Interval) -> bool {
        match self.locate(interval.start) {
            Ok(pos) => self.runs[pos].end >= interval.end,
            Err(_) => false,
        }
    }

    /// Returns whether any index of `interval` is stored.
    pub fn intersects(&self, interval: Interval) -> bool {
        let pos = self.runs.partition_point(|run| run.end < interval.start);
        self.runs
            .get(pos)
            .is_some_and(|run| run.start <= interval.end)
    }

    /// Union `interval` into the set, merging runs it overlaps or touches.
    pub fn insert(&mut self, interval: Interval) {
        let lo = self
            .runs
            .partition_point(|run| run.end.saturating_add(1) < interval.start);
        let hi = self
            .runs
            .partition_point(|run| run.start <= interval.end.saturating_add(1));

        let mut merged = interval;
        if lo < hi {
            merged.start = merged.start.min(self.runs[lo].start);
            merged.end = merged.end.max(self.runs[hi - 1].end);
        }
        self.runs.splice(lo..hi, std::iter::once(merged));
    }

    /// Subtract `interval` from the set, splitting a run that straddles it.
    pub fn remove(&mut self, interval: Interval) {
        let lo = self.runs.partition_point(|run| run.end < interval.start);
        let hi = self.runs.partition_point(|run| run.start <= interval.end);
        if lo >= hi {
            return;
        }

        let first = self.runs[lo];
        let last = self.runs[hi - 1];
        let mut kept = Vec::with_capacity(2);
        if first.start < interval.start {
            kept.push(Interval::new(first.start, interval.start - 1));
        }
        if last.end > interval.end {
            kept.push(Interval::new(interval.end + 1, last.end));
        }
        self.runs.splice(lo..hi, kept);
    }

    /// Delete the `gap` indices starting at `start` and pull everything above the hole down
    /// by `gap`.
    pub fn collapse(&mut self, start: usize, gap: usize) {
        if gap == 0 {
            return;
        }
        self.remove(Interval::new(start, start.saturating_add(gap - 1)));

        let pos = self.runs.partition_point(|run| run.end < start);
        for run in &mut self.runs[pos..] {
            run.start -= gap;
            run.end -= gap;
        }

        if pos > 0 && pos < self.runs.len() && self.runs[pos - 1].end + 1 == self.runs[pos].start
        {
            self.runs[pos - 1].end = self.runs[pos].end;
            self.runs.remove(pos);
        }
    }

    /// Open a hole of `len` indices at `start`, pushing every index at or above it up by
    /// `len`. Indices may not pass `max`; `policy` decides what is dropped when they would.
    ///
    /// Returns `true` when the shift overflowed `max`.
    pub fn expand(&mut self, start: usize, len: usize, max: usize, policy: ShiftOverflow) -> bool {
        if len == 0 {
            return false;
        }
        let Some(last) = self.last() else {
            return false;
        };
        if last < start {
            return false;
        }

        let overflows = last.checked_add(len).is_none_or(|shifted| shifted > max);
        if overflows && policy == ShiftOverflow::DiscardTail {
            self.remove(Interval::new(start, last));
            return true;
        }

        let mut pos = self.runs.partition_point(|run| run.end < start);
        let straddling = self.runs[pos];
        if straddling.start < start {
            self.runs[pos].end = start - 1;
            self.runs.insert(pos + 1, Interval::new(start, straddling.end));
            pos += 1;
        }

        let mut keep = self.runs.len();
        for (offset, run) in self.runs[pos..].iter_mut().enumerate() {
            match run.start.checked_add(len).filter(|shifted| *shifted <= max) {
                Some(shifted) => {
                    run.start = shifted;
                    run.end = run.end.checked_add(len).map_or(max, |end| end.min(max));
                }
                None => {
                    keep = pos + offset;
                    break;
                }
            }
        }
        self.runs.truncate(keep);
        overflows
    }

    fn locate(&self, index: usize) -> Result<usize, usize> {
        self.runs.binary_search_by(|run| {
            if run.end < index {
                Ordering::Less
            } else if run.start > index {
                Ordering::Greater
            } else {
                Ordering::Equal
            }
        })
    }
}
