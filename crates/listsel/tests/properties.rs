use std::collections::BTreeSet;

use listsel::{IntervalSelectionModel, ModelOptions, SelectionMode};
use proptest::prelude::*;

const MAX: usize = 40;

fn small_model() -> IntervalSelectionModel {
    model_in(SelectionMode::MultipleInterval)
}

fn model_in(mode: SelectionMode) -> IntervalSelectionModel {
    IntervalSelectionModel::with_options(ModelOptions {
        max_index: MAX,
        mode,
        ..ModelOptions::default()
    })
}

/// Index-by-index model of the same semantics, used as an oracle.
#[derive(Debug, Default)]
struct Naive {
    mode: SelectionMode,
    selected: BTreeSet<usize>,
    anchor: Option<usize>,
    lead: Option<usize>,
}

impl Naive {
    fn new(mode: SelectionMode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    fn range(a: usize, b: usize) -> (usize, usize) {
        let (a, b) = (a.min(MAX), b.min(MAX));
        (a.min(b), a.max(b))
    }

    fn gesture(&mut self, a: usize, b: usize) {
        self.anchor = Some(a.min(MAX));
        self.lead = Some(b.min(MAX));
    }

    fn apply(&mut self, op: &Op) {
        match *op {
            Op::Mode(mode) => self.mode = mode,
            Op::Set(a, b) => {
                let a = if self.mode == SelectionMode::Single { b } else { a };
                let (lo, hi) = Self::range(a, b);
                self.selected = (lo..=hi).collect();
                self.gesture(a, b);
            }
            Op::Add(a, b) => {
                let (lo, hi) = Self::range(a, b);
                let replace = match self.mode {
                    SelectionMode::Single => true,
                    SelectionMode::SingleInterval => {
                        match (self.selected.first(), self.selected.last()) {
                            (Some(&first), Some(&last)) => hi + 1 < first || lo > last + 1,
                            _ => true,
                        }
                    }
                    SelectionMode::MultipleInterval => false,
                };
                if replace {
                    self.apply(&Op::Set(a, b));
                } else {
                    self.selected.extend(lo..=hi);
                    self.gesture(a, b);
                }
            }
            Op::Deselect(a, b) => {
                let (lo, mut hi) = Self::range(a, b);
                if self.mode == SelectionMode::SingleInterval {
                    if let (Some(&first), Some(&last)) = (self.selected.first(), self.selected.last()) {
                        if lo > first && hi < last {
                            hi = last;
                        }
                    }
                }
                self.selected.retain(|index| *index < lo || *index > hi);
                self.gesture(a, b);
            }
            Op::Clear => self.selected.clear(),
            Op::RemoveIndices(a, b) => {
                let (lo, hi) = Self::range(a, b);
                let span = hi - lo + 1;
                let gap = span.min(MAX);
                self.selected = self
                    .selected
                    .iter()
                    .filter_map(|&index| match index {
                        index if index < lo => Some(index),
                        index if index >= lo + gap => Some(index - gap),
                        _ => None,
                    })
                    .collect();
                let shift = |cursor: Option<usize>| {
                    cursor.and_then(|cursor| {
                        if cursor == 0 && lo == 0 {
                            Some(0)
                        } else if cursor > hi {
                            Some(cursor - span)
                        } else if cursor >= lo {
                            lo.checked_sub(1)
                        } else {
                            Some(cursor)
                        }
                    })
                };
                self.anchor = shift(self.anchor);
                self.lead = shift(self.lead);
            }
            Op::Insert(index, length, before) => {
                if length == 0 {
                    return;
                }
                let index = index.min(MAX);
                let fill = self.mode != SelectionMode::Single && self.selected.contains(&index);
                let first = if before { index } else { index + 1 };
                if first <= MAX {
                    let overflow = self
                        .selected
                        .range(first..)
                        .next_back()
                        .is_some_and(|last| last + length > MAX);
                    self.selected = self
                        .selected
                        .iter()
                        .filter_map(|&selected| match selected {
                            selected if selected < first => Some(selected),
                            _ if overflow => None,
                            selected => Some(selected + length),
                        })
                        .collect();
                    if fill {
                        self.selected.extend(first..=(first + length - 1).min(MAX));
                    }
                }
                let shift = |cursor: Option<usize>| {
                    cursor.map(|cursor| {
                        if cursor > index || (before && cursor == index) {
                            (cursor + length).min(MAX)
                        } else {
                            cursor
                        }
                    })
                };
                self.anchor = shift(self.anchor);
                self.lead = shift(self.lead);
            }
        }
    }
}

#[derive(Debug, Clone)]
enum Op {
    Mode(SelectionMode),
    Set(usize, usize),
    Add(usize, usize),
    Deselect(usize, usize),
    Clear,
    RemoveIndices(usize, usize),
    Insert(usize, usize, bool),
}

impl Op {
    fn apply(&self, model: &mut IntervalSelectionModel) {
        match *self {
            Op::Mode(mode) => model.set_mode(mode),
            Op::Set(a, b) => model.set_selection_interval(a, b),
            Op::Add(a, b) => model.add_selection_interval(a, b),
            Op::Deselect(a, b) => model.remove_selection_interval(a, b),
            Op::Clear => model.clear_selection(),
            Op::RemoveIndices(a, b) => model.remove_index_interval(a, b),
            Op::Insert(index, length, before) => model.insert_index_interval(index, length, before),
        }
    }
}

fn index() -> std::ops::RangeInclusive<usize> {
    0..=MAX + 3
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (index(), index()).prop_map(|(a, b)| Op::Set(a, b)),
        (index(), index()).prop_map(|(a, b)| Op::Add(a, b)),
        (index(), index()).prop_map(|(a, b)| Op::Deselect(a, b)),
        Just(Op::Clear),
        (index(), index()).prop_map(|(a, b)| Op::RemoveIndices(a, b)),
        (index(), 0..=MAX + 3, any::<bool>()).prop_map(|(at, len, before)| Op::Insert(at, len, before)),
    ]
}

fn mode() -> impl Strategy<Value = SelectionMode> {
    prop_oneof![
        Just(SelectionMode::Single),
        Just(SelectionMode::SingleInterval),
        Just(SelectionMode::MultipleInterval),
    ]
}

fn op_or_mode_change() -> impl Strategy<Value = Op> {
    prop_oneof![
        8 => op(),
        1 => mode().prop_map(Op::Mode),
    ]
}

fn check_against(model: &IntervalSelectionModel, naive: &Naive, op: &Op) -> Result<(), TestCaseError> {
    let selected: BTreeSet<usize> = model.selected_indices().collect();
    prop_assert_eq!(&selected, &naive.selected, "after {:?}", op);
    prop_assert_eq!(model.min_selection_index(), naive.selected.first().copied());
    prop_assert_eq!(model.max_selection_index(), naive.selected.last().copied());
    prop_assert_eq!(model.selected_count(), naive.selected.len());
    prop_assert_eq!(model.anchor_selection_index(), naive.anchor);
    prop_assert_eq!(model.lead_selection_index(), naive.lead);
    Ok(())
}

fn disjoint_pair() -> impl Strategy<Value = ((usize, usize), (usize, usize))> {
    (0..MAX / 2, 0..MAX / 2, MAX / 2..=MAX, MAX / 2..=MAX)
        .prop_map(|(a, b, c, d)| ((a.min(b), a.max(b)), (c.min(d), c.max(d))))
}

proptest! {
    #[test]
    fn matches_naive_model(ops in prop::collection::vec(op(), 1..40)) {
        let mut model = small_model();
        let mut naive = Naive::default();
        for op in &ops {
            op.apply(&mut model);
            naive.apply(op);
            check_against(&model, &naive, op)?;
        }
    }

    #[test]
    fn matches_naive_model_across_modes(
        initial in mode(),
        ops in prop::collection::vec(op_or_mode_change(), 1..40),
    ) {
        let mut model = model_in(initial);
        let mut naive = Naive::new(initial);
        for op in &ops {
            op.apply(&mut model);
            naive.apply(op);
            check_against(&model, &naive, op)?;
        }
    }

    #[test]
    fn single_mode_selects_at_most_one_index(ops in prop::collection::vec(op(), 1..40)) {
        let mut model = model_in(SelectionMode::Single);
        for op in &ops {
            op.apply(&mut model);
            prop_assert!(model.selected_count() <= 1, "after {:?}: {}", op, model);
        }
    }

    #[test]
    fn single_interval_mode_keeps_one_run(ops in prop::collection::vec(op(), 1..40)) {
        let mut model = model_in(SelectionMode::SingleInterval);
        for op in &ops {
            op.apply(&mut model);
            prop_assert!(model.intervals().count() <= 1, "after {:?}: {}", op, model);
        }
    }

    #[test]
    fn set_is_idempotent(
        ops in prop::collection::vec(op(), 0..10),
        a in index(),
        b in index(),
    ) {
        let mut model = small_model();
        for op in &ops {
            op.apply(&mut model);
        }
        model.set_selection_interval(a, b);
        let once = model.clone();
        model.set_selection_interval(a, b);
        prop_assert_eq!(model, once);
    }

    #[test]
    fn removal_shifts_later_indices_down(
        ops in prop::collection::vec(op(), 0..10),
        a in 0..MAX,
        b in 0..MAX,
    ) {
        let (lo, hi) = (a.min(b), a.max(b));
        let span = hi - lo + 1;
        let mut model = small_model();
        for op in &ops {
            op.apply(&mut model);
        }
        let before = model.clone();
        model.remove_index_interval(lo, hi);

        for index in hi + 1..=MAX {
            prop_assert_eq!(
                model.is_selected_index(index - span),
                before.is_selected_index(index),
                "index {} after removing {}..={}", index, lo, hi
            );
        }
        for index in 0..lo {
            prop_assert_eq!(model.is_selected_index(index), before.is_selected_index(index));
        }
    }

    #[test]
    fn disjoint_adds_commute(((a, b), (c, d)) in disjoint_pair()) {
        let mut forward = small_model();
        forward.add_selection_interval(a, b);
        forward.add_selection_interval(c, d);

        let mut backward = small_model();
        backward.add_selection_interval(c, d);
        backward.add_selection_interval(a, b);

        prop_assert!(forward.selected_indices().eq(backward.selected_indices()));
        prop_assert!(forward.is_interval_selected(a, b));
        prop_assert!(forward.is_interval_selected(c, d));
    }
}
