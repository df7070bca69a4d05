use insta::assert_snapshot;
use listsel::IntervalSelectionModel;

#[test]
fn renders_far_apart_intervals() {
    let mut model = IntervalSelectionModel::new();
    model.set_selection_interval(0, 10);
    model.add_selection_interval(model.max_index() - 10, model.max_index());

    let rendered = model.to_string();
    assert_snapshot!(rendered.trim_end(), @r"
    selected: 0..=10, 2147483637..=2147483647
    anchor: 2147483637
    lead: 2147483647
    ");
}

#[test]
fn renders_after_full_range_removal() {
    let mut model = IntervalSelectionModel::new();
    model.set_selection_interval(0, model.max_index());
    model.remove_index_interval(0, model.max_index());

    let rendered = model.to_string();
    assert_snapshot!(rendered.trim_end(), @r"
    selected: 0
    anchor: 0
    lead: none
    ");
}
