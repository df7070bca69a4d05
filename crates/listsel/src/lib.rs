pub mod app;
pub mod cli;
pub mod domain;
pub mod infra;

pub use app::selection::IntervalSelectionModel;
pub use app::shared::SharedSelection;
pub use domain::model::{
    CursorOverflow, DEFAULT_MAX_INDEX, Interval, ModelOptions, SelectionMode, SelectionSnapshot,
    ShiftOverflow,
};

/// Install the stderr log subscriber. `verbose` enables debug output.
pub fn init(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(level)
        .init();
}
