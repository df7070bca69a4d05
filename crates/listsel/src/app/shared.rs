//! Thread-safe handle around a selection model.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::app::selection::IntervalSelectionModel;
use crate::domain::model::SelectionSnapshot;

/// Cloneable handle serializing every access to one [`IntervalSelectionModel`].
///
/// The model itself is unsynchronized; callers on several threads go through
/// [`update`](Self::update) and [`read`](Self::read) so a structural change is fully applied
/// before any reader observes the model.
#[derive(Debug, Clone, Default)]
pub struct SharedSelection {
    inner: Arc<Mutex<IntervalSelectionModel>>,
}

impl SharedSelection {
    pub fn new(model: IntervalSelectionModel) -> Self {
        Self {
            inner: Arc::new(Mutex::new(model)),
        }
    }

    /// Run `f` with exclusive access to the model.
    pub fn update<R>(&self, f: impl FnOnce(&mut IntervalSelectionModel) -> R) -> R {
        let mut model = self.inner.lock();
        f(&mut model)
    }

    /// Run `f` against the current model state.
    pub fn read<R>(&self, f: impl FnOnce(&IntervalSelectionModel) -> R) -> R {
        let model = self.inner.lock();
        f(&model)
    }

    pub fn snapshot(&self) -> SelectionSnapshot {
        self.read(IntervalSelectionModel::snapshot)
    }
}
