use leptos::prelude::*;

use super::period::Period;
use super::{Filter, FilterPatch, FilterStore, LocalStorage};

/// Shared filter state for all report views.
#[derive(Clone, Copy)]
pub struct FilterContext {
    pub filter: ReadSignal<Filter>,
    set_filter: WriteSignal<Filter>,
}

impl FilterContext {
    /// Load the persisted filter and provide it to descendants.
    pub fn provide() -> Self {
        let initial = FilterStore::new(LocalStorage::open()).load();
        let (filter, set_filter) = signal(initial);
        let ctx = Self { filter, set_filter };
        provide_context(ctx);
        ctx
    }

    pub fn update(&self, patch: FilterPatch) {
        let current = self.filter.get_untracked();
        let merged = FilterStore::resume(LocalStorage::open(), current.clone()).update(patch);
        // Unchanged filters don't notify subscribers.
        if merged != current {
            self.set_filter.set(merged);
        }
    }

    pub fn reset(&self) {
        let reset = FilterStore::new(LocalStorage::open()).reset();
        self.set_filter.set(reset);
    }

    pub fn apply_period(&self, period: Period) {
        let today = chrono::Local::now().date_naive();
        self.update(period.patch(today));
    }
}

pub fn use_filters() -> FilterContext {
    expect_context::<FilterContext>()
}
