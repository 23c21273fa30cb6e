//! Persisted report filter (date range, wallet, active-only).
//!
//! The filter is shared by every list and report view. Start date, end
//! date and wallet survive reloads through a [`KeyValueStorage`]; an
//! unset field is stored as `""` and never sent to the server.

pub mod context;
pub mod period;
pub mod storage;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::DashboardError;
pub use storage::{KeyValueStorage, LocalStorage, MemoryStorage};

pub const START_DATE_KEY: &str = "dashboard_start_date";
pub const END_DATE_KEY: &str = "dashboard_end_date";
pub const WALLET_KEY: &str = "dashboard_carteira";

const PERSISTED_KEYS: [&str; 3] = [START_DATE_KEY, END_DATE_KEY, WALLET_KEY];

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Filter {
    /// Inclusive start date, `YYYY-MM-DD`.
    pub start: Option<String>,
    /// Inclusive end date, `YYYY-MM-DD`.
    pub end: Option<String>,
    pub wallet: Option<String>,
    /// Session-only; not persisted. Only ever `Some(true)` once merged;
    /// an unticked box is unset.
    pub active_only: Option<bool>,
}

/// A partial filter update. `Some("")` clears a text field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterPatch {
    pub start: Option<String>,
    pub end: Option<String>,
    pub wallet: Option<String>,
    pub active_only: Option<bool>,
}

impl FilterPatch {
    pub fn start(value: impl Into<String>) -> Self {
        Self {
            start: Some(value.into()),
            ..Self::default()
        }
    }

    pub fn end(value: impl Into<String>) -> Self {
        Self {
            end: Some(value.into()),
            ..Self::default()
        }
    }

    pub fn wallet(value: impl Into<String>) -> Self {
        Self {
            wallet: Some(value.into()),
            ..Self::default()
        }
    }

    pub fn active_only(value: bool) -> Self {
        Self {
            active_only: Some(value),
            ..Self::default()
        }
    }
}

/// Empty (or whitespace-only) means unset.
fn normalize(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl Filter {
    pub fn is_empty(&self) -> bool {
        self.start.is_none() && self.end.is_none() && self.wallet.is_none() && self.active_only.is_none()
    }

    /// Merge a patch; fields absent from the patch are left untouched.
    pub fn apply(&mut self, patch: FilterPatch) {
        if let Some(start) = patch.start {
            self.start = normalize(Some(start));
        }
        if let Some(end) = patch.end {
            self.end = normalize(Some(end));
        }
        if let Some(wallet) = patch.wallet {
            self.wallet = normalize(Some(wallet));
        }
        if let Some(active_only) = patch.active_only {
            self.active_only = active_only.then_some(true);
        }
    }

    /// Query parameters for the set fields only, in a fixed order.
    pub fn query_params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if let Some(start) = &self.start {
            params.push(("start", start.clone()));
        }
        if let Some(end) = &self.end {
            params.push(("end", end.clone()));
        }
        if let Some(wallet) = &self.wallet {
            params.push(("wallet", wallet.clone()));
        }
        if self.active_only == Some(true) {
            params.push(("active_only", "true".to_string()));
        }
        params
    }
}

/// Filter state backed by durable storage.
pub struct FilterStore<S> {
    storage: S,
    current: Filter,
}

impl<S: KeyValueStorage> FilterStore<S> {
    pub fn new(storage: S) -> Self {
        Self {
            storage,
            current: Filter::default(),
        }
    }

    /// Continue from an in-memory filter (keeps session-only fields).
    pub fn resume(storage: S, current: Filter) -> Self {
        Self { storage, current }
    }

    pub fn current(&self) -> &Filter {
        &self.current
    }

    /// Read the persisted fields. Missing keys are unset; a failed read
    /// leaves every persisted field unset. Never fails.
    pub fn load(&mut self) -> Filter {
        let persisted = self.read_persisted().unwrap_or_else(|e| {
            warn!("Failed to load filters, using defaults: {}", e);
            (None, None, None)
        });

        let (start, end, wallet) = persisted;
        self.current = Filter {
            start,
            end,
            wallet,
            active_only: self.current.active_only,
        };
        debug!("Loaded filters: {:?}", self.current);
        self.current.clone()
    }

    /// Merge `patch`, persist the result and return it.
    pub fn update(&mut self, patch: FilterPatch) -> Filter {
        self.current.apply(patch);
        self.persist();
        debug!("Updated filters: {:?}", self.current);
        self.current.clone()
    }

    /// Restore all-unset defaults and persist them.
    pub fn reset(&mut self) -> Filter {
        self.current = Filter::default();
        self.persist();
        self.current.clone()
    }

    /// Remove the persisted keys entirely.
    pub fn clear(&self) {
        for key in PERSISTED_KEYS {
            if let Err(e) = self.storage.remove(key) {
                warn!("Failed to clear filter key {}: {}", key, e);
            }
        }
    }

    #[allow(clippy::type_complexity)]
    fn read_persisted(
        &self,
    ) -> Result<(Option<String>, Option<String>, Option<String>), DashboardError> {
        let start = normalize(self.storage.get(START_DATE_KEY)?);
        let end = normalize(self.storage.get(END_DATE_KEY)?);
        let wallet = normalize(self.storage.get(WALLET_KEY)?);
        Ok((start, end, wallet))
    }

    fn persist(&self) {
        let values = [
            (START_DATE_KEY, &self.current.start),
            (END_DATE_KEY, &self.current.end),
            (WALLET_KEY, &self.current.wallet),
        ];
        for (key, value) in values {
            if let Err(e) = self.storage.set(key, value.as_deref().unwrap_or("")) {
                warn!("Failed to save filter key {}: {}", key, e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct BrokenStorage;

    impl KeyValueStorage for BrokenStorage {
        fn get(&self, _key: &str) -> Result<Option<String>, DashboardError> {
            Err(DashboardError::Storage("quota".into()))
        }

        fn set(&self, _key: &str, _value: &str) -> Result<(), DashboardError> {
            Err(DashboardError::Storage("quota".into()))
        }

        fn remove(&self, _key: &str) -> Result<(), DashboardError> {
            Err(DashboardError::Storage("quota".into()))
        }
    }

    #[test]
    fn test_first_load_is_unset() {
        let mut store = FilterStore::new(MemoryStorage::new());
        assert_eq!(store.load(), Filter::default());
    }

    #[test]
    fn test_update_writes_empty_string_for_unset() {
        let storage = MemoryStorage::new();
        let mut store = FilterStore::new(&storage);
        store.update(FilterPatch::start("2024-01-01"));

        assert_eq!(storage.get(START_DATE_KEY).unwrap().as_deref(), Some("2024-01-01"));
        assert_eq!(storage.get(END_DATE_KEY).unwrap().as_deref(), Some(""));
        assert_eq!(storage.get(WALLET_KEY).unwrap().as_deref(), Some(""));
    }

    #[test]
    fn test_update_merges_partial() {
        let mut store = FilterStore::new(MemoryStorage::new());
        store.update(FilterPatch::wallet("Varejo"));
        let merged = store.update(FilterPatch::end("2024-06-30"));

        assert_eq!(merged.wallet.as_deref(), Some("Varejo"));
        assert_eq!(merged.end.as_deref(), Some("2024-06-30"));
        assert!(merged.start.is_none());
    }

    #[test]
    fn test_broken_storage_degrades_to_defaults() {
        let mut store = FilterStore::new(BrokenStorage);
        assert_eq!(store.load(), Filter::default());

        // Writes fail silently; the in-memory filter still updates.
        let merged = store.update(FilterPatch::start("2024-02-01"));
        assert_eq!(merged.start.as_deref(), Some("2024-02-01"));
        store.clear();
    }

    #[test]
    fn test_active_only_survives_load() {
        let mut store = FilterStore::new(MemoryStorage::new());
        store.update(FilterPatch::active_only(true));
        let reloaded = store.load();
        assert_eq!(reloaded.active_only, Some(true));
    }

    #[test]
    fn test_reset_persists_unset_values() {
        let storage = MemoryStorage::new();
        let mut store = FilterStore::new(&storage);
        store.update(FilterPatch::wallet("Cobranca"));
        let reset = store.reset();

        assert!(reset.is_empty());
        assert_eq!(storage.get(WALLET_KEY).unwrap().as_deref(), Some(""));
    }

    #[test]
    fn test_clear_removes_keys() {
        let storage = MemoryStorage::new();
        let mut store = FilterStore::new(&storage);
        store.update(FilterPatch::start("2024-01-01"));
        store.clear();

        for key in PERSISTED_KEYS {
            assert!(!storage.contains(key), "{} should be removed", key);
        }
    }

    #[test]
    fn test_query_params_omit_unset() {
        let filter = Filter {
            start: Some("2024-01-01".into()),
            end: None,
            wallet: None,
            active_only: Some(true),
        };
        assert_eq!(
            filter.query_params(),
            vec![("start", "2024-01-01".to_string()), ("active_only", "true".to_string())]
        );
    }

    #[test]
    fn test_unticking_active_only_unsets_it() {
        let mut store = FilterStore::new(MemoryStorage::new());
        store.update(FilterPatch::active_only(true));
        let filter = store.update(FilterPatch::active_only(false));

        assert_eq!(filter.active_only, None);
        assert!(filter.is_empty());
        assert!(filter.query_params().iter().all(|(k, _)| *k != "active_only"));
    }

    #[test]
    fn test_whitespace_wallet_is_unset() {
        let mut filter = Filter::default();
        filter.apply(FilterPatch::wallet("   "));
        assert!(filter.wallet.is_none());
        assert!(filter.query_params().is_empty());
    }
}
