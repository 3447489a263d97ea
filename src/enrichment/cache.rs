//! Run-wide cache of custom license texts.
//!
//! Keyed by synthesized license reference id. The first caller for a key
//! runs the fetch; concurrent callers for the same key block until it
//! completes and then share its result. Failed fetches are cached too, so
//! each key is fetched at most once per run.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, OnceLock, PoisonError};

type Slot = Arc<OnceLock<Option<String>>>;

/// Outcome of a cache lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedText {
    /// License text, `None` if the fetch failed
    pub text: Option<String>,
    /// True if this call performed the fetch
    pub fetched: bool,
}

/// Shared custom license text cache.
#[derive(Debug, Default)]
pub struct LicenseTextCache {
    slots: Mutex<HashMap<String, Slot>>,
}

impl LicenseTextCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&self, license_ref: &str) -> Slot {
        let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(slots.entry(license_ref.to_string()).or_default())
    }

    /// Return the cached text for `license_ref`, running `fetch` if no
    /// caller has fetched it yet.
    pub fn get_or_fetch(&self, license_ref: &str, fetch: impl FnOnce() -> Option<String>) -> CachedText {
        let slot = self.slot(license_ref);
        let mut fetched = false;
        let text = slot
            .get_or_init(|| {
                fetched = true;
                fetch()
            })
            .clone();
        CachedText { text, fetched }
    }

    /// Cached text, without fetching.
    #[must_use]
    pub fn get(&self, license_ref: &str) -> Option<String> {
        let slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        slots.get(license_ref).and_then(|s| s.get().cloned().flatten())
    }

    /// Number of distinct license refs seen.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
