//! Bounded most-recently-used list of searched cities.

use tracing::{debug, info};

use crate::store::{self, KeyValueStore};

/// Maximum number of cities remembered.
pub const MAX_RECENT: usize = 5;

pub const CLEAR_PROMPT: &str = "Clear all recent searches?";

/// Synchronous yes/no gate in front of destructive actions.
pub trait Confirm {
    fn confirm(&mut self, prompt: &str) -> bool;
}

impl<F> Confirm for F
where
    F: FnMut(&str) -> bool,
{
    fn confirm(&mut self, prompt: &str) -> bool {
        self(prompt)
    }
}

/// First character uppercase, remainder lowercase.
pub fn normalize_city(city: &str) -> String {
    let mut chars = city.trim().chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

/// Most-recent-first, unique after normalization, at most [`MAX_RECENT`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchHistory {
    entries: Vec<String>,
}

impl SearchHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read the persisted list. Entries are re-normalized so a hand-edited
    /// record still satisfies the invariants.
    pub fn load(store: &dyn KeyValueStore) -> Self {
        let mut history = Self::new();
        for city in store::recent_searches(store) {
            let city = normalize_city(&city);
            if !city.is_empty() && !history.entries.contains(&city) {
                history.entries.push(city);
            }
        }
        history.entries.truncate(MAX_RECENT);

        debug!(entries = history.entries.len(), "loaded recent searches");
        history
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Move `city` to the front, evicting the oldest entry past the bound,
    /// and persist the result.
    pub fn record(&mut self, city: &str, store: &mut dyn KeyValueStore) {
        let city = normalize_city(city);
        if city.is_empty() {
            return;
        }

        self.entries.retain(|existing| *existing != city);
        self.entries.insert(0, city);
        self.entries.truncate(MAX_RECENT);

        store::set_recent_searches(store, &self.entries);
        info!(entries = ?self.entries, "recorded search");
    }

    /// Empty the list and drop its persisted record, if `confirm` agrees.
    /// Returns whether anything was cleared.
    pub fn clear(&mut self, confirm: &mut dyn Confirm, store: &mut dyn KeyValueStore) -> bool {
        if !confirm.confirm(CLEAR_PROMPT) {
            debug!("clear history declined");
            return false;
        }

        self.entries.clear();
        store::remove_recent_searches(store);
        info!("cleared recent searches");
        true
    }
}
