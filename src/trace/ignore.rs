use im::{HashMap, HashSet};
use std::collections::BTreeSet;

use crate::core::Level;

/// Origin prefixes whose frames are dropped during stack filtering.
///
/// Entries come in two scopes: global entries apply to every severity,
/// per-level entries only when filtering for that level. A prefix `p`
/// matches an origin path that starts with `p` followed by `/`.
///
/// Each printer owns its list. The backing collections are persistent, so
/// cloning shares structure, but mutating a clone never leaks into the
/// original.
#[derive(Clone, Debug, Default)]
pub struct IgnoreList {
    global: HashSet<String>,
    per_level: HashMap<Level, HashSet<String>>,
}

impl IgnoreList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a prefix for every severity. Whitespace-only input is a
    /// no-op.
    pub fn add_global(&mut self, prefix: &str) {
        if let Some(prefix) = valid_prefix(prefix) {
            self.global.insert(prefix);
        }
    }

    /// Register a prefix that only applies when filtering for `level`.
    pub fn add_for_level(&mut self, prefix: &str, level: Level) {
        if let Some(prefix) = valid_prefix(prefix) {
            self.per_level
                .entry(level)
                .or_insert_with(HashSet::new)
                .insert(prefix);
        }
    }

    pub fn remove_global(&mut self, prefix: &str) -> bool {
        match valid_prefix(prefix) {
            Some(prefix) => self.global.remove(&prefix).is_some(),
            None => false,
        }
    }

    pub fn remove_for_level(&mut self, prefix: &str, level: Level) -> bool {
        let Some(prefix) = valid_prefix(prefix) else {
            return false;
        };
        match self.per_level.get_mut(&level) {
            Some(entries) => entries.remove(&prefix).is_some(),
            None => false,
        }
    }

    /// Drop a prefix from the global set and every per-level set. True when
    /// it was registered anywhere.
    pub fn remove_everywhere(&mut self, prefix: &str) -> bool {
        let Some(prefix) = valid_prefix(prefix) else {
            return false;
        };
        let mut removed = self.global.remove(&prefix).is_some();
        for (_, entries) in self.per_level.iter_mut() {
            removed |= entries.remove(&prefix).is_some();
        }
        removed
    }

    pub fn clear(&mut self) {
        log::debug!(
            "clearing {} ignored origin prefixes",
            self.all_prefixes().len()
        );
        self.global.clear();
        self.per_level.clear();
    }

    /// Deduplicated union of every registered prefix, sorted for stable
    /// display.
    pub fn all_prefixes(&self) -> BTreeSet<String> {
        let mut all: BTreeSet<String> = self.global.iter().cloned().collect();
        for entries in self.per_level.values() {
            all.extend(entries.iter().cloned());
        }
        all
    }

    /// Whether a normalized origin path falls under any registered prefix.
    /// Per-level entries are consulted only when a level is supplied.
    pub fn is_match(&self, path: &str, level: Option<Level>) -> bool {
        if self.global.iter().any(|prefix| covers(path, prefix)) {
            return true;
        }
        match level {
            Some(level) => self
                .per_level
                .get(&level)
                .is_some_and(|entries| entries.iter().any(|prefix| covers(path, prefix))),
            None => false,
        }
    }
}

fn covers(path: &str, prefix: &str) -> bool {
    path.strip_prefix(prefix)
        .is_some_and(|rest| rest.starts_with('/'))
}

fn valid_prefix(prefix: &str) -> Option<String> {
    let trimmed = prefix.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
