//! Parameter Ordering
//!
//! Hint table assigning small integer priorities to well-known parameter
//! names, and the policy turning one distribution's slot map into its final
//! key list. Keys sort by `(priority, name)`; discovery order never leaks
//! into the output.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::recorder::SlotMap;

/// Sort priority of a parameter (lower sorts first)
pub type Priority = i64;

/// Priority of keys without a hint
pub const DEFAULT_PRIORITY: Priority = 5;

/// Table of per-key priorities
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderHints {
    /// Priority for keys absent from `hints`
    #[serde(default = "default_priority")]
    pub default_priority: Priority,

    /// Key name -> priority
    #[serde(default = "default_hints")]
    pub hints: BTreeMap<String, Priority>,
}

fn default_priority() -> Priority {
    DEFAULT_PRIORITY
}

fn default_hints() -> BTreeMap<String, Priority> {
    [
        // bounds
        ("a", 0),
        ("b", 1),
        ("min", 0),
        ("max", 1),
        // location / scale
        ("mu", 0),
        ("sigma", 1),
        // quantization step comes after its bounds
        ("q", 2),
        ("value", 0),
        ("values", 0),
        ("probabilities", 1),
    ]
    .into_iter()
    .map(|(key, priority)| (key.to_string(), priority))
    .collect()
}

impl Default for OrderHints {
    fn default() -> Self {
        Self {
            default_priority: default_priority(),
            hints: default_hints(),
        }
    }
}

impl OrderHints {
    /// Priority for `key`
    pub fn priority(&self, key: &str) -> Priority {
        self.hints
            .get(key)
            .copied()
            .unwrap_or_else(|| self.unhinted_priority())
    }

    /// Priority given to keys without a hint. Never sorts ahead of a hinted key,
    /// even if the configured default is lower than some hint.
    pub fn unhinted_priority(&self) -> Priority {
        match self.hints.values().max() {
            Some(&max) if max >= self.default_priority => max.saturating_add(1),
            _ => self.default_priority,
        }
    }
}

/// Final key list for one distribution, sorted by `(priority, name)`
pub fn ordered_keys(slots: &SlotMap) -> Vec<String> {
    let mut entries: Vec<(&String, Priority)> = slots
        .iter()
        .map(|(key, slot)| (key, slot.priority))
        .collect();
    entries.sort_by(|(a, pa), (b, pb)| pa.cmp(pb).then_with(|| a.cmp(b)));
    entries.into_iter().map(|(key, _)| key.clone()).collect()
}

/// Distribution name -> ordered parameter names, iterated in name order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DistributionTable(BTreeMap<String, Vec<String>>);

impl DistributionTable {
    pub fn insert(&mut self, distribution: impl Into<String>, keys: Vec<String>) {
        self.0.insert(distribution.into(), keys);
    }

    pub fn get(&self, distribution: &str) -> Option<&[String]> {
        self.0.get(distribution).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Entries in lexicographic name order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.0.iter().map(|(name, keys)| (name.as_str(), keys.as_slice()))
    }
}
