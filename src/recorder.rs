//! Property Recorder
//!
//! Accumulates, per distribution, the parameter keys discovered across every
//! node that declares the distribution. A key's slot is fixed the first time
//! it is seen; later sightings are no-ops.

use std::collections::{BTreeMap, HashMap};
use tracing::debug;

use crate::graph::loader::DISTRIBUTION_KEY;
use crate::order::{self, DistributionTable, OrderHints, Priority};

/// Where a key landed for one distribution
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slot {
    /// Sort priority from the hint table
    pub priority: Priority,
    /// Size of the slot map when the key was first recorded
    pub index: usize,
}

/// Key -> slot, for one distribution
pub type SlotMap = HashMap<String, Slot>;

/// Per-distribution slot maps
#[derive(Debug, Clone, Default)]
pub struct PropertyRecorder {
    hints: OrderHints,
    slots: BTreeMap<String, SlotMap>,
}

impl PropertyRecorder {
    pub fn new(hints: OrderHints) -> Self {
        Self {
            hints,
            slots: BTreeMap::new(),
        }
    }

    /// Merge `keys` into the slot map of `distribution`.
    ///
    /// The distribution is registered even when every key is skipped.
    pub fn record(&mut self, distribution: &str, keys: &[String]) {
        let slots = self.slots.entry(distribution.to_string()).or_default();
        let before = slots.len();

        for key in keys {
            if key == DISTRIBUTION_KEY || slots.contains_key(key) {
                continue;
            }
            let slot = Slot {
                priority: self.hints.priority(key),
                index: slots.len(),
            };
            slots.insert(key.clone(), slot);
        }

        debug!(
            distribution,
            added = slots.len() - before,
            total = slots.len(),
            "Recorded properties"
        );
    }

    /// Slot map for a distribution
    pub fn slots(&self, distribution: &str) -> Option<&SlotMap> {
        self.slots.get(distribution)
    }

    pub fn distribution_count(&self) -> usize {
        self.slots.len()
    }

    /// Apply the ordering policy to every distribution
    pub fn into_table(self) -> DistributionTable {
        let mut table = DistributionTable::default();
        for (distribution, slots) in &self.slots {
            table.insert(distribution.clone(), order::ordered_keys(slots));
        }
        table
    }
}
