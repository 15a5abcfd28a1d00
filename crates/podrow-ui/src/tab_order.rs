//! Tab index bookkeeping.
//!
//! Pods are traversed first (index 1), then an interactive custom icon (2),
//! header bar buttons (3), action box buttons (4) and finally pod menu items
//! (5). A focused pod hands its index 1 to its main input.

use std::collections::BTreeMap;

/// Tab index constants.
pub struct TabOrder;

impl TabOrder {
    /// Password fields and pods themselves.
    pub const POD_INPUT: i32 = 1;
    /// Custom icon next to the password field.
    pub const POD_CUSTOM_ICON: i32 = 2;
    /// Header bar buttons (shutdown, add user).
    pub const HEADER_BAR: i32 = 3;
    /// Action box buttons.
    pub const ACTION_BOX: i32 = 4;
    /// Pod menu items (remove this user).
    pub const PAD_MENU_ITEM: i32 = 5;
    /// Focusable by pointer or script only.
    pub const UNREACHABLE: i32 = -1;
    /// Traversed after every positive index, in document order.
    pub const DOCUMENT: i32 = 0;
}

/// Tab indices keyed by element, where the key order is document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabStops<K: Ord> {
    stops: BTreeMap<K, i32>,
}

impl<K: Ord> Default for TabStops<K> {
    fn default() -> Self {
        Self {
            stops: BTreeMap::new(),
        }
    }
}

impl<K: Ord + Copy> TabStops<K> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, key: K, index: i32) {
        self.stops.insert(key, index);
    }

    /// Drop the tab index attribute entirely.
    pub fn remove(&mut self, key: K) {
        self.stops.remove(&key);
    }

    pub fn get(&self, key: K) -> Option<i32> {
        self.stops.get(&key).copied()
    }

    pub fn clear(&mut self) {
        self.stops.clear();
    }

    /// Every stop, in document order.
    pub fn iter(&self) -> impl Iterator<Item = (K, i32)> + '_ {
        self.stops.iter().map(|(k, idx)| (*k, *idx))
    }

    /// Keyboard traversal order: positive indices ascending with ties in
    /// document order, then index 0 in document order. Negative indices are
    /// skipped.
    pub fn sequence(&self) -> Vec<K> {
        let mut positive: Vec<(i32, K)> = self
            .stops
            .iter()
            .filter(|(_, idx)| **idx > 0)
            .map(|(k, idx)| (*idx, *k))
            .collect();
        // Stable sort keeps document order within one index.
        positive.sort_by_key(|(idx, _)| *idx);
        positive
            .into_iter()
            .map(|(_, k)| k)
            .chain(
                self.stops
                    .iter()
                    .filter(|(_, idx)| **idx == TabOrder::DOCUMENT)
                    .map(|(k, _)| *k),
            )
            .collect()
    }
}
