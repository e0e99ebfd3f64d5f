//! State Module
//!
//! Last commanded on/off state of every switch slot.
//!
//! The table is owned by the controller and lives only as long as the
//! process; nothing is persisted.

use crate::address::Address;

/// Fixed-size on/off table indexed by `Address`
#[derive(Debug, Clone)]
pub struct StateStore {
    slots: Vec<bool>,
}

impl StateStore {
    /// Create a table with every slot off
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: vec![false; capacity],
        }
    }

    /// Overwrite the state of a slot
    pub fn set(&mut self, address: Address, on: bool) {
        debug_assert!(address.index() < self.slots.len(), "address {} outside table", address);
        if let Some(slot) = self.slots.get_mut(address.index()) {
            *slot = on;
        }
    }

    /// State of a slot, `false` if never set
    pub fn get(&self, address: Address) -> bool {
        self.slots.get(address.index()).copied().unwrap_or(false)
    }

    /// Number of slots
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Number of slots currently on
    pub fn count_on(&self) -> usize {
        self.slots.iter().filter(|on| **on).count()
    }
}
