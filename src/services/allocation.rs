//! Account-level allocation inputs shown in the strategy detail panels.

use crate::format::{normalize_allocation, parse_allocation};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllocationPanel {
    current_allocation: String,
    next_entry_allocation: String,
}

impl Default for AllocationPanel {
    fn default() -> Self {
        Self {
            current_allocation: "$80,715".to_string(),
            next_entry_allocation: "$0".to_string(),
        }
    }
}

impl AllocationPanel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current_allocation(&self) -> &str {
        &self.current_allocation
    }

    pub fn next_entry_allocation(&self) -> &str {
        &self.next_entry_allocation
    }

    pub fn set_current_allocation(&mut self, raw: &str) {
        self.current_allocation = normalize_allocation(raw);
    }

    pub fn set_next_entry_allocation(&mut self, raw: &str) {
        self.next_entry_allocation = normalize_allocation(raw);
    }

    pub fn next_entry_amount(&self) -> u64 {
        parse_allocation(&self.next_entry_allocation)
    }
}
