//! Transient view state: expanded rows, active section, sidebar.
//!
//! Only references strategies by id, never owns them, so losing it is harmless.

use crate::types::{Section, StrategyKind};
use std::collections::HashSet;
use tracing::debug;

/// Whether rows of `kind` offer an expand affordance.
pub fn expandable(kind: StrategyKind) -> bool {
    kind.has_detail_panel()
}

#[derive(Debug, Clone)]
pub struct SelectionState {
    expanded: HashSet<String>,
    section: Section,
    sidebar_open: bool,
}

impl Default for SelectionState {
    fn default() -> Self {
        Self {
            expanded: HashSet::new(),
            section: Section::default(),
            sidebar_open: true,
        }
    }
}

impl SelectionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip expansion of a row. Returns whether it is now expanded.
    pub fn toggle_expansion(&mut self, strategy_id: &str) -> bool {
        let expanded = if self.expanded.remove(strategy_id) {
            false
        } else {
            self.expanded.insert(strategy_id.to_string());
            true
        };
        debug!("Row {} expanded={}", strategy_id, expanded);
        expanded
    }

    pub fn is_expanded(&self, strategy_id: &str) -> bool {
        self.expanded.contains(strategy_id)
    }

    pub fn active_section(&self) -> Section {
        self.section
    }

    pub fn set_section(&mut self, section: Section) {
        self.section = section;
    }

    pub fn sidebar_open(&self) -> bool {
        self.sidebar_open
    }

    pub fn toggle_sidebar(&mut self) -> bool {
        self.sidebar_open = !self.sidebar_open;
        self.sidebar_open
    }
}
