//! Strategy Store
//!
//! Owns the strategy groups and the single edit buffer:
//! - Add, toggle and remove strategies within a group
//! - Begin, update, commit and cancel the one in-flight edit
//!
//! Every mutation either applies fully or returns an error with the store
//! untouched. Errors are lookup misses or guard rejections; none are fatal.

use crate::error::{DeskError, Result};
use crate::services::ids::IdGenerator;
use crate::types::{Strategy, StrategyDraft, StrategyGroup, StrategyKind, StrategyPatch};
use tracing::{debug, info, warn};

/// The strategy currently being edited, keyed by its group.
#[derive(Debug, Clone, PartialEq)]
pub struct EditBuffer {
    pub group: StrategyKind,
    pub strategy: Strategy,
}

/// Strategy groups plus the edit buffer.
pub struct StrategyStore {
    groups: Vec<StrategyGroup>,
    edit: Option<EditBuffer>,
    ids: Box<dyn IdGenerator>,
}

impl StrategyStore {
    /// Create a store over a fixed set of groups.
    pub fn new(groups: Vec<StrategyGroup>, ids: Box<dyn IdGenerator>) -> Self {
        Self {
            groups,
            edit: None,
            ids,
        }
    }

    pub fn list_groups(&self) -> &[StrategyGroup] {
        &self.groups
    }

    pub fn group(&self, kind: StrategyKind) -> Option<&StrategyGroup> {
        self.groups.iter().find(|g| g.kind == kind)
    }

    pub fn get_strategy(&self, group_name: &str, strategy_id: &str) -> Option<&Strategy> {
        let kind = self.resolve(group_name).ok()?;
        self.group(kind)?.get(strategy_id)
    }

    /// Append a new strategy built from `draft` to the named group.
    ///
    /// Returns the id assigned to the new strategy.
    pub fn add_strategy(&mut self, group_name: &str, draft: &StrategyDraft) -> Result<String> {
        let kind = self.resolve(group_name)?;
        let id = self.fresh_id();
        let strategy = Strategy::from_draft(id.clone(), kind, draft);

        let group = self.group_mut(kind)?;
        group.strategies.push(strategy);

        info!("Added strategy {} to {}", id, kind);
        Ok(id)
    }

    /// Flip `is_active` on a strategy. Returns the new value.
    pub fn toggle_strategy_status(&mut self, group_name: &str, strategy_id: &str) -> Result<bool> {
        let kind = self.resolve(group_name)?;
        let strategy = self
            .group_mut(kind)?
            .get_mut(strategy_id)
            .ok_or_else(|| not_found(kind, strategy_id))?;

        strategy.is_active = !strategy.is_active;
        debug!(
            "Strategy {} in {} is now {}",
            strategy_id,
            kind,
            if strategy.is_active { "active" } else { "paused" }
        );
        Ok(strategy.is_active)
    }

    /// Remove an inactive strategy. Active strategies are refused.
    pub fn remove_strategy(&mut self, group_name: &str, strategy_id: &str) -> Result<Strategy> {
        let kind = self.resolve(group_name)?;
        let group = self.group_mut(kind)?;
        let idx = group
            .strategies
            .iter()
            .position(|s| s.id == strategy_id)
            .ok_or_else(|| not_found(kind, strategy_id))?;

        if group.strategies[idx].is_active {
            warn!("Refusing to remove active strategy {} from {}", strategy_id, kind);
            return Err(DeskError::StrategyActive(strategy_id.to_string()));
        }

        let removed = group.strategies.remove(idx);
        info!("Removed strategy {} from {}", strategy_id, kind);
        Ok(removed)
    }

    /// Start editing a copy of a strategy.
    ///
    /// Replaces any edit already in progress; its unsaved changes are dropped.
    pub fn begin_edit(&mut self, group_name: &str, strategy_id: &str) -> Result<()> {
        let kind = self.resolve(group_name)?;
        let strategy = self
            .group(kind)
            .and_then(|g| g.get(strategy_id))
            .cloned()
            .ok_or_else(|| not_found(kind, strategy_id))?;

        if let Some(previous) = self.edit.take() {
            debug!(
                "Discarding unsaved edit of {} in {}",
                previous.strategy.id, previous.group
            );
        }

        debug!("Editing strategy {} in {}", strategy_id, kind);
        self.edit = Some(EditBuffer {
            group: kind,
            strategy,
        });
        Ok(())
    }

    /// Merge field changes into the edit buffer.
    pub fn update_edit_buffer(&mut self, patch: &StrategyPatch) -> Result<()> {
        let buffer = self.edit.as_mut().ok_or(DeskError::NoEditInProgress)?;
        patch.apply_to(&mut buffer.strategy);
        Ok(())
    }

    /// Write the edit buffer back over the strategy with the same id in the
    /// named group, then clear the buffer.
    ///
    /// If that strategy is gone (or the buffer belongs to another group) the
    /// buffer is still cleared and nothing is written.
    pub fn commit_edit(&mut self, group_name: &str) -> Result<String> {
        let buffer = self.edit.take().ok_or(DeskError::NoEditInProgress)?;
        let kind = self.resolve(group_name)?;

        if buffer.group != kind {
            debug!(
                "Dropping edit of {} in {}: commit addressed {}",
                buffer.strategy.id, buffer.group, kind
            );
            return Err(not_found(kind, &buffer.strategy.id));
        }

        debug_assert!(buffer.strategy.fields.matches(kind));
        let id = buffer.strategy.id.clone();
        let target = self
            .group_mut(kind)?
            .get_mut(&id)
            .ok_or_else(|| not_found(kind, &id))?;
        *target = buffer.strategy;

        info!("Saved edit of strategy {} in {}", id, kind);
        Ok(id)
    }

    /// Drop the edit buffer without applying it.
    pub fn cancel_edit(&mut self) -> Option<EditBuffer> {
        let buffer = self.edit.take();
        if let Some(ref b) = buffer {
            debug!("Cancelled edit of {} in {}", b.strategy.id, b.group);
        }
        buffer
    }

    pub fn current_edit(&self) -> Option<&EditBuffer> {
        self.edit.as_ref()
    }

    /// Whether the given strategy is the one being edited.
    pub fn is_editing(&self, kind: StrategyKind, strategy_id: &str) -> bool {
        self.edit
            .as_ref()
            .map(|b| b.group == kind && b.strategy.id == strategy_id)
            .unwrap_or(false)
    }

    fn resolve(&self, group_name: &str) -> Result<StrategyKind> {
        let kind: StrategyKind = group_name
            .parse()
            .map_err(|_| DeskError::GroupNotFound(group_name.to_string()))?;
        if self.group(kind).is_none() {
            return Err(DeskError::GroupNotFound(group_name.to_string()));
        }
        Ok(kind)
    }

    fn group_mut(&mut self, kind: StrategyKind) -> Result<&mut StrategyGroup> {
        self.groups
            .iter_mut()
            .find(|g| g.kind == kind)
            .ok_or_else(|| DeskError::GroupNotFound(kind.name().to_string()))
    }

    /// Draw ids until one is unused in every group.
    fn fresh_id(&mut self) -> String {
        loop {
            let id = self.ids.next_id();
            let taken = self.groups.iter().any(|g| g.get(&id).is_some());
            if !taken {
                return id;
            }
            debug!("Id {} already in use, drawing another", id);
        }
    }
}

fn not_found(kind: StrategyKind, strategy_id: &str) -> DeskError {
    DeskError::StrategyNotFound {
        group: kind.name().to_string(),
        strategy_id: strategy_id.to_string(),
    }
}
