//! Dashboard
//!
//! The injectable aggregate a controller drives: both stores, the view
//! selection, the allocation panel and the outbound intent channel. Built
//! from seed data; there is no process-wide instance.

use crate::config::Config;
use crate::error::{DeskError, Result};
use crate::services::allocation::AllocationPanel;
use crate::services::connection_store::ConnectionStore;
use crate::services::ids::{generator_for, IdGenerator};
use crate::services::notifier::{DeskIntent, IntentNotifier};
use crate::services::seed::{seed_connections, seed_groups};
use crate::services::selection::SelectionState;
use crate::services::strategy_store::{EditBuffer, StrategyStore};
use crate::types::{
    BrokerageConnection, ConnectionDraft, Strategy, StrategyGroup, StrategyKind, Variant,
};
use serde::Serialize;

/// Serializable view of the durable model.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSnapshot {
    pub variant: Variant,
    pub groups: Vec<StrategyGroup>,
    pub connections: Vec<BrokerageConnection>,
}

pub struct Dashboard {
    pub config: Config,
    pub strategies: StrategyStore,
    pub connections: ConnectionStore,
    pub selection: SelectionState,
    pub allocation: AllocationPanel,
    notifier: IntentNotifier,
}

impl Dashboard {
    /// Create a seeded dashboard using the configured id scheme.
    pub fn new(config: Config) -> Self {
        let strategy_ids = generator_for(config.id_scheme);
        let connection_ids = generator_for(config.id_scheme);
        Self::with_ids(config, strategy_ids, connection_ids)
    }

    /// Create a seeded dashboard with explicit id sources.
    pub fn with_ids(
        config: Config,
        strategy_ids: Box<dyn IdGenerator>,
        connection_ids: Box<dyn IdGenerator>,
    ) -> Self {
        let notifier = IntentNotifier::new(config.event_capacity);
        Self {
            strategies: StrategyStore::new(seed_groups(config.variant), strategy_ids),
            connections: ConnectionStore::new(seed_connections(), connection_ids),
            selection: SelectionState::new(),
            allocation: AllocationPanel::new(),
            notifier,
            config,
        }
    }

    pub fn notifier(&self) -> &IntentNotifier {
        &self.notifier
    }

    pub fn list_groups(&self) -> &[StrategyGroup] {
        self.strategies.list_groups()
    }

    pub fn group(&self, kind: StrategyKind) -> Option<&StrategyGroup> {
        self.strategies.group(kind)
    }

    pub fn get_strategy(&self, group_name: &str, strategy_id: &str) -> Option<&Strategy> {
        self.strategies.get_strategy(group_name, strategy_id)
    }

    pub fn list_connections(&self) -> &[BrokerageConnection] {
        self.connections.list_connections()
    }

    pub fn is_expanded(&self, strategy_id: &str) -> bool {
        self.selection.is_expanded(strategy_id)
    }

    pub fn current_edit(&self) -> Option<&EditBuffer> {
        self.strategies.current_edit()
    }

    /// Register a connection and hand its credentials to the authenticator.
    pub fn add_connection(&mut self, draft: ConnectionDraft) -> String {
        let firm = draft.firm;
        let (connection_id, credentials) = self.connections.add_connection(draft);
        self.notifier.send(DeskIntent::Authenticate {
            connection_id: connection_id.clone(),
            firm,
            credentials,
        });
        connection_id
    }

    /// Ask for an immediate rebalance of a strategy that supports it.
    pub fn force_rebalance(&self, group_name: &str, strategy_id: &str) -> Result<()> {
        let kind = self.locate(group_name, strategy_id)?;
        if !kind.supports_rebalance() {
            return Err(DeskError::NotSupported {
                action: "Force rebalance",
                group: kind.name().to_string(),
            });
        }
        self.notifier.send(DeskIntent::ForceRebalance {
            group: kind,
            strategy_id: strategy_id.to_string(),
        });
        Ok(())
    }

    /// Ask for a strategy's position to be closed.
    pub fn close_position(
        &self,
        group_name: &str,
        strategy_id: &str,
        closing_only: bool,
    ) -> Result<()> {
        let kind = self.locate(group_name, strategy_id)?;
        if !kind.has_detail_panel() {
            return Err(DeskError::NotSupported {
                action: "Close position",
                group: kind.name().to_string(),
            });
        }
        self.notifier.send(DeskIntent::ClosePosition {
            group: kind,
            strategy_id: strategy_id.to_string(),
            closing_only,
        });
        Ok(())
    }

    /// Publish the next-entry allocation currently in the panel.
    pub fn request_next_entry_update(&self) -> u64 {
        let amount = self.allocation.next_entry_amount();
        self.notifier
            .send(DeskIntent::UpdateNextEntryAllocation { amount });
        amount
    }

    pub fn snapshot(&self) -> DashboardSnapshot {
        DashboardSnapshot {
            variant: self.config.variant,
            groups: self.list_groups().to_vec(),
            connections: self.list_connections().to_vec(),
        }
    }

    fn locate(&self, group_name: &str, strategy_id: &str) -> Result<StrategyKind> {
        let kind: StrategyKind = group_name
            .parse()
            .map_err(|_| DeskError::GroupNotFound(group_name.to_string()))?;
        self.group(kind)
            .ok_or_else(|| DeskError::GroupNotFound(group_name.to_string()))?
            .get(strategy_id)
            .ok_or_else(|| DeskError::StrategyNotFound {
                group: kind.name().to_string(),
                strategy_id: strategy_id.to_string(),
            })?;
        Ok(kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::ids::SequentialIds;
    use crate::types::{ConnectionStatus, Password};

    fn dashboard(variant: Variant) -> Dashboard {
        Dashboard::with_ids(
            Config::for_variant(variant),
            Box::new(SequentialIds::new("s-")),
            Box::new(SequentialIds::new("c-")),
        )
    }

    #[test]
    fn test_force_rebalance_only_for_hedge() {
        let desk = dashboard(Variant::Diagonal);
        let mut rx = desk.notifier().subscribe();

        assert!(desk.force_rebalance("Diagonal Hedge", "8").is_ok());
        assert!(matches!(
            rx.try_recv().unwrap(),
            DeskIntent::ForceRebalance { .. }
        ));

        let err = desk.force_rebalance("IVL Automated", "1").unwrap_err();
        assert!(matches!(err, DeskError::NotSupported { .. }));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_close_position_requires_detail_panel() {
        let desk = dashboard(Variant::Fifo);
        assert!(desk.close_position("IVL Automated", "1", true).is_ok());
        assert!(desk.close_position("FIFO", "8", false).is_err());
        assert!(desk.close_position("IVL Automated", "missing", false).unwrap_err().is_lookup_miss());
    }

    #[test]
    fn test_add_connection_emits_authenticate() {
        let mut desk = dashboard(Variant::Diagonal);
        let mut rx = desk.notifier().subscribe();

        let id = desk.add_connection(ConnectionDraft {
            username: "trader2".into(),
            account_number: "31337".into(),
            password: Password::new("pw"),
            ..Default::default()
        });

        let stored = desk.connections.get(&id).unwrap();
        assert_eq!(stored.status, ConnectionStatus::Disconnected);

        match rx.try_recv().unwrap() {
            DeskIntent::Authenticate {
                connection_id,
                credentials,
                ..
            } => {
                assert_eq!(connection_id, id);
                assert_eq!(credentials.password.expose_secret(), "pw");
            }
            other => panic!("unexpected intent {:?}", other),
        }
    }

    #[test]
    fn test_next_entry_update_uses_panel() {
        let mut desk = dashboard(Variant::Diagonal);
        desk.allocation.set_next_entry_allocation("12,500");
        assert_eq!(desk.request_next_entry_update(), 12_500);
    }

    #[test]
    fn test_snapshot_serializes() {
        let desk = dashboard(Variant::Fifo);
        let json = serde_json::to_value(desk.snapshot()).unwrap();
        assert_eq!(json["variant"], "fifo");
        assert_eq!(json["groups"][2]["kind"], "FIFO");
        assert_eq!(json["connections"][0]["username"], "trader1");
    }
}
