//! Integration tests for the strategy and connection stores.
//!
//! Run with: cargo test --test store_test

use stratdesk::config::Config;
use stratdesk::error::{DeskError, ErrorClass};
use stratdesk::services::{Dashboard, DeskIntent, SequentialIds};
use stratdesk::types::*;

fn desk(variant: Variant) -> Dashboard {
    Dashboard::with_ids(
        Config::for_variant(variant),
        Box::new(SequentialIds::starting_at("s", 100)),
        Box::new(SequentialIds::starting_at("c", 100)),
    )
}

fn draft(symbol: &str) -> StrategyDraft {
    StrategyDraft {
        account_number: "55555".to_string(),
        trade_symbol: symbol.to_string(),
        ..Default::default()
    }
}

// =============================================================================
// Toggle
// =============================================================================

mod toggle_tests {
    use super::*;

    #[test]
    fn test_double_toggle_is_identity() {
        let mut desk = desk(Variant::Diagonal);
        for (group, id) in [("IVL Automated", "1"), ("SDTE", "6"), ("Diagonal Hedge", "8")] {
            let before = desk.get_strategy(group, id).unwrap().is_active;
            desk.strategies.toggle_strategy_status(group, id).unwrap();
            assert_ne!(desk.get_strategy(group, id).unwrap().is_active, before);
            desk.strategies.toggle_strategy_status(group, id).unwrap();
            assert_eq!(desk.get_strategy(group, id).unwrap().is_active, before);
        }
    }

    #[test]
    fn test_toggle_unknown_is_lookup_miss() {
        let mut desk = desk(Variant::Diagonal);
        let before = desk.snapshot().groups;

        let err = desk.strategies.toggle_strategy_status("IVL Automated", "404").unwrap_err();
        assert_eq!(err.class(), ErrorClass::LookupMiss);
        let err = desk.strategies.toggle_strategy_status("Momentum", "1").unwrap_err();
        assert!(matches!(err, DeskError::GroupNotFound(_)));
        // FIFO is not seeded in the diagonal variant.
        let err = desk.strategies.toggle_strategy_status("FIFO", "8").unwrap_err();
        assert!(err.is_lookup_miss());

        assert_eq!(desk.snapshot().groups, before);
    }
}

// =============================================================================
// Remove
// =============================================================================

mod remove_tests {
    use super::*;

    #[test]
    fn test_remove_active_is_refused() {
        let mut desk = desk(Variant::Diagonal);
        let err = desk.strategies.remove_strategy("SDTE", "6").unwrap_err();
        assert_eq!(err, DeskError::StrategyActive("6".to_string()));
        assert_eq!(err.class(), ErrorClass::Guarded);
        assert_eq!(desk.group(StrategyKind::Sdte).unwrap().total_count(), 1);
    }

    #[test]
    fn test_remove_inactive_shrinks_by_one() {
        let mut desk = desk(Variant::Diagonal);
        desk.strategies.add_strategy("Diagonal Hedge", &draft("SPY")).unwrap();
        assert_eq!(desk.group(StrategyKind::DiagonalHedge).unwrap().total_count(), 2);

        let removed = desk.strategies.remove_strategy("Diagonal Hedge", "8").unwrap();
        assert_eq!(removed.trade_symbol, "/ES");

        let group = desk.group(StrategyKind::DiagonalHedge).unwrap();
        assert_eq!(group.total_count(), 1);
        assert_eq!(group.strategies[0].trade_symbol, "SPY");
    }

    #[test]
    fn test_remove_missing_leaves_group() {
        let mut desk = desk(Variant::Fifo);
        assert!(desk.strategies.remove_strategy("FIFO", "9").unwrap_err().is_lookup_miss());
        assert_eq!(desk.group(StrategyKind::Fifo).unwrap().total_count(), 1);
    }
}

// =============================================================================
// Add
// =============================================================================

mod add_tests {
    use super::*;

    #[test]
    fn test_ivl_schema_after_add() {
        let mut desk = desk(Variant::Diagonal);
        let id = desk
            .strategies
            .add_strategy(
                "IVL Automated",
                &StrategyDraft {
                    capital_allocation: "2500.5".to_string(),
                    ..draft("MSFT")
                },
            )
            .unwrap();

        let added = desk.get_strategy("IVL Automated", &id).unwrap();
        assert_eq!(added.capital_allocation(), Some(2500.5));
        assert_eq!(added.preset(), None);
        assert_eq!(added.allocation_value(), None);
        assert!(!added.is_active);
        assert!(added.orders.is_empty());
    }

    #[test]
    fn test_hedge_schema_after_add() {
        let mut desk = desk(Variant::Diagonal);
        let id = desk
            .strategies
            .add_strategy(
                "Diagonal Hedge",
                &StrategyDraft {
                    allocation_value: "15000".to_string(),
                    preset: Preset::Cautious,
                    ..draft("/NQ")
                },
            )
            .unwrap();

        let added = desk.get_strategy("Diagonal Hedge", &id).unwrap();
        assert_eq!(added.allocation_value(), Some("$15,000"));
        assert_eq!(added.allocation_amount(), Some(15_000));
        assert_eq!(added.preset(), Some(Preset::Cautious));
        assert_eq!(added.capital_allocation(), None);
    }

    #[test]
    fn test_bad_numbers_coerce_to_zero() {
        let mut desk = desk(Variant::Diagonal);
        let id = desk
            .strategies
            .add_strategy(
                "IVL Automated",
                &StrategyDraft {
                    trade_qty: "lots".to_string(),
                    capital_allocation: "-50".to_string(),
                    ..draft("IBM")
                },
            )
            .unwrap();

        let added = desk.get_strategy("IVL Automated", &id).unwrap();
        assert_eq!(added.trade_qty, 0);
        assert_eq!(added.capital_allocation(), Some(0.0));
    }

    #[test]
    fn test_add_appends_with_fresh_ids() {
        let mut desk = desk(Variant::Fifo);
        let a = desk.strategies.add_strategy("FIFO", &draft("A")).unwrap();
        let b = desk.strategies.add_strategy("FIFO", &draft("B")).unwrap();
        assert_ne!(a, b);

        let symbols: Vec<_> = desk
            .group(StrategyKind::Fifo)
            .unwrap()
            .strategies
            .iter()
            .map(|s| s.trade_symbol.as_str())
            .collect();
        assert_eq!(symbols, vec!["/ES", "A", "B"]);
    }

    #[test]
    fn test_colliding_ids_are_redrawn() {
        let mut desk = Dashboard::with_ids(
            Config::for_variant(Variant::Diagonal),
            Box::new(SequentialIds::starting_at("", 6)),
            Box::new(SequentialIds::new("c")),
        );
        // "6" is the seeded SDTE strategy.
        let id = desk.strategies.add_strategy("SDTE", &draft("DIA")).unwrap();
        assert_eq!(id, "7");
    }

    #[test]
    fn test_add_to_unknown_group_is_rejected() {
        let mut desk = desk(Variant::Diagonal);
        assert!(desk.strategies.add_strategy("", &draft("X")).is_err());
        assert!(desk.strategies.add_strategy("FIFO", &draft("X")).is_err());
        assert_eq!(desk.list_groups().iter().map(|g| g.total_count()).sum::<usize>(), 3);
    }
}

// =============================================================================
// Edit buffer
// =============================================================================

mod edit_tests {
    use super::*;

    #[test]
    fn test_second_begin_edit_drops_first() {
        let mut desk = desk(Variant::Diagonal);

        desk.strategies.begin_edit("IVL Automated", "1").unwrap();
        desk.strategies
            .update_edit_buffer(&StrategyPatch {
                trade_symbol: Some("LOST".to_string()),
                ..Default::default()
            })
            .unwrap();

        desk.strategies.begin_edit("SDTE", "6").unwrap();
        desk.strategies
            .update_edit_buffer(&StrategyPatch {
                trade_qty: Some("250".to_string()),
                ..Default::default()
            })
            .unwrap();

        assert_eq!(desk.strategies.commit_edit("SDTE").unwrap(), "6");
        assert_eq!(desk.get_strategy("SDTE", "6").unwrap().trade_qty, 250);
        assert_eq!(desk.get_strategy("IVL Automated", "1").unwrap().trade_symbol, "AAPL");
        assert!(desk.current_edit().is_none());
    }

    #[test]
    fn test_patch_ignores_foreign_fields() {
        let mut desk = desk(Variant::Diagonal);
        desk.strategies.begin_edit("Diagonal Hedge", "8").unwrap();
        desk.strategies
            .update_edit_buffer(&StrategyPatch {
                capital_allocation: Some("999".to_string()),
                allocation_value: Some("41000".to_string()),
                preset: Some(Preset::SuperBullish),
                ..Default::default()
            })
            .unwrap();
        desk.strategies.commit_edit("Diagonal Hedge").unwrap();

        let hedge = desk.get_strategy("Diagonal Hedge", "8").unwrap();
        assert_eq!(hedge.allocation_value(), Some("$41,000"));
        assert_eq!(hedge.preset(), Some(Preset::SuperBullish));
        assert_eq!(hedge.capital_allocation(), None);
    }

    #[test]
    fn test_commit_after_concurrent_remove_clears_buffer() {
        let mut desk = desk(Variant::Diagonal);
        desk.strategies.begin_edit("Diagonal Hedge", "8").unwrap();
        desk.strategies.remove_strategy("Diagonal Hedge", "8").unwrap();

        let err = desk.strategies.commit_edit("Diagonal Hedge").unwrap_err();
        assert!(err.is_lookup_miss());
        assert!(desk.current_edit().is_none());
        assert_eq!(desk.group(StrategyKind::DiagonalHedge).unwrap().total_count(), 0);
    }

    #[test]
    fn test_commit_to_other_group_writes_nothing() {
        let mut desk = desk(Variant::Diagonal);
        desk.strategies.begin_edit("IVL Automated", "1").unwrap();
        desk.strategies
            .update_edit_buffer(&StrategyPatch {
                trade_symbol: Some("NVDA".to_string()),
                ..Default::default()
            })
            .unwrap();

        assert!(desk.strategies.commit_edit("SDTE").is_err());
        assert!(desk.current_edit().is_none());
        assert_eq!(desk.get_strategy("IVL Automated", "1").unwrap().trade_symbol, "AAPL");
    }

    #[test]
    fn test_cancel_and_update_without_edit() {
        let mut desk = desk(Variant::Diagonal);
        assert_eq!(
            desk.strategies.update_edit_buffer(&StrategyPatch::default()),
            Err(DeskError::NoEditInProgress)
        );
        assert!(desk.strategies.cancel_edit().is_none());

        desk.strategies.begin_edit("SDTE", "6").unwrap();
        assert!(desk.strategies.is_editing(StrategyKind::Sdte, "6"));
        let dropped = desk.strategies.cancel_edit().unwrap();
        assert_eq!(dropped.group, StrategyKind::Sdte);
        assert!(desk.strategies.commit_edit("SDTE").is_err());
    }
}

// =============================================================================
// Connections
// =============================================================================

mod connection_tests {
    use super::*;

    #[test]
    fn test_add_connection_is_disconnected_without_password() {
        let mut desk = desk(Variant::Diagonal);
        let id = desk.add_connection(ConnectionDraft {
            firm: Firm::Tastytrade,
            username: "trader7".to_string(),
            account_number: "77777".to_string(),
            password: Password::new("s3cret"),
        });

        let stored = desk.connections.get(&id).unwrap();
        assert_eq!(stored.status, ConnectionStatus::Disconnected);
        let json = serde_json::to_string(stored).unwrap();
        assert!(!json.contains("s3cret"));
        assert!(!format!("{:?}", stored).contains("s3cret"));
    }

    #[test]
    fn test_remove_connection_unconditionally() {
        let mut desk = desk(Variant::Diagonal);
        // The seeded connection is Connected; removal does not care.
        let removed = desk.connections.remove_connection("1").unwrap();
        assert_eq!(removed.username, "trader1");
        assert!(desk.list_connections().is_empty());
        assert_eq!(
            desk.connections.remove_connection("1"),
            Err(DeskError::ConnectionNotFound("1".to_string()))
        );
    }

    #[test]
    fn test_authenticate_intent_carries_password() {
        let mut desk = desk(Variant::Diagonal);
        let mut rx = desk.notifier().subscribe();
        let id = desk.add_connection(ConnectionDraft {
            username: "trader8".to_string(),
            password: Password::new("pw8"),
            ..Default::default()
        });

        match rx.try_recv().unwrap() {
            DeskIntent::Authenticate {
                connection_id,
                firm,
                credentials,
            } => {
                assert_eq!(connection_id, id);
                assert_eq!(firm, Firm::Tastytrade);
                assert_eq!(credentials.username, "trader8");
                assert_eq!(credentials.password.expose_secret(), "pw8");
                assert!(!format!("{:?}", credentials).contains("pw8"));
            }
            other => panic!("unexpected intent {:?}", other),
        }
    }
}

// =============================================================================
// End to end
// =============================================================================

mod end_to_end_tests {
    use super::*;

    #[test]
    fn test_pause_then_remove_empties_ivl_group() {
        let mut desk = desk(Variant::Diagonal);
        let seeded = desk.get_strategy("IVL Automated", "1").unwrap();
        assert!(seeded.is_active);

        assert_eq!(desk.strategies.toggle_strategy_status("IVL Automated", "1"), Ok(false));
        desk.strategies.remove_strategy("IVL Automated", "1").unwrap();

        assert!(desk.group(StrategyKind::IvlAutomated).unwrap().strategies.is_empty());
    }

    #[test]
    fn test_view_state_does_not_touch_stores() {
        let mut desk = desk(Variant::Fifo);
        let before = desk.snapshot().groups;

        desk.selection.toggle_expansion("1");
        desk.selection.set_section(Section::Brokerage);
        desk.selection.toggle_sidebar();

        assert_eq!(desk.snapshot().groups, before);
        assert!(desk.is_expanded("1"));
    }
}
