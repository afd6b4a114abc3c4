//! Startup data. Groups are fixed for the life of the process; only their
//! strategy lists change.

use crate::types::{
    BrokerageConnection, ConnectionStatus, Firm, KindFields, Order, OrderStatus, OrderType, Preset,
    Strategy, StrategyGroup, StrategyKind, Variant,
};

/// Seed strategy groups for a dashboard variant.
pub fn seed_groups(variant: Variant) -> Vec<StrategyGroup> {
    variant
        .kinds()
        .iter()
        .map(|kind| StrategyGroup {
            kind: *kind,
            strategies: vec![seed_strategy(*kind)],
        })
        .collect()
}

/// Seed brokerage connections.
pub fn seed_connections() -> Vec<BrokerageConnection> {
    vec![BrokerageConnection {
        id: "1".to_string(),
        firm: Firm::Tastytrade,
        username: "trader1".to_string(),
        account_number: "12345".to_string(),
        status: ConnectionStatus::Connected,
    }]
}

fn seed_strategy(kind: StrategyKind) -> Strategy {
    match kind {
        StrategyKind::IvlAutomated => Strategy {
            id: "1".to_string(),
            firm: Firm::Tastytrade,
            account_number: "12345".to_string(),
            trade_symbol: "AAPL".to_string(),
            trade_qty: 100,
            is_active: true,
            fields: KindFields::IvlAutomated {
                capital_allocation: 10_000.0,
            },
            orders: vec![
                Order::new("1", OrderType::Entry, OrderStatus::Filled, "AAPL", 50),
                Order::new("2", OrderType::Exit, OrderStatus::Working, "AAPL", 25),
            ],
        },
        StrategyKind::Sdte => Strategy {
            id: "6".to_string(),
            firm: Firm::Tastytrade,
            account_number: "67890".to_string(),
            trade_symbol: "QQQ".to_string(),
            trade_qty: 100,
            is_active: true,
            fields: KindFields::Plain,
            orders: Vec::new(),
        },
        StrategyKind::DiagonalHedge => Strategy {
            id: "8".to_string(),
            firm: Firm::Tastytrade,
            account_number: "89012".to_string(),
            trade_symbol: "/ES".to_string(),
            trade_qty: 1,
            is_active: false,
            fields: KindFields::DiagonalHedge {
                allocation_value: "$40,000".to_string(),
                preset: Preset::Bullish,
            },
            orders: Vec::new(),
        },
        StrategyKind::Fifo => Strategy {
            id: "8".to_string(),
            firm: Firm::Tastytrade,
            account_number: "89012".to_string(),
            trade_symbol: "/ES".to_string(),
            trade_qty: 1,
            is_active: false,
            fields: KindFields::Plain,
            orders: Vec::new(),
        },
    }
}
