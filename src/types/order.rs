use crate::error::DeskError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Whether an order opens or closes a position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderType {
    Entry,
    Exit,
}

impl fmt::Display for OrderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderType::Entry => write!(f, "Entry"),
            OrderType::Exit => write!(f, "Exit"),
        }
    }
}

impl FromStr for OrderType {
    type Err = DeskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "entry" => Ok(OrderType::Entry),
            "exit" => Ok(OrderType::Exit),
            _ => Err(DeskError::UnknownOrderType(s.to_string())),
        }
    }
}

/// Order lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderStatus {
    /// Accepted locally, not yet at the broker
    Pending,
    /// Live at the broker
    Working,
    Filled,
    Cancelled,
}

impl OrderStatus {
    /// Whether the order can still change.
    pub fn is_open(&self) -> bool {
        matches!(self, OrderStatus::Pending | OrderStatus::Working)
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderStatus::Pending => write!(f, "Pending"),
            OrderStatus::Working => write!(f, "Working"),
            OrderStatus::Filled => write!(f, "Filled"),
            OrderStatus::Cancelled => write!(f, "Cancelled"),
        }
    }
}

impl FromStr for OrderStatus {
    type Err = DeskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(OrderStatus::Pending),
            "working" => Ok(OrderStatus::Working),
            "filled" => Ok(OrderStatus::Filled),
            "cancelled" | "canceled" => Ok(OrderStatus::Cancelled),
            _ => Err(DeskError::UnknownOrderStatus(s.to_string())),
        }
    }
}

/// A child order of a strategy. Read-only from the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: String,
    #[serde(rename = "type")]
    pub order_type: OrderType,
    pub status: OrderStatus,
    pub symbol: String,
    pub qty: u64,
}

impl Order {
    pub fn new(
        id: impl Into<String>,
        order_type: OrderType,
        status: OrderStatus,
        symbol: impl Into<String>,
        qty: u64,
    ) -> Self {
        Self {
            id: id.into(),
            order_type,
            status,
            symbol: symbol.into(),
            qty,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_serialization_uses_type_key() {
        let order = Order::new("1", OrderType::Entry, OrderStatus::Filled, "AAPL", 50);
        let json = serde_json::to_string(&order).unwrap();
        assert_eq!(
            json,
            r#"{"id":"1","type":"Entry","status":"Filled","symbol":"AAPL","qty":50}"#
        );
    }

    #[test]
    fn test_order_status_open() {
        assert!(OrderStatus::Pending.is_open());
        assert!(OrderStatus::Working.is_open());
        assert!(!OrderStatus::Filled.is_open());
        assert!(!OrderStatus::Cancelled.is_open());
    }

    #[test]
    fn test_parse_order_enums() {
        assert_eq!("exit".parse::<OrderType>().unwrap(), OrderType::Exit);
        assert_eq!("Canceled".parse::<OrderStatus>().unwrap(), OrderStatus::Cancelled);
        assert!("Open".parse::<OrderStatus>().is_err());
    }
}
