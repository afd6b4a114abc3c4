/**
 * Strategy Types
 *
 * Strategy groups, strategies and the kind-specific fields they carry.
 *
 * The group kind decides which optional fields a strategy has. That mapping
 * is encoded in [`KindFields`], so a strategy in the wrong schema cannot be
 * built through the constructors here.
 */

use super::connection::Firm;
use super::order::Order;
use crate::error::DeskError;
use crate::format::{coerce_amount, coerce_qty, normalize_allocation, parse_allocation};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Trading approach a group of strategies shares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StrategyKind {
    #[serde(rename = "IVL Automated")]
    IvlAutomated,
    #[serde(rename = "SDTE")]
    Sdte,
    #[serde(rename = "Diagonal Hedge")]
    DiagonalHedge,
    #[serde(rename = "FIFO")]
    Fifo,
}

impl StrategyKind {
    pub fn all() -> &'static [StrategyKind] {
        &[
            StrategyKind::IvlAutomated,
            StrategyKind::Sdte,
            StrategyKind::DiagonalHedge,
            StrategyKind::Fifo,
        ]
    }

    /// Group name as shown on the dashboard.
    pub fn name(&self) -> &'static str {
        match self {
            StrategyKind::IvlAutomated => "IVL Automated",
            StrategyKind::Sdte => "SDTE",
            StrategyKind::DiagonalHedge => "Diagonal Hedge",
            StrategyKind::Fifo => "FIFO",
        }
    }

    /// Whether the trade quantity is meaningful. Diagonal Hedge sizes by
    /// allocation value instead.
    pub fn uses_trade_qty(&self) -> bool {
        !matches!(self, StrategyKind::DiagonalHedge)
    }

    /// Whether rows of this kind expand into a detail panel with orders.
    pub fn has_detail_panel(&self) -> bool {
        matches!(self, StrategyKind::IvlAutomated | StrategyKind::DiagonalHedge)
    }

    /// Whether a forced rebalance can be requested.
    pub fn supports_rebalance(&self) -> bool {
        matches!(self, StrategyKind::DiagonalHedge)
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for StrategyKind {
    type Err = DeskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        StrategyKind::all()
            .iter()
            .copied()
            .find(|kind| kind.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| DeskError::UnknownKind(s.to_string()))
    }
}

/// Market outlook preset for Diagonal Hedge strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Preset {
    Bearish,
    Cautious,
    #[default]
    Neutral,
    Bullish,
    #[serde(rename = "Super Bullish")]
    SuperBullish,
}

impl Preset {
    pub fn all() -> &'static [Preset] {
        &[
            Preset::Bearish,
            Preset::Cautious,
            Preset::Neutral,
            Preset::Bullish,
            Preset::SuperBullish,
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            Preset::Bearish => "Bearish",
            Preset::Cautious => "Cautious",
            Preset::Neutral => "Neutral",
            Preset::Bullish => "Bullish",
            Preset::SuperBullish => "Super Bullish",
        }
    }

    /// Next preset in display order, wrapping around.
    pub fn next(&self) -> Preset {
        let all = Preset::all();
        let idx = all.iter().position(|p| p == self).unwrap_or(0);
        all[(idx + 1) % all.len()]
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Preset {
    type Err = DeskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Preset::all()
            .iter()
            .copied()
            .find(|preset| preset.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| DeskError::UnknownPreset(s.to_string()))
    }
}

/// Fields that only exist for some strategy kinds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "schema")]
pub enum KindFields {
    IvlAutomated {
        #[serde(rename = "capitalAllocation")]
        capital_allocation: f64,
    },
    DiagonalHedge {
        /// Normalized currency string, e.g. `"$40,000"`. Source of truth for
        /// the allocation; the amount is derived from it.
        #[serde(rename = "allocationValue")]
        allocation_value: String,
        preset: Preset,
    },
    Plain,
}

impl KindFields {
    /// Build the fields for `kind` from draft input.
    pub fn from_draft(kind: StrategyKind, draft: &StrategyDraft) -> Self {
        match kind {
            StrategyKind::IvlAutomated => KindFields::IvlAutomated {
                capital_allocation: coerce_amount(&draft.capital_allocation),
            },
            StrategyKind::DiagonalHedge => KindFields::DiagonalHedge {
                allocation_value: normalize_allocation(&draft.allocation_value),
                preset: draft.preset,
            },
            StrategyKind::Sdte | StrategyKind::Fifo => KindFields::Plain,
        }
    }

    /// Whether these fields are the schema of `kind`.
    pub fn matches(&self, kind: StrategyKind) -> bool {
        match self {
            KindFields::IvlAutomated { .. } => kind == StrategyKind::IvlAutomated,
            KindFields::DiagonalHedge { .. } => kind == StrategyKind::DiagonalHedge,
            KindFields::Plain => matches!(kind, StrategyKind::Sdte | StrategyKind::Fifo),
        }
    }
}

/// One configured trading instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Strategy {
    pub id: String,
    pub firm: Firm,
    pub account_number: String,
    pub trade_symbol: String,
    pub trade_qty: u64,
    pub is_active: bool,
    pub fields: KindFields,
    pub orders: Vec<Order>,
}

impl Strategy {
    /// Create an inactive strategy with no orders from draft input.
    pub fn from_draft(id: String, kind: StrategyKind, draft: &StrategyDraft) -> Self {
        Self {
            id,
            firm: draft.firm,
            account_number: draft.account_number.clone(),
            trade_symbol: draft.trade_symbol.clone(),
            trade_qty: coerce_qty(&draft.trade_qty),
            is_active: false,
            fields: KindFields::from_draft(kind, draft),
            orders: Vec::new(),
        }
    }

    pub fn capital_allocation(&self) -> Option<f64> {
        match self.fields {
            KindFields::IvlAutomated { capital_allocation } => Some(capital_allocation),
            _ => None,
        }
    }

    pub fn allocation_value(&self) -> Option<&str> {
        match &self.fields {
            KindFields::DiagonalHedge { allocation_value, .. } => Some(allocation_value),
            _ => None,
        }
    }

    /// Whole-dollar amount encoded by the allocation value.
    pub fn allocation_amount(&self) -> Option<u64> {
        self.allocation_value().map(parse_allocation)
    }

    pub fn preset(&self) -> Option<Preset> {
        match self.fields {
            KindFields::DiagonalHedge { preset, .. } => Some(preset),
            _ => None,
        }
    }

    /// Number of orders still pending or working.
    pub fn open_order_count(&self) -> usize {
        self.orders.iter().filter(|o| o.status.is_open()).count()
    }
}

/// A named collection of strategies sharing one kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StrategyGroup {
    pub kind: StrategyKind,
    pub strategies: Vec<Strategy>,
}

impl StrategyGroup {
    pub fn new(kind: StrategyKind) -> Self {
        Self {
            kind,
            strategies: Vec::new(),
        }
    }

    pub fn name(&self) -> &'static str {
        self.kind.name()
    }

    pub fn get(&self, strategy_id: &str) -> Option<&Strategy> {
        self.strategies.iter().find(|s| s.id == strategy_id)
    }

    pub fn get_mut(&mut self, strategy_id: &str) -> Option<&mut Strategy> {
        self.strategies.iter_mut().find(|s| s.id == strategy_id)
    }

    pub fn active_count(&self) -> usize {
        self.strategies.iter().filter(|s| s.is_active).count()
    }

    pub fn total_count(&self) -> usize {
        self.strategies.len()
    }
}

/// Raw form input for a new strategy.
///
/// Numeric fields stay as typed text until the strategy is created; see
/// [`Strategy::from_draft`] for how they are coerced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StrategyDraft {
    pub firm: Firm,
    pub account_number: String,
    pub trade_symbol: String,
    pub trade_qty: String,
    pub capital_allocation: String,
    pub allocation_value: String,
    pub preset: Preset,
}

impl Default for StrategyDraft {
    fn default() -> Self {
        Self {
            firm: Firm::default(),
            account_number: String::new(),
            trade_symbol: String::new(),
            trade_qty: "0".to_string(),
            capital_allocation: "0".to_string(),
            allocation_value: "$0".to_string(),
            preset: Preset::default(),
        }
    }
}

/// Partial changes merged into the edit buffer.
/// Fields left `None` are untouched; fields the strategy's kind lacks are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StrategyPatch {
    pub firm: Option<Firm>,
    pub account_number: Option<String>,
    pub trade_symbol: Option<String>,
    pub trade_qty: Option<String>,
    pub is_active: Option<bool>,
    pub capital_allocation: Option<String>,
    pub allocation_value: Option<String>,
    pub preset: Option<Preset>,
}

impl StrategyPatch {
    /// Apply this patch to a strategy.
    pub fn apply_to(&self, strategy: &mut Strategy) {
        if let Some(firm) = self.firm {
            strategy.firm = firm;
        }
        if let Some(ref account) = self.account_number {
            strategy.account_number = account.clone();
        }
        if let Some(ref symbol) = self.trade_symbol {
            strategy.trade_symbol = symbol.clone();
        }
        if let Some(ref qty) = self.trade_qty {
            strategy.trade_qty = coerce_qty(qty);
        }
        if let Some(active) = self.is_active {
            strategy.is_active = active;
        }

        match &mut strategy.fields {
            KindFields::IvlAutomated { capital_allocation } => {
                if let Some(ref raw) = self.capital_allocation {
                    *capital_allocation = coerce_amount(raw);
                }
            }
            KindFields::DiagonalHedge {
                allocation_value,
                preset,
            } => {
                if let Some(ref raw) = self.allocation_value {
                    *allocation_value = normalize_allocation(raw);
                }
                if let Some(p) = self.preset {
                    *preset = p;
                }
            }
            KindFields::Plain => {}
        }
    }
}
