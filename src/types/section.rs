use super::strategy::StrategyKind;
use crate::error::DeskError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Which kind fills the third strategy slot of the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    #[default]
    Diagonal,
    Fifo,
}

impl Variant {
    pub fn third_kind(&self) -> StrategyKind {
        match self {
            Variant::Diagonal => StrategyKind::DiagonalHedge,
            Variant::Fifo => StrategyKind::Fifo,
        }
    }

    /// Strategy kinds seeded for this variant, in display order.
    pub fn kinds(&self) -> [StrategyKind; 3] {
        [StrategyKind::IvlAutomated, StrategyKind::Sdte, self.third_kind()]
    }
}

impl FromStr for Variant {
    type Err = DeskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "diagonal" | "diagonal hedge" | "diagonal_hedge" => Ok(Variant::Diagonal),
            "fifo" => Ok(Variant::Fifo),
            _ => Err(DeskError::UnknownKind(s.to_string())),
        }
    }
}

/// Dashboard section. Display selector only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Section {
    #[default]
    Ivl,
    Sdte,
    Hedge,
    Brokerage,
}

impl Section {
    pub fn all() -> [Section; 4] {
        [Section::Ivl, Section::Sdte, Section::Hedge, Section::Brokerage]
    }

    /// Strategy group shown by this section, if any.
    pub fn group_kind(&self, variant: Variant) -> Option<StrategyKind> {
        match self {
            Section::Ivl => Some(StrategyKind::IvlAutomated),
            Section::Sdte => Some(StrategyKind::Sdte),
            Section::Hedge => Some(variant.third_kind()),
            Section::Brokerage => None,
        }
    }

    pub fn title(&self, variant: Variant) -> &'static str {
        match self.group_kind(variant) {
            Some(kind) => kind.name(),
            None => "Brokerage Connections",
        }
    }

    /// Shortcut key.
    pub fn key(&self) -> char {
        match self {
            Section::Ivl => '1',
            Section::Sdte => '2',
            Section::Hedge => '3',
            Section::Brokerage => '4',
        }
    }
}

impl FromStr for Section {
    type Err = DeskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ivl" => Ok(Section::Ivl),
            "sdte" => Ok(Section::Sdte),
            "hedge" | "diagonal" | "fifo" => Ok(Section::Hedge),
            "brokerage" => Ok(Section::Brokerage),
            _ => Err(DeskError::UnknownSection(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_section_titles_follow_variant() {
        assert_eq!(Section::Hedge.title(Variant::Diagonal), "Diagonal Hedge");
        assert_eq!(Section::Hedge.title(Variant::Fifo), "FIFO");
        assert_eq!(Section::Brokerage.title(Variant::Fifo), "Brokerage Connections");
        assert_eq!(Section::Brokerage.group_kind(Variant::Diagonal), None);
    }

    #[test]
    fn test_section_parse() {
        assert_eq!("diagonal".parse::<Section>().unwrap(), Section::Hedge);
        assert_eq!("Brokerage".parse::<Section>().unwrap(), Section::Brokerage);
        assert!(matches!("logs".parse::<Section>(), Err(DeskError::UnknownSection(_))));
    }

    #[test]
    fn test_variant_kinds() {
        assert_eq!(Variant::Fifo.kinds()[2], StrategyKind::Fifo);
        assert_eq!("Diagonal Hedge".parse::<Variant>().unwrap(), Variant::Diagonal);
    }
}
