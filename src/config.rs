use crate::types::{Firm, Variant};
use std::env;

/// Source of identifiers for new strategies and connections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IdScheme {
    /// Millisecond timestamps, bumped to stay strictly increasing.
    #[default]
    Clock,
    /// Random v4 UUIDs.
    Uuid,
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Which kind fills the third strategy slot.
    pub variant: Variant,
    /// Identifier source.
    pub id_scheme: IdScheme,
    /// Brokerages offered in add forms.
    pub brokerages: Vec<Firm>,
    /// TUI tick interval (ms).
    pub tick_ms: u64,
    /// Log lines kept for the log pane.
    pub log_capacity: usize,
    /// Capacity of the outbound intent channel.
    pub event_capacity: usize,
    /// Default tracing filter when RUST_LOG is unset.
    pub log_filter: String,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let variant = env::var("STRATDESK_VARIANT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or_default();

        let id_scheme = match env::var("STRATDESK_ID_SCHEME")
            .map(|v| v.trim().to_ascii_lowercase())
            .as_deref()
        {
            Ok("uuid") => IdScheme::Uuid,
            _ => IdScheme::Clock,
        };

        // Format: "Tastytrade,OtherFirm". Unknown names are skipped.
        let brokerages = env::var("STRATDESK_BROKERAGES")
            .ok()
            .map(|s| parse_brokerages(&s))
            .filter(|firms| !firms.is_empty())
            .unwrap_or_else(|| Firm::all().to_vec());

        Self {
            variant,
            id_scheme,
            brokerages,
            tick_ms: env::var("STRATDESK_TICK_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(250),
            log_capacity: env::var("STRATDESK_LOG_CAPACITY")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(500),
            event_capacity: env::var("STRATDESK_EVENT_CAPACITY")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|c| *c > 0)
                .unwrap_or(64),
            log_filter: "stratdesk=info".to_string(),
        }
    }

    /// Deterministic configuration for a given variant, ignoring the environment.
    pub fn for_variant(variant: Variant) -> Self {
        Self {
            variant,
            id_scheme: IdScheme::Clock,
            brokerages: Firm::all().to_vec(),
            tick_ms: 250,
            log_capacity: 500,
            event_capacity: 64,
            log_filter: "stratdesk=info".to_string(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

fn parse_brokerages(raw: &str) -> Vec<Firm> {
    let mut firms: Vec<Firm> = Vec::new();
    for firm in raw.split(',').filter_map(|name| name.parse::<Firm>().ok()) {
        if !firms.contains(&firm) {
            firms.push(firm);
        }
    }
    firms
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_for_variant_defaults() {
        let config = Config::for_variant(Variant::Fifo);
        assert_eq!(config.variant, Variant::Fifo);
        assert_eq!(config.id_scheme, IdScheme::Clock);
        assert_eq!(config.brokerages, vec![Firm::Tastytrade]);
        assert_eq!(config.tick_ms, 250);
        assert_eq!(config.event_capacity, 64);
    }

    #[test]
    fn test_parse_brokerages() {
        assert_eq!(parse_brokerages("Tastytrade, tastytrade"), vec![Firm::Tastytrade]);
        assert!(parse_brokerages("Robinhood").is_empty());
        assert!(parse_brokerages("").is_empty());
    }
}
