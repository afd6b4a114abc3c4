//! Outbound intents for collaborators outside the dashboard core.
//!
//! Sending is fire-and-forget: the stores never wait on a receiver, and a send
//! with nobody listening is not an error.

use crate::types::{Credentials, Firm, StrategyKind};
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

/// Something the dashboard asks an external system to do.
#[derive(Debug, Clone, PartialEq)]
pub enum DeskIntent {
    /// Rebalance a strategy's hedge now.
    ForceRebalance {
        group: StrategyKind,
        strategy_id: String,
    },
    /// Close a strategy's position.
    ClosePosition {
        group: StrategyKind,
        strategy_id: String,
        /// Only work closing orders; do not re-enter
        closing_only: bool,
    },
    /// Size the next entry with this amount.
    UpdateNextEntryAllocation { amount: u64 },
    /// Authenticate a newly registered connection.
    Authenticate {
        connection_id: String,
        firm: Firm,
        credentials: Credentials,
    },
}

/// Broadcasts intents to any number of subscribers.
#[derive(Clone)]
pub struct IntentNotifier {
    tx: broadcast::Sender<DeskIntent>,
}

impl IntentNotifier {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<DeskIntent> {
        self.tx.subscribe()
    }

    /// Send an intent. Returns how many subscribers received it.
    pub fn send(&self, intent: DeskIntent) -> usize {
        match self.tx.send(intent) {
            Ok(receivers) => receivers,
            Err(_) => {
                debug!("No receivers for desk intent");
                0
            }
        }
    }
}

/// Log every intent until the notifier is dropped.
///
/// Stands in for the brokerage and authentication collaborators.
pub async fn log_intents(mut rx: broadcast::Receiver<DeskIntent>) {
    loop {
        match rx.recv().await {
            Ok(DeskIntent::ForceRebalance { group, strategy_id }) => {
                info!("Force rebalance requested for {} strategy {}", group, strategy_id);
            }
            Ok(DeskIntent::ClosePosition {
                group,
                strategy_id,
                closing_only,
            }) => {
                info!(
                    "Close position requested for {} strategy {} (closing only: {})",
                    group, strategy_id, closing_only
                );
            }
            Ok(DeskIntent::UpdateNextEntryAllocation { amount }) => {
                info!("Next entry allocation set to {}", amount);
            }
            Ok(DeskIntent::Authenticate {
                connection_id,
                firm,
                credentials,
            }) => {
                info!(
                    "Authentication requested for {} connection {} as {}",
                    firm, connection_id, credentials.username
                );
            }
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                warn!("Intent log lagged, skipped {} intents", skipped);
            }
            Err(broadcast::error::RecvError::Closed) => break,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_send_without_receivers() {
        let notifier = IntentNotifier::new(4);
        assert_eq!(notifier.send(DeskIntent::UpdateNextEntryAllocation { amount: 1 }), 0);
    }

    #[tokio::test]
    async fn test_subscriber_receives_intent() {
        let notifier = IntentNotifier::new(4);
        let mut rx = notifier.subscribe();

        let sent = notifier.send(DeskIntent::ForceRebalance {
            group: StrategyKind::DiagonalHedge,
            strategy_id: "8".to_string(),
        });
        assert_eq!(sent, 1);

        let got = rx.recv().await.unwrap();
        assert_eq!(
            got,
            DeskIntent::ForceRebalance {
                group: StrategyKind::DiagonalHedge,
                strategy_id: "8".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn test_log_intents_stops_when_closed() {
        let notifier = IntentNotifier::new(4);
        let rx = notifier.subscribe();
        notifier.send(DeskIntent::UpdateNextEntryAllocation { amount: 2500 });
        drop(notifier);
        log_intents(rx).await;
    }
}
