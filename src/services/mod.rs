pub mod allocation;
pub mod connection_store;
pub mod dashboard;
pub mod ids;
pub mod notifier;
pub mod seed;
pub mod selection;
pub mod strategy_store;

pub use allocation::AllocationPanel;
pub use connection_store::ConnectionStore;
pub use dashboard::{Dashboard, DashboardSnapshot};
pub use ids::{ClockIds, IdGenerator, SequentialIds, UuidIds};
pub use notifier::{log_intents, DeskIntent, IntentNotifier};
pub use selection::{expandable, SelectionState};
pub use strategy_store::{EditBuffer, StrategyStore};
