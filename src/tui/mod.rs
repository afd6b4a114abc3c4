//! Terminal UI driving the dashboard.

mod app;
mod connections;
mod events;
pub mod form;
mod logs;
mod state;
mod strategies;
mod theme;

pub use app::{run_tui, App};
pub use events::{Event, EventHandler};
pub use state::{LogBuffer, LogMakeWriter};
pub use theme::Theme;
