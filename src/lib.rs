//! stratdesk - Trading strategy dashboard state model
//!
//! Strategy groups, brokerage connections and view selection, driven by a
//! terminal UI. Side effects outside the model go out as [`services::DeskIntent`]s.

pub mod cli;
pub mod config;
pub mod error;
pub mod format;
pub mod services;
pub mod tui;
pub mod types;

pub use config::Config;
pub use error::{DeskError, ErrorClass, Result};
pub use services::Dashboard;
