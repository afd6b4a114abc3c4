//! Command-line arguments

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "stratdesk", version)]
#[command(about = "Terminal dashboard for trading strategy configurations")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Print the seeded model as JSON and exit
    Snapshot,
}
