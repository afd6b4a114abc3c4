pub mod connection;
pub mod order;
pub mod section;
pub mod strategy;

pub use connection::*;
pub use order::*;
pub use section::*;
pub use strategy::*;
