//! Barista workers and how they admit new orders.

pub mod worker;

pub use worker::*;

use clap::ValueEnum;

/// What a barista's order capacity means.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum AdmissionPolicy {
    /// Hard cap: the barista stops pulling new orders while it already has
    /// `capacity` orders in flight. Waiting orders stay in the shared queue
    /// where another barista can pick them up.
    #[default]
    Capped,
    /// Soft bound: capacity only sizes the barista's event inbox. The barista
    /// keeps accepting orders and its sub-tasks wait for inbox space.
    Buffered,
}
