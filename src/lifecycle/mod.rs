//! Shop orchestration and lifecycle management.
//!
//! # Main Components
//!
//! - [`CoffeeShop`] - Owns the pools and baristas, hands out kiosks, drains on close
//! - [`ShopConfig`] / [`SimulationConfig`] - Sizing for the shop and the demo simulation
//! - [`setup_tracing`] - Initializes the tracing/logging infrastructure

pub mod coffee_shop;
pub mod config;
pub mod tracing;

pub use coffee_shop::*;
pub use config::*;
pub use self::tracing::*;
