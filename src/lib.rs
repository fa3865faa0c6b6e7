//! # Coffee Shop
//!
//! > **A concurrency-coordination engine, dressed as a coffee shop.**
//!
//! Orders arrive through a few ordering kiosks, wait in a shared queue, and are
//! driven by barista workers through two scarce, interchangeable resources:
//! grinders and then brewers. Closing the shop stops intake and lets every
//! accepted order finish.
//!
//! ## 🏗️ Design
//!
//! ### Single owner per order
//! Each barista runs one dispatch loop (a Tokio task). It is the only code that
//! moves its orders through
//! `Submitted → ReadyToGrind → Grinding → ReadyToBrew → Brewing → Complete`.
//! Anything that waits (checking out equipment, grinding, brewing) runs in a
//! short-lived sub-task that reports back as an [`OrderEvent`](model::OrderEvent)
//! into the barista's private `mpsc` inbox.
//!
//! ### Explicit shared state
//! Grinders and brewers live in [`ResourcePool`](framework::ResourcePool)s whose
//! handles are passed to every barista at construction. A checked-out resource
//! is owned by exactly one sub-task and goes back to its pool when its
//! [`PoolGuard`](framework::PoolGuard) drops.
//!
//! ### Absent values, not faults
//! Ordering through a released kiosk or arriving after closing time yields
//! `None`. The `try_` variants return [`ShopError`](error::ShopError) for
//! callers that need the reason.
//!
//! ## 🗺️ Module Tour
//!
//! - [`framework`]: blocking pool, bounded order queue, test doubles
//! - [`model`]: menu, orders, order events
//! - [`equipment`]: grinder and brewer contracts plus simulated implementations
//! - [`kiosk`]: validity-gated ordering endpoints and their pool
//! - [`barista`]: the worker dispatch loop and admission policy
//! - [`lifecycle`]: the [`CoffeeShop`](lifecycle::CoffeeShop) coordinator, config, tracing
//!
//! ## 🚀 Quick Start
//!
//! ```bash
//! # Ten customers, two baristas
//! RUST_LOG=info cargo run -- --customer-count 10 --barista-count 2
//!
//! # Same thing from the environment, with a repeatable run
//! RUST_LOG=info COFFEE_CUSTOMERS=10 COFFEE_BARISTAS=2 COFFEE_SEED=1 cargo run
//! ```
//!
//! ### Running Tests
//!
//! ```bash
//! cargo test
//! ```

pub mod barista;
pub mod equipment;
pub mod error;
pub mod framework;
pub mod kiosk;
pub mod lifecycle;
pub mod model;
