//! # Observability & Tracing
//!
//! The [`setup_tracing`] function initializes structured logging with the `tracing` crate.
//!
//! ## Configuration
//!
//! Output uses the compact format without the crate/module prefix (`with_target(false)`);
//! every event carries the barista and customer as structured fields instead.
//! Verbosity comes from the `RUST_LOG` environment variable.
//!
//! ## What Gets Traced
//!
//! - **Shop lifecycle** (`info`): shop open, ordering closed, all baristas done
//! - **Barista lifecycle** (`info`): started, intake closed, done for the day
//! - **Orders** (`info`): accepted by a barista, coffee ready
//! - **Pipeline steps** (`debug`): every event a barista consumes, grind and brew sizes
//! - **Equipment** (`trace`): simulated processing times
//! - **Refusals** (`warn`): orders through a released kiosk or into a closed shop
//!
//! ## Usage Examples
//!
//! ```bash
//! # Order flow only
//! RUST_LOG=info cargo run
//!
//! # Every pipeline step
//! RUST_LOG=debug cargo run
//!
//! # Pool check-ins and processing times
//! RUST_LOG=trace cargo run
//! ```
//!
//! **With `RUST_LOG=info`**, one customer:
//!
//! ```text
//! INFO Shop open kiosks=1 baristas=1 queue_capacity=10
//! INFO Barista started barista=Barista-0 capacity=5 admission=Capped
//! INFO Working on order barista=Barista-0 customer=Customer-0 item=Regular
//! INFO Coffee is ready barista=Barista-0 customer=Customer-0 active=0
//! INFO Ordering closed
//! INFO Intake closed, finishing up barista=Barista-0 active=0
//! INFO Done for the day barista=Barista-0
//! INFO All baristas done
//! ```

/// Initializes the tracing subscriber for the application.
///
/// Call once, at startup.
pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .init();
}
