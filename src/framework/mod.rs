//! Generic coordination primitives.
//!
//! This module provides the blocking building blocks the shop is assembled from.
//!
//! # Main Components
//!
//! - [`ResourcePool`] - Blocking multiset of interchangeable resources, with [`PoolGuard`] for scoped checkout
//! - [`SharedPool`] - The `{put, take}` seam shared by resource and kiosk pools
//! - [`OrderQueue`] - Bounded, closable multi-producer/multi-consumer queue
//!
//! # Testing
//!
//! See [`mock`] for instant grinders and brewers to drive the pipeline without sleeping.

pub mod mock;
pub mod pool;
pub mod queue;

pub use pool::*;
pub use queue::*;
