//! Grinders, brewers and the pools that share them between baristas.

pub mod brewer;
pub mod grinder;

pub use brewer::*;
pub use grinder::*;

use crate::framework::{PoolGuard, ResourcePool};

/// Shared pool of grinders.
pub type GrinderPool = ResourcePool<Box<dyn Grinder>>;
/// Shared pool of brewers.
pub type BrewerPool = ResourcePool<Box<dyn Brewer>>;
/// A grinder checked out of a [`GrinderPool`].
pub type GrinderGuard = PoolGuard<Box<dyn Grinder>>;
/// A brewer checked out of a [`BrewerPool`].
pub type BrewerGuard = PoolGuard<Box<dyn Brewer>>;

/// Builds a grinder pool from any grinders.
pub fn grinder_pool<G: Grinder + 'static>(grinders: impl IntoIterator<Item = G>) -> GrinderPool {
    ResourcePool::new(grinders.into_iter().map(|g| Box::new(g) as Box<dyn Grinder>))
}

/// Builds a brewer pool from any brewers.
pub fn brewer_pool<B: Brewer + 'static>(brewers: impl IntoIterator<Item = B>) -> BrewerPool {
    ResourcePool::new(brewers.into_iter().map(|b| Box::new(b) as Box<dyn Brewer>))
}
