//! # Blocking Resource Pool
//!
//! A [`ResourcePool`] is a multiset of interchangeable resources guarded by a
//! single monitor (a `Mutex` for the collection plus a [`Notify`] for the
//! waiters). Tasks check resources out with [`ResourcePool::take`] or the
//! scoped [`ResourcePool::acquire`], and check them back in with
//! [`ResourcePool::put`].
//!
//! ## Conservation
//!
//! Every resource is either in the available set or checked out by exactly
//! one task. [`PoolStats`] snapshots both counts under the monitor, so
//! `available + checked_out == capacity` at every observable instant.
//!
//! ## Waiting
//!
//! `take` re-checks the collection after every wake-up. A returned resource
//! wakes at most one waiter; if that waiter has gone away the notification is
//! handed to the next one by `Notify` itself.

use std::collections::VecDeque;
use std::fmt;
use std::ops::{Deref, DerefMut};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use tokio::sync::Notify;
use tracing::{debug, trace};

/// The `{put, take}` seam shared by every blocking pool in the shop.
#[async_trait]
pub trait SharedPool<T: Send>: Send + Sync {
    /// Returns an item to the pool and wakes one waiter.
    fn put(&self, item: T);

    /// Waits until an item is available and checks it out.
    async fn take(&self) -> T;
}

/// Point-in-time view of a pool's accounting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolStats {
    pub available: usize,
    pub checked_out: usize,
    pub capacity: usize,
}

struct PoolState<T> {
    items: VecDeque<T>,
    checked_out: usize,
    capacity: usize,
}

struct PoolInner<T> {
    state: Mutex<PoolState<T>>,
    available: Notify,
}

impl<T> PoolInner<T> {
    fn lock(&self) -> MutexGuard<'_, PoolState<T>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn check_in(&self, item: T) {
        {
            let mut state = self.lock();
            state.items.push_back(item);
            if state.checked_out > 0 {
                state.checked_out -= 1;
            } else {
                // Nothing was out, so this is a new resource rather than a return.
                state.capacity += 1;
            }
            trace!(available = state.items.len(), checked_out = state.checked_out, "Checked in");
        }
        self.available.notify_one();
    }
}

/// A blocking pool of interchangeable resources.
///
/// Cloning a pool yields another handle to the same resources.
pub struct ResourcePool<T> {
    inner: Arc<PoolInner<T>>,
}

impl<T> Clone for ResourcePool<T> {
    fn clone(&self) -> Self {
        Self { inner: self.inner.clone() }
    }
}

impl<T: Send + 'static> ResourcePool<T> {
    /// Creates a pool holding `resources`; its capacity is their count.
    pub fn new(resources: impl IntoIterator<Item = T>) -> Self {
        let items: VecDeque<T> = resources.into_iter().collect();
        let capacity = items.len();
        Self {
            inner: Arc::new(PoolInner {
                state: Mutex::new(PoolState { items, checked_out: 0, capacity }),
                available: Notify::new(),
            }),
        }
    }

    /// Grows the pool by one resource.
    pub fn add(&self, resource: T) {
        {
            let mut state = self.inner.lock();
            state.items.push_back(resource);
            state.capacity += 1;
            debug!(capacity = state.capacity, "Resource added to pool");
        }
        self.inner.available.notify_one();
    }

    /// Checks a resource back in and wakes one waiter.
    pub fn put(&self, resource: T) {
        self.inner.check_in(resource);
    }

    /// Waits until a resource is available and removes it from the pool.
    ///
    /// The caller owns the resource until it hands it back with [`put`](Self::put).
    pub async fn take(&self) -> T {
        loop {
            // A `put` between the check and the await leaves a permit behind.
            let notified = self.inner.available.notified();
            {
                let mut state = self.inner.lock();
                if let Some(resource) = state.items.pop_front() {
                    state.checked_out += 1;
                    return resource;
                }
            }
            notified.await;
        }
    }

    /// Scoped checkout: the resource goes back to the pool when the guard drops.
    pub async fn acquire(&self) -> PoolGuard<T> {
        let resource = self.take().await;
        PoolGuard { resource: Some(resource), pool: self.inner.clone() }
    }

    /// Returns the current accounting, read under the monitor.
    pub fn stats(&self) -> PoolStats {
        let state = self.inner.lock();
        PoolStats {
            available: state.items.len(),
            checked_out: state.checked_out,
            capacity: state.capacity,
        }
    }
}

#[async_trait]
impl<T: Send + 'static> SharedPool<T> for ResourcePool<T> {
    fn put(&self, item: T) {
        ResourcePool::put(self, item);
    }

    async fn take(&self) -> T {
        ResourcePool::take(self).await
    }
}

/// Exclusive, temporary ownership of one pooled resource.
///
/// Dropping the guard checks the resource back in, which also happens while
/// unwinding out of a panicking processing step.
pub struct PoolGuard<T> {
    resource: Option<T>,
    pool: Arc<PoolInner<T>>,
}

impl<T> PoolGuard<T> {
    /// Returns the resource to its pool now.
    pub fn release(self) {
        drop(self);
    }
}

impl<T> Deref for PoolGuard<T> {
    type Target = T;

    fn deref(&self) -> &T {
        match &self.resource {
            Some(resource) => resource,
            None => unreachable!("resource is only taken on drop"),
        }
    }
}

impl<T> DerefMut for PoolGuard<T> {
    fn deref_mut(&mut self) -> &mut T {
        match &mut self.resource {
            Some(resource) => resource,
            None => unreachable!("resource is only taken on drop"),
        }
    }
}

impl<T> Drop for PoolGuard<T> {
    fn drop(&mut self) {
        if let Some(resource) = self.resource.take() {
            self.pool.check_in(resource);
        }
    }
}

impl<T> fmt::Debug for PoolGuard<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PoolGuard").finish_non_exhaustive()
    }
}
