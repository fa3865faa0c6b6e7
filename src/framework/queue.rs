//! # Order Queue
//!
//! A bounded multi-producer/multi-consumer queue with a `closed` flag, shared
//! by every kiosk (producers) and every barista (consumers).
//!
//! Once closed, `push` is rejected and `pop` drains what is left before
//! returning `None`. Both ends are cancel safe: an item only leaves the queue
//! inside a lock after a wake-up, never across an await point, so `pop` can
//! sit in a `select!` next to other inputs.

use std::collections::VecDeque;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::Notify;
use tracing::debug;

use crate::error::ShopError;

struct QueueState<T> {
    items: VecDeque<T>,
    closed: bool,
}

struct QueueInner<T> {
    state: Mutex<QueueState<T>>,
    capacity: usize,
    not_empty: Notify,
    not_full: Notify,
}

impl<T> QueueInner<T> {
    fn lock(&self) -> MutexGuard<'_, QueueState<T>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Handle to a shared bounded queue. Clones share the same queue.
pub struct OrderQueue<T> {
    inner: Arc<QueueInner<T>>,
}

impl<T> Clone for OrderQueue<T> {
    fn clone(&self) -> Self {
        Self { inner: self.inner.clone() }
    }
}

impl<T> fmt::Debug for OrderQueue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.inner.lock();
        f.debug_struct("OrderQueue")
            .field("len", &state.items.len())
            .field("capacity", &self.inner.capacity)
            .field("closed", &state.closed)
            .finish()
    }
}

impl<T: Send> OrderQueue<T> {
    /// Creates an open queue holding at most `capacity` items (at least one).
    pub fn new(capacity: usize) -> Self {
        Self {
            inner: Arc::new(QueueInner {
                state: Mutex::new(QueueState { items: VecDeque::new(), closed: false }),
                capacity: capacity.max(1),
                not_empty: Notify::new(),
                not_full: Notify::new(),
            }),
        }
    }

    /// Appends an item, waiting while the queue is full.
    ///
    /// Fails with [`ShopError::Closed`] if the queue is closed before or
    /// while waiting; the item is dropped in that case.
    pub async fn push(&self, item: T) -> Result<(), ShopError> {
        loop {
            let notified = self.inner.not_full.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();
            {
                let mut state = self.inner.lock();
                if state.closed {
                    return Err(ShopError::Closed);
                }
                if state.items.len() < self.inner.capacity {
                    state.items.push_back(item);
                    drop(state);
                    self.inner.not_empty.notify_waiters();
                    return Ok(());
                }
            }
            notified.await;
        }
    }

    /// Removes the oldest item, waiting while the queue is empty.
    ///
    /// Returns `None` once the queue is closed and drained.
    pub async fn pop(&self) -> Option<T> {
        loop {
            let notified = self.inner.not_empty.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();
            {
                let mut state = self.inner.lock();
                if let Some(item) = state.items.pop_front() {
                    drop(state);
                    self.inner.not_full.notify_waiters();
                    return Some(item);
                }
                if state.closed {
                    return None;
                }
            }
            notified.await;
        }
    }

    /// Stops accepting items and wakes everyone waiting on either end.
    pub fn close(&self) {
        {
            let mut state = self.inner.lock();
            if state.closed {
                return;
            }
            state.closed = true;
            debug!(pending = state.items.len(), "Order queue closed");
        }
        self.inner.not_empty.notify_waiters();
        self.inner.not_full.notify_waiters();
    }

    pub fn is_closed(&self) -> bool {
        self.inner.lock().closed
    }

    pub fn len(&self) -> usize {
        self.inner.lock().items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.inner.capacity
    }
}
