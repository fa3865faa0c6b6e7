//! Ordering kiosks: the validity-gated way customers put orders into the shop.

pub mod pool;

pub use pool::*;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::{debug, instrument, warn};

use crate::error::ShopError;
use crate::framework::OrderQueue;
use crate::model::{MenuItem, Order};

/// An ordering endpoint with write access to the shop's order queue.
///
/// A kiosk is only usable between being handed out by the [`KioskPool`] and
/// being given back to it. Customers hold it as an `Arc<Kiosk>`, so a clone
/// kept past [`CoffeeShop::release_kiosk`](crate::lifecycle::CoffeeShop::release_kiosk)
/// still exists but refuses to take orders.
#[derive(Debug)]
pub struct Kiosk {
    id: usize,
    valid: AtomicBool,
    orders: OrderQueue<Arc<Order>>,
}

impl Kiosk {
    /// Creates a valid kiosk writing to `orders`.
    pub fn new(id: usize, orders: OrderQueue<Arc<Order>>) -> Self {
        Self { id, valid: AtomicBool::new(true), orders }
    }

    pub fn id(&self) -> usize {
        self.id
    }

    pub fn is_valid(&self) -> bool {
        self.valid.load(Ordering::SeqCst)
    }

    pub(crate) fn set_validity(&self, valid: bool) {
        self.valid.store(valid, Ordering::SeqCst);
    }

    /// Places an order, or returns `None` if the kiosk was released or the
    /// shop has closed.
    pub async fn create_order(&self, customer: &str, item: MenuItem) -> Option<Arc<Order>> {
        self.try_create_order(customer, item).await.ok()
    }

    /// Places an order and reports why it was refused.
    ///
    /// Waits if the order queue is full.
    #[instrument(skip(self, item), fields(kiosk = self.id, item = %item.name))]
    pub async fn try_create_order(
        &self,
        customer: &str,
        item: MenuItem,
    ) -> Result<Arc<Order>, ShopError> {
        if !self.is_valid() {
            warn!("Order refused, kiosk was released");
            return Err(ShopError::InvalidKiosk);
        }

        let order = Arc::new(Order::new(customer, item));
        self.orders.push(order.clone()).await.inspect_err(|e| {
            warn!(error = %e, "Order refused");
        })?;

        debug!("Order submitted");
        Ok(order)
    }
}
