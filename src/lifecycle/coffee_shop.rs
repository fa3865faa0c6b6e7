use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, instrument};

use crate::barista::{AdmissionPolicy, Barista};
use crate::equipment::{BrewerPool, GrinderPool};
use crate::error::ShopError;
use crate::framework::{OrderQueue, SharedPool};
use crate::kiosk::{Kiosk, KioskPool};
use crate::lifecycle::ShopConfig;
use crate::model::{Menu, Order};

/// The shop coordinator.
///
/// `CoffeeShop` is responsible for:
/// - **Startup**: spawning one task per barista and filling the kiosk pool
/// - **Intake**: handing kiosks to customers and taking them back
/// - **Shutdown**: closing the order queue and waiting for every barista to drain
///
/// # Example
///
/// ```ignore
/// let shop = CoffeeShop::new(menu, 1, 1, 5, grinders, brewers);
///
/// let kiosk = shop.acquire_kiosk().await.expect("shop is open");
/// let order = kiosk.create_order("Customer-0", item).await.expect("kiosk is valid");
/// shop.release_kiosk(kiosk);
///
/// let coffee = order.await_completion().await;
/// shop.close().await?;
/// ```
///
/// Must be created inside a Tokio runtime.
pub struct CoffeeShop {
    menu: Menu,
    kiosks: KioskPool,
    orders: OrderQueue<Arc<Order>>,
    closed: watch::Sender<bool>,
    next_kiosk_id: AtomicUsize,
    /// Barista task handles, emptied by the first `close`.
    baristas: Mutex<Vec<JoinHandle<()>>>,
}

impl CoffeeShop {
    /// Opens a shop with `kiosk_count` kiosks and `barista_count` baristas,
    /// each working on up to `max_barista_orders` orders at once.
    pub fn new(
        menu: Menu,
        kiosk_count: usize,
        barista_count: usize,
        max_barista_orders: usize,
        grinders: GrinderPool,
        brewers: BrewerPool,
    ) -> Self {
        let config = ShopConfig {
            kiosks: kiosk_count,
            baristas: barista_count,
            barista_capacity: max_barista_orders,
            queue_capacity: None,
            admission: AdmissionPolicy::default(),
        };
        Self::open(menu, &config, grinders, brewers)
    }

    /// Opens a shop from a validated configuration.
    pub fn with_config(
        menu: Menu,
        config: ShopConfig,
        grinders: GrinderPool,
        brewers: BrewerPool,
    ) -> Result<Self, ShopError> {
        config.validate()?;
        Ok(Self::open(menu, &config, grinders, brewers))
    }

    fn open(menu: Menu, config: &ShopConfig, grinders: GrinderPool, brewers: BrewerPool) -> Self {
        let orders = OrderQueue::new(config.order_queue_capacity());
        let (closed, _) = watch::channel(false);

        let handles = (0..config.baristas)
            .map(|i| {
                let barista = Barista::new(
                    format!("Barista-{i}"),
                    config.barista_capacity,
                    config.admission,
                    orders.clone(),
                    grinders.clone(),
                    brewers.clone(),
                );
                tokio::spawn(barista.run())
            })
            .collect();

        let shop = Self {
            menu,
            kiosks: KioskPool::new(),
            orders,
            closed,
            next_kiosk_id: AtomicUsize::new(0),
            baristas: Mutex::new(handles),
        };
        for _ in 0..config.kiosks {
            shop.add_kiosk();
        }

        info!(
            kiosks = config.kiosks,
            baristas = config.baristas,
            queue_capacity = shop.orders.capacity(),
            "Shop open"
        );
        shop
    }

    pub fn menu(&self) -> &Menu {
        &self.menu
    }

    pub fn is_closed(&self) -> bool {
        *self.closed.borrow()
    }

    /// Puts one more kiosk into the pool and returns its id.
    pub fn add_kiosk(&self) -> usize {
        let id = self.next_kiosk_id.fetch_add(1, Ordering::SeqCst);
        self.kiosks.add(Arc::new(Kiosk::new(id, self.orders.clone())));
        debug!(kiosk = id, "Kiosk added");
        id
    }

    /// Waits for a free kiosk.
    ///
    /// Returns `None` if the shop is closed, including when it closes while
    /// the caller is still waiting.
    #[instrument(skip(self))]
    pub async fn acquire_kiosk(&self) -> Option<Arc<Kiosk>> {
        let mut closed = self.closed.subscribe();
        if *closed.borrow_and_update() {
            return None;
        }

        tokio::select! {
            kiosk = self.kiosks.take() => {
                if self.is_closed() {
                    self.kiosks.put(kiosk);
                    return None;
                }
                debug!(kiosk = kiosk.id(), "Kiosk acquired");
                Some(kiosk)
            }
            _ = wait_until_closed(&mut closed) => None,
        }
    }

    /// Gives a kiosk back. Any clone of it left with the customer stops working.
    pub fn release_kiosk(&self, kiosk: Arc<Kiosk>) {
        debug!(kiosk = kiosk.id(), "Kiosk released");
        self.kiosks.put(kiosk);
    }

    /// Stops taking orders and waits for every accepted order to complete.
    ///
    /// 1. Marks the shop closed and closes the order queue, so blocked
    ///    submissions are refused instead of hanging.
    /// 2. Waits for every barista to drain its in-flight orders and exit.
    ///
    /// Calling it again (or concurrently) waits for the same drain and then
    /// returns `Ok(())`.
    pub async fn close(&self) -> Result<(), ShopError> {
        let newly_closed = self.closed.send_if_modified(|closed| !std::mem::replace(closed, true));
        if newly_closed {
            self.orders.close();
            info!("Ordering closed");
        }

        let mut baristas = self.baristas.lock().await;
        if baristas.is_empty() {
            return Ok(());
        }
        info!(baristas = baristas.len(), "Shop closing, finish up");

        let mut failure = None;
        for handle in baristas.drain(..) {
            if let Err(e) = handle.await {
                error!("Barista task failed: {:?}", e);
                failure.get_or_insert_with(|| ShopError::WorkerFailed(e.to_string()));
            }
        }

        match failure {
            Some(e) => Err(e),
            None => {
                info!("All baristas done");
                Ok(())
            }
        }
    }
}

async fn wait_until_closed(closed: &mut watch::Receiver<bool>) {
    while !*closed.borrow_and_update() {
        if closed.changed().await.is_err() {
            return;
        }
    }
}

impl Drop for CoffeeShop {
    fn drop(&mut self) {
        // Baristas outlive the handle; let them finish what they accepted.
        self.orders.close();
    }
}
