//! The order entity and its completion signal.
//!
//! An [`Order`] is created by a kiosk, shared between the customer and the
//! barista as an `Arc<Order>`, and dropped once both sides let go of it.
//! Only the barista that accepted it moves it through [`OrderStatus`]; the
//! customer only reads it and waits on [`Order::await_completion`].

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError};

use tokio::sync::Notify;

use crate::error::ShopError;
use crate::model::MenuItem;

/// Ground (or whole) beans, by weight.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Beans {
    pub weight_grams: u32,
}

impl Beans {
    pub fn new(weight_grams: u32) -> Self {
        Self { weight_grams }
    }
}

/// A finished cup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Coffee {
    pub size_ounces: u32,
}

impl Coffee {
    pub fn new(size_ounces: u32) -> Self {
        Self { size_ounces }
    }
}

/// Where an order is in its pipeline. The sequence is fixed and one-way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum OrderStatus {
    Submitted,
    ReadyToGrind,
    Grinding,
    ReadyToBrew,
    Brewing,
    Complete,
}

impl OrderStatus {
    /// Every status in pipeline order.
    pub const SEQUENCE: [OrderStatus; 6] = [
        OrderStatus::Submitted,
        OrderStatus::ReadyToGrind,
        OrderStatus::Grinding,
        OrderStatus::ReadyToBrew,
        OrderStatus::Brewing,
        OrderStatus::Complete,
    ];

    /// The only status this one may move to, `None` once complete.
    pub fn next(self) -> Option<OrderStatus> {
        match self {
            OrderStatus::Submitted => Some(OrderStatus::ReadyToGrind),
            OrderStatus::ReadyToGrind => Some(OrderStatus::Grinding),
            OrderStatus::Grinding => Some(OrderStatus::ReadyToBrew),
            OrderStatus::ReadyToBrew => Some(OrderStatus::Brewing),
            OrderStatus::Brewing => Some(OrderStatus::Complete),
            OrderStatus::Complete => None,
        }
    }

    pub fn is_terminal(self) -> bool {
        self == OrderStatus::Complete
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            OrderStatus::Submitted => "Submitted",
            OrderStatus::ReadyToGrind => "Ready to Grind",
            OrderStatus::Grinding => "Grinding",
            OrderStatus::ReadyToBrew => "Ready to Brew",
            OrderStatus::Brewing => "Brewing",
            OrderStatus::Complete => "Complete",
        };
        f.write_str(label)
    }
}

#[derive(Debug)]
struct Progress {
    status: OrderStatus,
    history: Vec<OrderStatus>,
    ground_beans: Option<Beans>,
}

/// A customer's order for one menu item.
#[derive(Debug)]
pub struct Order {
    customer: String,
    item: MenuItem,
    progress: Mutex<Progress>,
    coffee: OnceLock<Arc<Coffee>>,
    done: Notify,
}

impl Order {
    pub fn new(customer: impl Into<String>, item: MenuItem) -> Self {
        Self {
            customer: customer.into(),
            item,
            progress: Mutex::new(Progress {
                status: OrderStatus::Submitted,
                history: vec![OrderStatus::Submitted],
                ground_beans: None,
            }),
            coffee: OnceLock::new(),
            done: Notify::new(),
        }
    }

    fn progress(&self) -> MutexGuard<'_, Progress> {
        self.progress.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn customer(&self) -> &str {
        &self.customer
    }

    pub fn item(&self) -> &MenuItem {
        &self.item
    }

    pub fn status(&self) -> OrderStatus {
        self.progress().status
    }

    /// Every status the order has been in, oldest first.
    pub fn history(&self) -> Vec<OrderStatus> {
        self.progress().history.clone()
    }

    /// Ground beans waiting for a brewer, if the grind is done and the brew has not started.
    pub fn ground_beans(&self) -> Option<Beans> {
        self.progress().ground_beans
    }

    /// Moves the order one step forward. Anything but the immediate successor is rejected.
    pub(crate) fn advance(&self, to: OrderStatus) -> Result<(), ShopError> {
        let mut progress = self.progress();
        let from = progress.status;
        if from.next() != Some(to) {
            return Err(ShopError::InvalidTransition { from, to });
        }
        progress.status = to;
        progress.history.push(to);
        Ok(())
    }

    pub(crate) fn store_ground_beans(&self, beans: Beans) {
        self.progress().ground_beans = Some(beans);
    }

    pub(crate) fn take_ground_beans(&self) -> Option<Beans> {
        self.progress().ground_beans.take()
    }

    /// Hands the coffee to the customer and wakes every waiter.
    ///
    /// Returns `false` if the order already had its coffee; the first one wins.
    pub(crate) fn notify_customer(&self, coffee: Coffee) -> bool {
        let stored = self.coffee.set(Arc::new(coffee)).is_ok();
        self.done.notify_waiters();
        stored
    }

    /// The finished coffee, if it is ready.
    pub fn coffee(&self) -> Option<Arc<Coffee>> {
        self.coffee.get().cloned()
    }

    /// Waits until the coffee is ready and returns it.
    ///
    /// Can be called any number of times, before or after completion, and
    /// always yields the same `Arc`.
    pub async fn await_completion(&self) -> Arc<Coffee> {
        loop {
            let notified = self.done.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();
            if let Some(coffee) = self.coffee.get() {
                return coffee.clone();
            }
            notified.await;
        }
    }
}
