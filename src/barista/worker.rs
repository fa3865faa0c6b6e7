use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use crate::barista::AdmissionPolicy;
use crate::equipment::{BrewerGuard, BrewerPool, GrinderGuard, GrinderPool};
use crate::framework::OrderQueue;
use crate::model::{Beans, Coffee, Order, OrderEvent, OrderStatus};

/// A barista: one concurrency slot that drives many orders at once.
///
/// # Concurrency Model
/// [`run`](Self::run) is a single dispatch loop and the only code that moves
/// an accepted order through its states or touches `active`. Anything that
/// waits (checking out a grinder, grinding, checking out a brewer, brewing)
/// happens in a spawned sub-task that reports back through the barista's
/// private inbox, so the loop itself never blocks on an order.
pub struct Barista {
    name: String,
    capacity: usize,
    admission: AdmissionPolicy,
    intake: OrderQueue<Arc<Order>>,
    inbox: mpsc::Receiver<OrderEvent>,
    events: mpsc::Sender<OrderEvent>,
    grinders: GrinderPool,
    brewers: BrewerPool,
    active: usize,
}

enum Step {
    NewOrder(Option<Arc<Order>>),
    Progress(OrderEvent),
}

impl Barista {
    /// Creates a barista; `capacity` is clamped to at least one.
    pub fn new(
        name: impl Into<String>,
        capacity: usize,
        admission: AdmissionPolicy,
        intake: OrderQueue<Arc<Order>>,
        grinders: GrinderPool,
        brewers: BrewerPool,
    ) -> Self {
        let capacity = capacity.max(1);
        let (events, inbox) = mpsc::channel(capacity);
        Self {
            name: name.into(),
            capacity,
            admission,
            intake,
            inbox,
            events,
            grinders,
            brewers,
            active: 0,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Orders accepted and not yet complete.
    pub fn active_orders(&self) -> usize {
        self.active
    }

    fn admits_more(&self) -> bool {
        match self.admission {
            AdmissionPolicy::Capped => self.active < self.capacity,
            AdmissionPolicy::Buffered => true,
        }
    }

    /// Serves customers until the intake closes and every accepted order is complete.
    ///
    /// New orders and progress events are taken with equal priority. Once the
    /// intake reports closed, only the inbox is read, until `active` is zero.
    pub async fn run(mut self) {
        info!(barista = %self.name, capacity = self.capacity, admission = ?self.admission, "Barista started");

        let mut accepting = true;
        while accepting || self.active > 0 {
            let take_new = accepting && self.admits_more();
            let has_work = self.active > 0;

            let step = tokio::select! {
                next = self.intake.pop(), if take_new => Step::NewOrder(next),
                Some(event) = self.inbox.recv(), if has_work => Step::Progress(event),
                else => break,
            };

            match step {
                Step::NewOrder(Some(order)) => self.start_order(order),
                Step::NewOrder(None) => {
                    accepting = false;
                    info!(barista = %self.name, active = self.active, "Intake closed, finishing up");
                }
                Step::Progress(event) => self.progress_order(event),
            }
        }

        info!(barista = %self.name, "Done for the day");
    }

    /// Accepts a new order: `Submitted -> ReadyToGrind`, then asks for a grinder.
    fn start_order(&mut self, order: Arc<Order>) {
        if !self.transition(&order, OrderStatus::ReadyToGrind) {
            return;
        }
        self.active += 1;
        info!(barista = %self.name, customer = %order.customer(), item = %order.item().name, "Working on order");

        let grinders = self.grinders.clone();
        self.spawn_step(async move {
            let grinder = grinders.acquire().await;
            OrderEvent::GrinderReady { order, grinder }
        });
    }

    fn progress_order(&mut self, event: OrderEvent) {
        debug!(barista = %self.name, ?event, "Progress");
        match event {
            OrderEvent::GrinderReady { order, grinder } => self.grind_coffee(order, grinder),
            OrderEvent::GrindDone { order, beans } => self.request_brewer(order, beans),
            OrderEvent::BrewerReady { order, brewer } => self.brew_coffee(order, brewer),
            OrderEvent::BrewDone { order, coffee } => self.serve_coffee(order, coffee),
            OrderEvent::StepFailed { order, panic } => {
                error!(
                    barista = %self.name,
                    customer = %order.customer(),
                    status = %order.status(),
                    active = self.active,
                    "Processing step panicked, barista stops"
                );
                std::panic::resume_unwind(panic)
            }
        }
    }

    /// `ReadyToGrind -> Grinding`: grinds `coffee_ratio * size` grams.
    fn grind_coffee(&mut self, order: Arc<Order>, grinder: GrinderGuard) {
        if !self.transition(&order, OrderStatus::Grinding) {
            return;
        }
        let whole_beans = Beans::new(order.item().beans_required());
        debug!(barista = %self.name, customer = %order.customer(), grams = whole_beans.weight_grams, "Grinding");

        self.spawn_blocking_step(order, move |order| {
            let beans = grinder.grind(whole_beans);
            grinder.release();
            OrderEvent::GrindDone { order, beans }
        });
    }

    /// `Grinding -> ReadyToBrew`: keeps the grounds and asks for a brewer.
    fn request_brewer(&mut self, order: Arc<Order>, beans: Beans) {
        if !self.transition(&order, OrderStatus::ReadyToBrew) {
            return;
        }
        order.store_ground_beans(beans);
        debug!(barista = %self.name, customer = %order.customer(), "Getting a brewer");

        let brewers = self.brewers.clone();
        self.spawn_step(async move {
            let brewer = brewers.acquire().await;
            OrderEvent::BrewerReady { order, brewer }
        });
    }

    /// `ReadyToBrew -> Brewing`: brews the stored grounds to the item's size.
    fn brew_coffee(&mut self, order: Arc<Order>, brewer: BrewerGuard) {
        if !self.transition(&order, OrderStatus::Brewing) {
            return;
        }
        let beans = order.take_ground_beans().unwrap_or_else(|| {
            warn!(barista = %self.name, customer = %order.customer(), "Brewing without ground beans");
            Beans::default()
        });
        let size = order.item().size;
        debug!(barista = %self.name, customer = %order.customer(), size, "Brewing");

        self.spawn_blocking_step(order, move |order| {
            let coffee = brewer.brew(size, beans);
            brewer.release();
            OrderEvent::BrewDone { order, coffee }
        });
    }

    /// `Brewing -> Complete`: hands the coffee over and frees the slot.
    fn serve_coffee(&mut self, order: Arc<Order>, coffee: Coffee) {
        if !self.transition(&order, OrderStatus::Complete) {
            return;
        }
        self.active = self.active.saturating_sub(1);
        order.notify_customer(coffee);
        info!(barista = %self.name, customer = %order.customer(), active = self.active, "Coffee is ready");
    }

    fn transition(&self, order: &Order, to: OrderStatus) -> bool {
        match order.advance(to) {
            Ok(()) => true,
            Err(e) => {
                warn!(barista = %self.name, customer = %order.customer(), error = %e, "Event ignored");
                false
            }
        }
    }

    /// Runs an async step and posts its event to the inbox.
    fn spawn_step<F>(&self, step: F)
    where
        F: std::future::Future<Output = OrderEvent> + Send + 'static,
    {
        let events = self.events.clone();
        let name = self.name.clone();
        tokio::spawn(async move {
            let event = step.await;
            if events.send(event).await.is_err() {
                error!(barista = %name, "Inbox closed, event lost");
            }
        });
    }

    /// Runs a blocking processing step on the blocking pool and posts its event.
    ///
    /// A panic in the step comes back as [`OrderEvent::StepFailed`], which
    /// the loop re-raises so the barista task fails instead of waiting on an
    /// order that will never finish.
    fn spawn_blocking_step<F>(&self, order: Arc<Order>, step: F)
    where
        F: FnOnce(Arc<Order>) -> OrderEvent + Send + 'static,
    {
        let events = self.events.clone();
        let name = self.name.clone();
        let failed = order.clone();
        tokio::spawn(async move {
            let event = match tokio::task::spawn_blocking(move || step(order)).await {
                Ok(event) => event,
                Err(e) if e.is_panic() => OrderEvent::StepFailed { order: failed, panic: e.into_panic() },
                Err(e) => {
                    error!(barista = %name, customer = %failed.customer(), error = %e, "Processing step cancelled");
                    return;
                }
            };
            if events.send(event).await.is_err() {
                error!(barista = %name, "Inbox closed, event lost");
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::framework::mock;

    fn barista(intake: OrderQueue<Arc<Order>>) -> Barista {
        Barista::new("test", 1, AdmissionPolicy::Capped, intake, mock::grinders(1), mock::brewers(1))
    }

    fn order() -> Arc<Order> {
        Arc::new(Order::new("customer", mock::menu_item()))
    }

    /// Moves a fresh order along to `status` without running the barista.
    fn order_at(status: OrderStatus) -> Arc<Order> {
        let order = order();
        for next in &OrderStatus::SEQUENCE[1..] {
            if order.status() == status {
                break;
            }
            order.advance(*next).unwrap();
        }
        order
    }

    // Submitted -> ReadyToGrind
    #[tokio::test]
    async fn test_start_order() {
        let mut barista = barista(OrderQueue::new(1));
        assert_eq!(barista.name(), "test");
        let order = order();

        barista.start_order(order.clone());

        let event = barista.inbox.recv().await.unwrap();
        assert!(Arc::ptr_eq(event.order(), &order));
        assert_eq!(order.status(), OrderStatus::ReadyToGrind);
        assert_eq!(barista.active_orders(), 1);
        assert!(matches!(event, OrderEvent::GrinderReady { .. }));
        assert_eq!(barista.grinders.stats().checked_out, 1);
    }

    // ReadyToGrind -> Grinding
    #[tokio::test]
    async fn test_progress_to_grind() {
        let mut barista = barista(OrderQueue::new(1));
        let order = order_at(OrderStatus::ReadyToGrind);
        let grinder = barista.grinders.acquire().await;

        barista.progress_order(OrderEvent::GrinderReady { order: order.clone(), grinder });

        let event = barista.inbox.recv().await.unwrap();
        assert_eq!(order.status(), OrderStatus::Grinding);
        match event {
            OrderEvent::GrindDone { beans, .. } => assert_eq!(beans.weight_grams, 16),
            other => panic!("expected GrindDone, got {other:?}"),
        }
        assert_eq!(barista.grinders.stats().available, 1, "grinder goes back after the grind");
    }

    // Grinding -> ReadyToBrew
    #[tokio::test]
    async fn test_progress_to_get_brewer() {
        let mut barista = barista(OrderQueue::new(1));
        let order = order_at(OrderStatus::Grinding);

        barista.progress_order(OrderEvent::GrindDone { order: order.clone(), beans: Beans::new(5) });

        let event = barista.inbox.recv().await.unwrap();
        assert_eq!(order.status(), OrderStatus::ReadyToBrew);
        assert_eq!(order.ground_beans(), Some(Beans::new(5)));
        assert!(matches!(event, OrderEvent::BrewerReady { .. }));
    }

    // ReadyToBrew -> Brewing
    #[tokio::test]
    async fn test_progress_to_brewing() {
        let mut barista = barista(OrderQueue::new(1));
        let order = order_at(OrderStatus::ReadyToBrew);
        order.store_ground_beans(Beans::new(16));
        let brewer = barista.brewers.acquire().await;

        barista.progress_order(OrderEvent::BrewerReady { order: order.clone(), brewer });

        let event = barista.inbox.recv().await.unwrap();
        assert_eq!(order.status(), OrderStatus::Brewing);
        assert_eq!(order.ground_beans(), None, "grounds are consumed by the brew");
        match event {
            OrderEvent::BrewDone { coffee, .. } => assert_eq!(coffee.size_ounces, 8),
            other => panic!("expected BrewDone, got {other:?}"),
        }
    }

    // Brewing -> Complete
    #[tokio::test]
    async fn test_progress_to_complete() {
        let mut barista = barista(OrderQueue::new(1));
        barista.active = 1;
        let order = order_at(OrderStatus::Brewing);

        barista.progress_order(OrderEvent::BrewDone { order: order.clone(), coffee: Coffee::new(8) });

        let coffee = order.await_completion().await;
        assert_eq!(*coffee, Coffee::new(8));
        assert_eq!(order.status(), OrderStatus::Complete);
        assert_eq!(barista.active_orders(), 0);
    }

    #[tokio::test]
    async fn test_out_of_order_event_is_ignored() {
        let mut barista = barista(OrderQueue::new(1));
        let order = order();

        barista.progress_order(OrderEvent::BrewDone { order: order.clone(), coffee: Coffee::new(8) });

        assert_eq!(order.status(), OrderStatus::Submitted);
        assert!(order.coffee().is_none());
    }

    // End to end with run
    #[tokio::test]
    async fn test_run_serves_full_order() {
        let intake = OrderQueue::new(1);
        let handle = tokio::spawn(barista(intake.clone()).run());

        let order = order();
        intake.push(order.clone()).await.unwrap();

        let coffee = order.await_completion().await;
        assert_eq!(coffee.size_ounces, order.item().size);
        assert_eq!(order.history(), OrderStatus::SEQUENCE.to_vec());

        intake.close();
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn test_run_drains_accepted_orders_after_close() {
        let intake = OrderQueue::new(8);
        let orders: Vec<_> = (0..4).map(|_| order()).collect();
        for order in &orders {
            intake.push(order.clone()).await.unwrap();
        }
        intake.close();

        let barista = Barista::new(
            "drain",
            2,
            AdmissionPolicy::Buffered,
            intake,
            mock::grinders(1),
            mock::brewers(1),
        );
        barista.run().await;

        for order in &orders {
            assert_eq!(order.status(), OrderStatus::Complete);
        }
    }

    struct BrokenGrinder;

    impl crate::equipment::Grinder for BrokenGrinder {
        fn grind(&self, _beans: Beans) -> Beans {
            panic!("burr jammed");
        }
    }

    #[tokio::test]
    async fn test_panicking_step_fails_the_barista() {
        let intake = OrderQueue::new(1);
        let grinders = crate::equipment::grinder_pool([BrokenGrinder]);
        let barista = Barista::new(
            "broken",
            1,
            AdmissionPolicy::Capped,
            intake.clone(),
            grinders.clone(),
            mock::brewers(1),
        );
        let handle = tokio::spawn(barista.run());

        let order = order();
        intake.push(order.clone()).await.unwrap();
        intake.close();

        let result = tokio::time::timeout(std::time::Duration::from_secs(2), handle)
            .await
            .expect("barista must not hang on a failed step");
        assert!(result.unwrap_err().is_panic());
        assert_eq!(order.status(), OrderStatus::Grinding);
        assert_eq!(grinders.stats().available, 1, "grinder returned during unwind");
    }
}
