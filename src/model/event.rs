use std::any::Any;
use std::fmt;
use std::sync::Arc;

use crate::equipment::{BrewerGuard, GrinderGuard};
use crate::model::{Beans, Coffee, Order};

/// Progress report for one order, sent by a pipeline sub-task to the
/// barista that owns the order.
pub enum OrderEvent {
    /// A grinder was checked out for the order.
    GrinderReady { order: Arc<Order>, grinder: GrinderGuard },
    /// The beans are ground; the grinder is already back in its pool.
    GrindDone { order: Arc<Order>, beans: Beans },
    /// A brewer was checked out for the order.
    BrewerReady { order: Arc<Order>, brewer: BrewerGuard },
    /// The coffee is brewed; the brewer is already back in its pool.
    BrewDone { order: Arc<Order>, coffee: Coffee },
    /// A grind or brew panicked. Carries the panic payload so the barista
    /// can fail in its place.
    StepFailed { order: Arc<Order>, panic: Box<dyn Any + Send + 'static> },
}

impl OrderEvent {
    pub fn order(&self) -> &Arc<Order> {
        match self {
            OrderEvent::GrinderReady { order, .. }
            | OrderEvent::GrindDone { order, .. }
            | OrderEvent::BrewerReady { order, .. }
            | OrderEvent::BrewDone { order, .. }
            | OrderEvent::StepFailed { order, .. } => order,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            OrderEvent::GrinderReady { .. } => "GrinderReady",
            OrderEvent::GrindDone { .. } => "GrindDone",
            OrderEvent::BrewerReady { .. } => "BrewerReady",
            OrderEvent::BrewDone { .. } => "BrewDone",
            OrderEvent::StepFailed { .. } => "StepFailed",
        }
    }
}

impl fmt::Debug for OrderEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct(self.kind())
            .field("customer", &self.order().customer())
            .finish_non_exhaustive()
    }
}
