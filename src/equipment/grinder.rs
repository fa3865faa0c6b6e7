use std::thread;
use std::time::Duration;

use tracing::trace;

use crate::model::Beans;

/// Anything that can turn whole beans into ground beans.
///
/// `grind` is synchronous and may block the calling thread for as long as the
/// grind takes; the barista runs it on the blocking pool.
pub trait Grinder: Send + Sync {
    fn grind(&self, beans: Beans) -> Beans;
}

/// A grinder that takes `weight / grams_per_second` seconds per grind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimulatedGrinder {
    grams_per_second: u32,
}

impl SimulatedGrinder {
    /// A rate of zero grinds instantly.
    pub fn new(grams_per_second: u32) -> Self {
        Self { grams_per_second }
    }

    pub fn grams_per_second(&self) -> u32 {
        self.grams_per_second
    }

    pub fn grind_time(&self, beans: Beans) -> Duration {
        if self.grams_per_second == 0 {
            return Duration::ZERO;
        }
        Duration::from_secs_f64(f64::from(beans.weight_grams) / f64::from(self.grams_per_second))
    }
}

impl Grinder for SimulatedGrinder {
    fn grind(&self, beans: Beans) -> Beans {
        let grind_time = self.grind_time(beans);
        trace!(grams = beans.weight_grams, ?grind_time, "Grinding");
        thread::sleep(grind_time);
        beans
    }
}
