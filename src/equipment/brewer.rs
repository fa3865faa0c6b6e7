use std::thread;
use std::time::Duration;

use tracing::trace;

use crate::model::{Beans, Coffee};

/// Anything that can brew ground beans into a finished volume of coffee.
///
/// Like [`Grinder`](super::Grinder), `brew` is synchronous and may block.
pub trait Brewer: Send + Sync {
    fn brew(&self, size_ounces: u32, beans: Beans) -> Coffee;
}

/// A brewer limited by how much water it can run per second.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimulatedBrewer {
    ounces_per_second: u32,
}

impl SimulatedBrewer {
    /// A rate of zero brews instantly.
    pub fn new(ounces_per_second: u32) -> Self {
        Self { ounces_per_second }
    }

    pub fn ounces_per_second(&self) -> u32 {
        self.ounces_per_second
    }

    pub fn brew_time(&self, size_ounces: u32) -> Duration {
        if self.ounces_per_second == 0 {
            return Duration::ZERO;
        }
        Duration::from_secs_f64(f64::from(size_ounces) / f64::from(self.ounces_per_second))
    }
}

impl Brewer for SimulatedBrewer {
    fn brew(&self, size_ounces: u32, beans: Beans) -> Coffee {
        let brew_time = self.brew_time(size_ounces);
        trace!(grams = beans.weight_grams, size_ounces, ?brew_time, "Brewing");
        thread::sleep(brew_time);
        Coffee::new(size_ounces)
    }
}
