//! # Mock Equipment
//!
//! Test doubles for the processing contracts.
//!
//! [`MockGrinder`] and [`MockBrewer`] return immediately, so tests exercise the
//! coordination logic without paying for simulated processing time.
//! [`CountingGrinder`] additionally records how many grinds ran at once, which
//! lets tests assert that a pool really grants exclusive ownership.
//!
//! # Example
//! ```ignore
//! let grinders = mock::grinders(1);
//! let brewers = mock::brewers(1);
//! let shop = CoffeeShop::new(Menu::new(vec![mock::menu_item()]), 1, 1, 1, grinders, brewers);
//! ```

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crate::equipment::{Brewer, BrewerPool, Grinder, GrinderPool};
use crate::model::{Beans, Coffee, MenuItem};

/// Grinder that hands the beans straight back.
#[derive(Debug, Default, Clone, Copy)]
pub struct MockGrinder;

impl Grinder for MockGrinder {
    fn grind(&self, beans: Beans) -> Beans {
        beans
    }
}

/// Brewer that produces the requested volume instantly.
#[derive(Debug, Default, Clone, Copy)]
pub struct MockBrewer;

impl Brewer for MockBrewer {
    fn brew(&self, size_ounces: u32, _beans: Beans) -> Coffee {
        Coffee::new(size_ounces)
    }
}

/// Grinder that holds each grind for a fixed time and tracks overlap.
#[derive(Debug, Clone)]
pub struct CountingGrinder {
    hold: Duration,
    running: Arc<AtomicUsize>,
    peak: Arc<AtomicUsize>,
    total: Arc<AtomicUsize>,
}

impl CountingGrinder {
    pub fn new(hold: Duration) -> Self {
        Self {
            hold,
            running: Arc::new(AtomicUsize::new(0)),
            peak: Arc::new(AtomicUsize::new(0)),
            total: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Highest number of grinds observed running at the same time.
    pub fn peak(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }

    /// Number of grinds finished so far.
    pub fn total(&self) -> usize {
        self.total.load(Ordering::SeqCst)
    }
}

impl Grinder for CountingGrinder {
    fn grind(&self, beans: Beans) -> Beans {
        let now = self.running.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        thread::sleep(self.hold);
        self.running.fetch_sub(1, Ordering::SeqCst);
        self.total.fetch_add(1, Ordering::SeqCst);
        beans
    }
}

/// A pool of `count` instant grinders.
pub fn grinders(count: usize) -> GrinderPool {
    GrinderPool::new((0..count).map(|_| Box::new(MockGrinder) as Box<dyn Grinder>))
}

/// A pool of `count` instant brewers.
pub fn brewers(count: usize) -> BrewerPool {
    BrewerPool::new((0..count).map(|_| Box::new(MockBrewer) as Box<dyn Brewer>))
}

/// The menu item used across tests: 8 oz at 2 g/oz.
pub fn menu_item() -> MenuItem {
    MenuItem::new("Regular Coffee", 8, 2)
}
