use std::sync::Arc;

use async_trait::async_trait;

use crate::framework::{PoolStats, ResourcePool, SharedPool};
use crate::kiosk::Kiosk;

/// Blocking pool of kiosks.
///
/// Kiosks become valid on the way out and invalid on the way back in, so only
/// the customer currently holding a kiosk can order through it.
#[derive(Clone)]
pub struct KioskPool {
    kiosks: ResourcePool<Arc<Kiosk>>,
}

impl KioskPool {
    pub fn new() -> Self {
        Self { kiosks: ResourcePool::new(Vec::new()) }
    }

    /// Adds a new kiosk; it stays invalid until someone takes it.
    pub fn add(&self, kiosk: Arc<Kiosk>) {
        kiosk.set_validity(false);
        self.kiosks.add(kiosk);
    }

    pub fn stats(&self) -> PoolStats {
        self.kiosks.stats()
    }
}

impl Default for KioskPool {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SharedPool<Arc<Kiosk>> for KioskPool {
    fn put(&self, kiosk: Arc<Kiosk>) {
        kiosk.set_validity(false);
        self.kiosks.put(kiosk);
    }

    async fn take(&self) -> Arc<Kiosk> {
        let kiosk = self.kiosks.take().await;
        kiosk.set_validity(true);
        kiosk
    }
}
