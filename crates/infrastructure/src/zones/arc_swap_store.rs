use arc_swap::ArcSwap;
use proxyzone_dns_application::ports::ZoneStore;
use proxyzone_dns_domain::ZoneSnapshot;
use std::sync::Arc;

/// Lock-free holder of the live zone generation.
pub struct ArcSwapZoneStore {
    current: ArcSwap<ZoneSnapshot>,
}

impl ArcSwapZoneStore {
    pub fn new(snapshot: ZoneSnapshot) -> Self {
        Self {
            current: ArcSwap::from_pointee(snapshot),
        }
    }
}

impl ZoneStore for ArcSwapZoneStore {
    fn snapshot(&self) -> Arc<ZoneSnapshot> {
        self.current.load_full()
    }

    fn replace(&self, snapshot: ZoneSnapshot) {
        self.current.store(Arc::new(snapshot));
    }
}
