use proxyzone_dns_domain::ZoneSnapshot;
use std::sync::Arc;

/// Holder of the live zone generation.
///
/// Readers take one snapshot per request; `replace` publishes a new
/// generation without disturbing readers of the old one.
pub trait ZoneStore: Send + Sync {
    fn snapshot(&self) -> Arc<ZoneSnapshot>;

    fn replace(&self, snapshot: ZoneSnapshot);
}
