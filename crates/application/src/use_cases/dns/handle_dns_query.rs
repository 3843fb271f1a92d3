use super::{DnsOutcome, ResolveProxyUseCase};
use crate::ports::ZoneStore;
use proxyzone_dns_domain::{DnsRequest, RecordLookup};
use std::sync::Arc;
use tracing::debug;

/// Routes each query to the static record path or to the proxy chain.
pub struct HandleDnsQueryUseCase {
    zones: Arc<dyn ZoneStore>,
    proxy: Arc<ResolveProxyUseCase>,
}

impl HandleDnsQueryUseCase {
    pub fn new(zones: Arc<dyn ZoneStore>, proxy: Arc<ResolveProxyUseCase>) -> Self {
        Self { zones, proxy }
    }

    pub async fn execute(&self, request: &DnsRequest) -> DnsOutcome {
        // One generation for the whole request, even if a reload lands mid-chain.
        let snapshot = self.zones.snapshot();
        let name = &request.question.name;

        if snapshot.store.is_proxied(name) {
            return self.proxy.execute(request, &snapshot).await;
        }

        let outcome = match snapshot.store.lookup_code(name, request.question.qtype) {
            RecordLookup::NameNotFound => DnsOutcome::NameNotFound,
            RecordLookup::TypeNotFound => DnsOutcome::TypeNotFound,
            RecordLookup::Found(records) => DnsOutcome::Answer(records.to_vec()),
        };

        debug!(
            domain = %name,
            qtype = request.question.qtype,
            outcome = outcome.label(),
            "Static lookup"
        );

        outcome
    }
}
