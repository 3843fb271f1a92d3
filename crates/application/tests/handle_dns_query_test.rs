mod helpers;

use helpers::{InMemoryZoneStore, MockSystemResolver, MockUpstreamClient};
use proxyzone_dns_application::ports::ZoneStore;
use proxyzone_dns_application::use_cases::{DnsOutcome, HandleDnsQueryUseCase, ResolveProxyUseCase};
use proxyzone_dns_domain::{DnsRequest, Question, RecordData, ZoneSnapshot, ZonesConfig};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Arc;

const CLIENT: &str = "192.168.1.100:53000";
const SYSTEM_RESOLVER: IpAddr = IpAddr::V4(Ipv4Addr::new(127, 0, 0, 53));

fn zones() -> ZonesConfig {
    let mut zones = ZonesConfig::new();
    zones.insert("example.com", "www.example.com", "a", &["192.0.2.10", "192.0.2.11"]);
    zones.insert("example.com", "www.example.com", "txt", &["hello world"]);
    zones.insert("example.com", "cdn.example.com", "a", &["192.0.2.99"]);
    zones.insert("example.com", "cdn.example.com", "proxy", &["198.51.100.1"]);
    zones
}

fn make_use_case(
    store: Arc<InMemoryZoneStore>,
    upstream: Arc<MockUpstreamClient>,
) -> HandleDnsQueryUseCase {
    let proxy = ResolveProxyUseCase::new(
        upstream,
        Arc::new(MockSystemResolver::new(SYSTEM_RESOLVER)),
        53,
    );
    HandleDnsQueryUseCase::new(store, Arc::new(proxy))
}

fn request(name: &str, qtype: u16) -> DnsRequest {
    DnsRequest::new(42, Question::new(name, qtype, 1).unwrap(), CLIENT.parse().unwrap())
}

#[tokio::test]
async fn test_static_answer_in_configured_order() {
    let store = Arc::new(InMemoryZoneStore::new(ZoneSnapshot::build(&zones(), 3600).unwrap()));
    let use_case = make_use_case(store, Arc::new(MockUpstreamClient::new()));

    let DnsOutcome::Answer(records) = use_case.execute(&request("www.example.com", 1)).await else {
        panic!("expected static answer");
    };
    let data: Vec<_> = records.into_iter().map(|r| r.data).collect();
    assert_eq!(
        data,
        vec![
            RecordData::A("192.0.2.10".parse().unwrap()),
            RecordData::A("192.0.2.11".parse().unwrap()),
        ]
    );
}

#[tokio::test]
async fn test_missing_type_is_nxrrset() {
    let store = Arc::new(InMemoryZoneStore::new(ZoneSnapshot::build(&zones(), 3600).unwrap()));
    let use_case = make_use_case(store, Arc::new(MockUpstreamClient::new()));

    let outcome = use_case.execute(&request("www.example.com", 28)).await;
    assert!(matches!(outcome, DnsOutcome::TypeNotFound));

    // A type code the store has never heard of behaves the same.
    let outcome = use_case.execute(&request("www.example.com", 99)).await;
    assert!(matches!(outcome, DnsOutcome::TypeNotFound));
}

#[tokio::test]
async fn test_missing_name_is_nxdomain() {
    let store = Arc::new(InMemoryZoneStore::new(ZoneSnapshot::build(&zones(), 3600).unwrap()));
    let use_case = make_use_case(store, Arc::new(MockUpstreamClient::new()));

    let outcome = use_case.execute(&request("nope.example.com", 1)).await;
    assert!(matches!(outcome, DnsOutcome::NameNotFound));
}

#[tokio::test]
async fn test_proxy_marker_takes_precedence_over_static_records() {
    let store = Arc::new(InMemoryZoneStore::new(ZoneSnapshot::build(&zones(), 3600).unwrap()));
    let upstream = Arc::new(MockUpstreamClient::new());
    upstream.set_cname(SocketAddr::new(SYSTEM_RESOLVER, 53), "cdn.example.com.", "edge.cdn.net.");
    upstream.set_a(
        "198.51.100.1:53".parse().unwrap(),
        "edge.cdn.net.",
        Ipv4Addr::new(192, 0, 2, 200),
    );

    let use_case = make_use_case(store, upstream.clone());
    let outcome = use_case.execute(&request("cdn.example.com", 1)).await;

    assert!(matches!(outcome, DnsOutcome::Relayed(_)));
    assert_eq!(upstream.attempts().len(), 2);
}

#[tokio::test]
async fn test_replaced_snapshot_serves_next_request() {
    let store = Arc::new(InMemoryZoneStore::new(ZoneSnapshot::default()));
    let use_case = make_use_case(store.clone(), Arc::new(MockUpstreamClient::new()));

    assert!(matches!(
        use_case.execute(&request("www.example.com", 1)).await,
        DnsOutcome::NameNotFound
    ));

    store.replace(ZoneSnapshot::build(&zones(), 3600).unwrap());

    assert!(matches!(
        use_case.execute(&request("www.example.com", 1)).await,
        DnsOutcome::Answer(_)
    ));
}
