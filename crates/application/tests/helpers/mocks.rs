use async_trait::async_trait;
use hickory_proto::op::{Message, MessageType};
use hickory_proto::rr::rdata::{A, CNAME};
use hickory_proto::rr::{Name, RData, Record};
use proxyzone_dns_application::ports::{SystemResolver, UpstreamClient, ZoneStore};
use proxyzone_dns_domain::{DomainError, ZoneSnapshot};
use std::collections::HashMap;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, RwLock};

#[derive(Clone)]
enum MockReply {
    Answer(Vec<Record>),
    Fail,
}

/// Scripted upstream keyed by target address. Every exchange is recorded.
/// Unscripted targets time out.
#[derive(Clone, Default)]
pub struct MockUpstreamClient {
    replies: Arc<RwLock<HashMap<SocketAddr, MockReply>>>,
    attempts: Arc<Mutex<Vec<(SocketAddr, Message)>>>,
}

impl MockUpstreamClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_answer(&self, target: SocketAddr, records: Vec<Record>) {
        self.replies
            .write()
            .unwrap()
            .insert(target, MockReply::Answer(records));
    }

    pub fn set_cname(&self, target: SocketAddr, owner: &str, canonical: &str) {
        self.set_answer(target, vec![cname_record(owner, canonical)]);
    }

    pub fn set_a(&self, target: SocketAddr, owner: &str, addr: Ipv4Addr) {
        self.set_answer(target, vec![a_record(owner, addr)]);
    }

    pub fn set_failure(&self, target: SocketAddr) {
        self.replies.write().unwrap().insert(target, MockReply::Fail);
    }

    pub fn attempts(&self) -> Vec<(SocketAddr, Message)> {
        self.attempts.lock().unwrap().clone()
    }

    pub fn attempt_targets(&self) -> Vec<SocketAddr> {
        self.attempts
            .lock()
            .unwrap()
            .iter()
            .map(|(target, _)| *target)
            .collect()
    }
}

#[async_trait]
impl UpstreamClient for MockUpstreamClient {
    async fn exchange(
        &self,
        request: &Message,
        target: SocketAddr,
    ) -> Result<Message, DomainError> {
        self.attempts
            .lock()
            .unwrap()
            .push((target, request.clone()));

        let reply = self.replies.read().unwrap().get(&target).cloned();
        match reply {
            Some(MockReply::Answer(records)) => {
                // Deliberately scrambled id so callers must restore it.
                let mut response = Message::new();
                response
                    .set_id(request.id().wrapping_add(1))
                    .set_message_type(MessageType::Response)
                    .set_recursion_available(true);
                response.add_queries(request.queries().to_vec());
                response.add_answers(records);
                Ok(response)
            }
            Some(MockReply::Fail) => Err(DomainError::TransportConnectionRefused {
                server: target.to_string(),
            }),
            None => Err(DomainError::TransportTimeout {
                server: target.to_string(),
            }),
        }
    }
}

pub struct MockSystemResolver {
    nameserver: Option<IpAddr>,
}

impl MockSystemResolver {
    pub fn new(nameserver: IpAddr) -> Self {
        Self {
            nameserver: Some(nameserver),
        }
    }

    pub fn unavailable() -> Self {
        Self { nameserver: None }
    }
}

#[async_trait]
impl SystemResolver for MockSystemResolver {
    async fn primary_nameserver(&self) -> Result<IpAddr, DomainError> {
        self.nameserver
            .ok_or_else(|| DomainError::NoSystemResolver("no nameserver configured".to_string()))
    }
}

pub struct InMemoryZoneStore {
    current: RwLock<Arc<ZoneSnapshot>>,
    replacements: AtomicUsize,
}

impl InMemoryZoneStore {
    pub fn new(snapshot: ZoneSnapshot) -> Self {
        Self {
            current: RwLock::new(Arc::new(snapshot)),
            replacements: AtomicUsize::new(0),
        }
    }

    pub fn replacements(&self) -> usize {
        self.replacements.load(Ordering::SeqCst)
    }
}

impl ZoneStore for InMemoryZoneStore {
    fn snapshot(&self) -> Arc<ZoneSnapshot> {
        Arc::clone(&self.current.read().unwrap())
    }

    fn replace(&self, snapshot: ZoneSnapshot) {
        *self.current.write().unwrap() = Arc::new(snapshot);
        self.replacements.fetch_add(1, Ordering::SeqCst);
    }
}

pub fn a_record(owner: &str, addr: Ipv4Addr) -> Record {
    Record::from_rdata(Name::from_ascii(owner).unwrap(), 300, RData::A(A(addr)))
}

pub fn cname_record(owner: &str, canonical: &str) -> Record {
    Record::from_rdata(
        Name::from_ascii(owner).unwrap(),
        300,
        RData::CNAME(CNAME(Name::from_ascii(canonical).unwrap())),
    )
}
