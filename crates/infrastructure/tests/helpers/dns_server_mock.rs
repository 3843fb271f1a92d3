#![allow(dead_code)]
use hickory_proto::op::{Edns, Message, MessageType};
use hickory_proto::rr::rdata::opt::{EdnsCode, EdnsOption};
use hickory_proto::rr::rdata::{A, CNAME};
use hickory_proto::rr::{Name, RData, Record};
use std::net::{Ipv4Addr, SocketAddr};
use std::sync::{Arc, Mutex};
use tokio::net::UdpSocket;
use tokio::sync::oneshot;

#[derive(Clone)]
pub enum MockBehavior {
    /// Answers every query with one A record.
    Address(Ipv4Addr),
    /// Plays both hops of a proxy chain: CNAME to `canonical` for queries
    /// without a client subnet, `addr` for queries that carry one.
    ProxyChain { canonical: String, addr: Ipv4Addr },
    /// Like `ProxyChain`, but the client-subnet hop returns `answers` A
    /// records and an OPT of its own.
    BulkyProxyChain { canonical: String, answers: u8 },
    /// Never answers.
    Silent,
    /// Answers with bytes that are not a DNS message.
    Garbage,
    /// Answers with a different transaction id.
    WrongId,
}

pub struct MockDnsServer {
    addr: SocketAddr,
    received: Arc<Mutex<Vec<Message>>>,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl MockDnsServer {
    pub async fn start(bind: SocketAddr, behavior: MockBehavior) -> Result<Self, std::io::Error> {
        let socket = UdpSocket::bind(bind).await?;
        let addr = socket.local_addr()?;
        let received = Arc::new(Mutex::new(Vec::new()));
        let log = Arc::clone(&received);

        let (shutdown_tx, mut shutdown_rx) = oneshot::channel();

        tokio::spawn(async move {
            let mut buf = vec![0u8; 4096];

            loop {
                tokio::select! {
                    _ = &mut shutdown_rx => {
                        break;
                    }
                    result = socket.recv_from(&mut buf) => {
                        let Ok((len, peer)) = result else { continue };
                        let Ok(query) = Message::from_vec(&buf[..len]) else { continue };
                        log.lock().unwrap().push(query.clone());

                        if let Some(response) = Self::build_response(&query, &behavior) {
                            let _ = socket.send_to(&response, peer).await;
                        }
                    }
                }
            }
        });

        Ok(Self {
            addr,
            received,
            shutdown_tx: Some(shutdown_tx),
        })
    }

    pub async fn start_local(behavior: MockBehavior) -> Result<Self, std::io::Error> {
        Self::start(SocketAddr::from(([127, 0, 0, 1], 0)), behavior).await
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    pub fn received(&self) -> Vec<Message> {
        self.received.lock().unwrap().clone()
    }

    fn build_response(query: &Message, behavior: &MockBehavior) -> Option<Vec<u8>> {
        let owner = query.queries().first()?.name().clone();

        let mut response = Message::new();
        response
            .set_id(query.id())
            .set_message_type(MessageType::Response)
            .set_op_code(query.op_code())
            .set_recursion_desired(query.recursion_desired())
            .set_recursion_available(true);
        response.add_queries(query.queries().to_vec());

        match behavior {
            MockBehavior::Silent => return None,
            MockBehavior::Garbage => return Some(vec![0xde, 0xad]),
            MockBehavior::WrongId => {
                response.set_id(query.id().wrapping_add(1));
            }
            MockBehavior::Address(addr) => {
                response.add_answer(Record::from_rdata(owner, 60, RData::A(A(*addr))));
            }
            MockBehavior::ProxyChain { canonical, addr } => {
                let rdata = if Self::has_subnet(query) {
                    RData::A(A(*addr))
                } else {
                    RData::CNAME(CNAME(Name::from_ascii(canonical).ok()?))
                };
                response.add_answer(Record::from_rdata(owner, 60, rdata));
            }
            MockBehavior::BulkyProxyChain { canonical, answers } => {
                if Self::has_subnet(query) {
                    for i in 0..*answers {
                        let addr = Ipv4Addr::new(192, 0, 2, i);
                        response.add_answer(Record::from_rdata(owner.clone(), 60, RData::A(A(addr))));
                    }
                    response
                        .extensions_mut()
                        .get_or_insert_with(Edns::new)
                        .set_max_payload(1232);
                } else {
                    let rdata = RData::CNAME(CNAME(Name::from_ascii(canonical).ok()?));
                    response.add_answer(Record::from_rdata(owner, 60, rdata));
                }
            }
        }

        response.to_vec().ok()
    }

    fn has_subnet(query: &Message) -> bool {
        query
            .extensions()
            .as_ref()
            .and_then(|edns| edns.option(EdnsCode::Subnet))
            .is_some_and(|option| matches!(option, EdnsOption::Subnet(_)))
    }

    pub fn shutdown(mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

impl Drop for MockDnsServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}
