use super::DnsOutcome;
use crate::ports::{SystemResolver, UpstreamClient};
use hickory_proto::op::{Edns, Message, MessageType, OpCode, Query};
use hickory_proto::rr::rdata::opt::{ClientSubnet, EdnsOption};
use hickory_proto::rr::{DNSClass, Name, RData, RecordType as WireType};
use proxyzone_dns_domain::{
    DnsRequest, DomainError, Fqdn, Question, RecordLookup, RecordType, ZoneSnapshot,
};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// The requester is always described as a single host.
const ECS_SOURCE_PREFIX: u8 = 32;
const ECS_SCOPE_PREFIX: u8 = 0;
const EDNS_UDP_PAYLOAD: u16 = 1232;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChainStage {
    Start,
    HintLookup,
    ProbeSent,
    RedirectExtracted,
    CandidateQuery,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RedirectTarget {
    Canonical(Fqdn),
    /// The probe answer carried no CNAME.
    Undefined,
}

impl RedirectTarget {
    /// Name asked of the candidates. `Undefined` renders as the root name.
    pub fn query_name(&self) -> Fqdn {
        match self {
            RedirectTarget::Canonical(name) => name.clone(),
            RedirectTarget::Undefined => Fqdn::root(),
        }
    }
}

/// Request-scoped state of one proxy chain. Never shared between requests.
#[derive(Debug, Clone)]
pub struct ProxyChainState {
    pub stage: ChainStage,
    pub requester: SocketAddr,
    pub id: u16,
    pub question: Question,
    pub zone: Arc<str>,
    pub hint: Fqdn,
    pub redirect: Option<RedirectTarget>,
    pub client_subnet: Option<Ipv4Addr>,
}

impl ProxyChainState {
    fn new(request: &DnsRequest, zone: &str, hint: Fqdn) -> Self {
        Self {
            stage: ChainStage::HintLookup,
            requester: request.client,
            id: request.id,
            question: request.question.clone(),
            zone: Arc::from(zone),
            hint,
            redirect: None,
            client_subnet: None,
        }
    }
}

pub struct ResolveProxyUseCase {
    upstream: Arc<dyn UpstreamClient>,
    system: Arc<dyn SystemResolver>,
    upstream_port: u16,
}

impl ResolveProxyUseCase {
    pub fn new(
        upstream: Arc<dyn UpstreamClient>,
        system: Arc<dyn SystemResolver>,
        upstream_port: u16,
    ) -> Self {
        Self {
            upstream,
            system,
            upstream_port,
        }
    }

    #[instrument(skip_all, fields(domain = %request.domain(), id = request.id, client = %request.client))]
    pub async fn execute(&self, request: &DnsRequest, snapshot: &ZoneSnapshot) -> DnsOutcome {
        let mut state = match hint_lookup(request, snapshot) {
            Ok(state) => state,
            Err(outcome) => return outcome,
        };

        let original_query = match wire_question(&state.question) {
            Ok(query) => query,
            Err(e) => return abandon(&state, &e.to_string()),
        };

        let probe = match self.probe(&state).await {
            Ok(response) => response,
            Err(e) => return abandon(&state, &e.to_string()),
        };
        state.stage = ChainStage::ProbeSent;

        let redirect = extract_redirect(&probe);
        if redirect == RedirectTarget::Undefined {
            warn!(hint = %state.hint, "Probe answer carried no CNAME, asking candidates for the root name");
        }
        state.redirect = Some(redirect);
        state.stage = ChainStage::RedirectExtracted;

        state.client_subnet = requester_ipv4(state.requester);
        let Some(subnet) = state.client_subnet else {
            let e = DomainError::UnsupportedRequester(state.requester.ip().to_string());
            return abandon(&state, &e.to_string());
        };

        let target_name = state
            .redirect
            .as_ref()
            .map(RedirectTarget::query_name)
            .unwrap_or_else(Fqdn::root);

        let message = match build_query(state.id, &target_name, Some(subnet)) {
            Ok(message) => message,
            Err(e) => return abandon(&state, &e.to_string()),
        };
        state.stage = ChainStage::CandidateQuery;

        let candidates = snapshot
            .directory
            .candidates(&state.zone, state.hint.trimmed());

        for (attempt, server) in candidates.iter().enumerate() {
            let target = SocketAddr::new(*server, self.upstream_port);
            debug!(server = %target, attempt = attempt + 1, target_name = %target_name, "Querying candidate");

            match self.upstream.exchange(&message, target).await {
                Ok(response) => {
                    info!(
                        server = %target,
                        answers = response.answers().len(),
                        "Relaying candidate answer"
                    );
                    return DnsOutcome::Relayed(restore_identity(
                        response,
                        state.id,
                        original_query,
                    ));
                }
                Err(e) => {
                    warn!(server = %target, error = %e, "Candidate failed, trying next");
                }
            }
        }

        abandon(&state, "every candidate failed")
    }

    async fn probe(&self, state: &ProxyChainState) -> Result<Message, DomainError> {
        let resolver = self.system.primary_nameserver().await?;
        let target = SocketAddr::new(resolver, self.upstream_port);
        let message = build_query(state.id, &state.hint, None)?;

        debug!(server = %target, hint = %state.hint, "Sending probe");
        self.upstream.exchange(&message, target).await
    }
}

fn hint_lookup(request: &DnsRequest, snapshot: &ZoneSnapshot) -> Result<ProxyChainState, DnsOutcome> {
    let name = &request.question.name;
    let records = match snapshot.store.lookup(name, RecordType::PROXY) {
        RecordLookup::NameNotFound => return Err(DnsOutcome::NameNotFound),
        RecordLookup::TypeNotFound => return Err(DnsOutcome::TypeNotFound),
        RecordLookup::Found(records) => records,
    };

    let (Some(first), Some(zone)) = (records.first(), snapshot.store.proxy_zone(name)) else {
        return Err(DnsOutcome::TypeNotFound);
    };

    Ok(ProxyChainState::new(request, zone, first.owner.clone()))
}

fn abandon(state: &ProxyChainState, reason: &str) -> DnsOutcome {
    warn!(stage = ?state.stage, reason, "Proxy chain abandoned, no response sent");
    DnsOutcome::Abandoned
}

/// First CNAME in the answer section, in order.
fn extract_redirect(response: &Message) -> RedirectTarget {
    response
        .answers()
        .iter()
        .find_map(|record| match record.data() {
            RData::CNAME(cname) => Fqdn::parse(&cname.0.to_ascii()).ok(),
            _ => None,
        })
        .map(RedirectTarget::Canonical)
        .unwrap_or(RedirectTarget::Undefined)
}

fn requester_ipv4(requester: SocketAddr) -> Option<Ipv4Addr> {
    match requester.ip() {
        IpAddr::V4(addr) => Some(addr),
        IpAddr::V6(addr) => addr.to_ipv4_mapped(),
    }
}

fn to_wire_name(name: &str) -> Result<Name, DomainError> {
    Name::from_ascii(name).map_err(|e| DomainError::InvalidDomainName(format!("{}: {}", name, e)))
}

fn wire_question(question: &Question) -> Result<Query, DomainError> {
    let mut query = Query::query(
        to_wire_name(&question.raw_name)?,
        WireType::from(question.qtype),
    );
    query.set_query_class(DNSClass::from(question.qclass));
    Ok(query)
}

/// `(name, A, IN)` with RD set, optionally tagged with an IPv4 client subnet.
fn build_query(id: u16, name: &Fqdn, subnet: Option<Ipv4Addr>) -> Result<Message, DomainError> {
    let mut query = Query::query(to_wire_name(name.as_str())?, WireType::A);
    query.set_query_class(DNSClass::IN);

    let mut message = Message::new();
    message
        .set_id(id)
        .set_message_type(MessageType::Query)
        .set_op_code(OpCode::Query)
        .set_recursion_desired(true);
    message.add_query(query);

    if let Some(addr) = subnet {
        let edns = message.extensions_mut().get_or_insert_with(Edns::new);
        edns.set_max_payload(EDNS_UDP_PAYLOAD);
        edns.options_mut().insert(EdnsOption::Subnet(ClientSubnet::new(
            IpAddr::V4(addr),
            ECS_SOURCE_PREFIX,
            ECS_SCOPE_PREFIX,
        )));
    }

    Ok(message)
}

fn restore_identity(mut response: Message, id: u16, original: Query) -> Message {
    response.set_id(id);
    response.take_queries();
    response.add_query(original);
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use hickory_proto::rr::rdata::CNAME;
    use hickory_proto::rr::Record;

    #[test]
    fn test_mapped_ipv6_requester_is_unmapped() {
        let addr: SocketAddr = "[::ffff:192.0.2.7]:5000".parse().unwrap();
        assert_eq!(requester_ipv4(addr), Some(Ipv4Addr::new(192, 0, 2, 7)));

        let addr: SocketAddr = "[2001:db8::1]:5000".parse().unwrap();
        assert_eq!(requester_ipv4(addr), None);
    }

    #[test]
    fn test_extract_redirect_takes_first_cname() {
        let mut response = Message::new();
        response.add_answer(Record::from_rdata(
            Name::from_ascii("hint.example.com.").unwrap(),
            60,
            RData::A("192.0.2.1".parse::<Ipv4Addr>().unwrap().into()),
        ));
        response.add_answer(Record::from_rdata(
            Name::from_ascii("hint.example.com.").unwrap(),
            60,
            RData::CNAME(CNAME(Name::from_ascii("First.Edge.Net.").unwrap())),
        ));
        response.add_answer(Record::from_rdata(
            Name::from_ascii("hint.example.com.").unwrap(),
            60,
            RData::CNAME(CNAME(Name::from_ascii("second.edge.net.").unwrap())),
        ));

        assert_eq!(
            extract_redirect(&response),
            RedirectTarget::Canonical(Fqdn::parse("first.edge.net.").unwrap())
        );
    }

    #[test]
    fn test_extract_redirect_undefined_without_cname() {
        assert_eq!(extract_redirect(&Message::new()), RedirectTarget::Undefined);
        assert!(RedirectTarget::Undefined.query_name().is_root());
    }

    #[test]
    fn test_build_query_attaches_client_subnet() {
        let name = Fqdn::parse("edge.net").unwrap();
        let message = build_query(7, &name, Some(Ipv4Addr::new(203, 0, 113, 9))).unwrap();

        assert_eq!(message.id(), 7);
        assert!(message.recursion_desired());
        assert_eq!(message.queries().len(), 1);
        assert_eq!(message.queries()[0].query_type(), WireType::A);
        assert_eq!(message.queries()[0].query_class(), DNSClass::IN);

        let edns = message.extensions().as_ref().unwrap();
        let Some(EdnsOption::Subnet(subnet)) =
            edns.option(hickory_proto::rr::rdata::opt::EdnsCode::Subnet)
        else {
            panic!("client subnet missing");
        };
        assert_eq!(
            *subnet,
            ClientSubnet::new(IpAddr::V4(Ipv4Addr::new(203, 0, 113, 9)), 32, 0)
        );
    }

    #[test]
    fn test_build_probe_has_no_edns() {
        let name = Fqdn::parse("hint.example.com").unwrap();
        let message = build_query(1, &name, None).unwrap();
        assert!(message.extensions().is_none());
    }
}
