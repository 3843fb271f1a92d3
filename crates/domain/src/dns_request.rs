use crate::dns_record::RecordType;
use crate::errors::DomainError;
use crate::fqdn::Fqdn;
use std::net::SocketAddr;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    /// Canonical form used for lookups.
    pub name: Fqdn,

    /// The name exactly as the requester spelled it, echoed back in replies.
    pub raw_name: Arc<str>,

    pub qtype: u16,

    pub qclass: u16,
}

impl Question {
    pub fn new(raw_name: &str, qtype: u16, qclass: u16) -> Result<Self, DomainError> {
        Ok(Self {
            name: Fqdn::parse(raw_name)?,
            raw_name: Arc::from(raw_name),
            qtype,
            qclass,
        })
    }

    pub fn record_type(&self) -> Option<RecordType> {
        RecordType::from_u16(self.qtype)
    }
}

/// One inbound query: only the first question of the message is kept.
#[derive(Debug, Clone)]
pub struct DnsRequest {
    pub id: u16,
    pub question: Question,
    pub client: SocketAddr,
    pub recursion_desired: bool,
    /// Advertised UDP payload size when the query carried EDNS.
    pub edns_payload: Option<u16>,
}

impl DnsRequest {
    pub fn new(id: u16, question: Question, client: SocketAddr) -> Self {
        Self {
            id,
            question,
            client,
            recursion_desired: false,
            edns_payload: None,
        }
    }

    pub fn with_recursion_desired(mut self, rd: bool) -> Self {
        self.recursion_desired = rd;
        self
    }

    pub fn with_edns_payload(mut self, payload: Option<u16>) -> Self {
        self.edns_payload = payload;
        self
    }

    pub fn domain(&self) -> &str {
        self.question.name.as_str()
    }
}
