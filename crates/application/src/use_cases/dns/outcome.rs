use hickory_proto::op::Message;
use proxyzone_dns_domain::ResourceRecord;

/// What, if anything, goes back to the requester.
#[derive(Debug, Clone)]
pub enum DnsOutcome {
    /// Static records, in configured order. Authoritative.
    Answer(Vec<ResourceRecord>),
    /// NXDOMAIN.
    NameNotFound,
    /// NXRRSET: the name exists without the requested type.
    TypeNotFound,
    /// Upstream answer with the original id and question restored.
    Relayed(Message),
    /// Nothing is written.
    Abandoned,
}

impl DnsOutcome {
    pub fn is_abandoned(&self) -> bool {
        matches!(self, DnsOutcome::Abandoned)
    }

    pub fn label(&self) -> &'static str {
        match self {
            DnsOutcome::Answer(_) => "ANSWER",
            DnsOutcome::NameNotFound => "NXDOMAIN",
            DnsOutcome::TypeNotFound => "NXRRSET",
            DnsOutcome::Relayed(_) => "RELAYED",
            DnsOutcome::Abandoned => "ABANDONED",
        }
    }
}
