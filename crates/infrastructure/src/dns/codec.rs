//! Conversions between wire messages and the domain model.

use hickory_proto::op::{Edns, Message, MessageType, ResponseCode};
use hickory_proto::rr::rdata::{A, AAAA, CNAME, MX, NS, PTR, SOA, SRV, TXT};
use hickory_proto::rr::{Name, RData, Record};
use proxyzone_dns_domain::{DnsRequest, DomainError, Fqdn, Question, RecordData, ResourceRecord};
use std::net::SocketAddr;

/// Classic DNS limit for responses to queries without EDNS.
pub const MIN_UDP_PAYLOAD: u16 = 512;

/// Payload size advertised in our own OPT records.
pub const RESPONSE_EDNS_PAYLOAD: u16 = 1232;

const MAX_CHARACTER_STRING: usize = 255;

/// Extracts the first question of `message`.
pub fn decode_query(message: &Message, client: SocketAddr) -> Result<DnsRequest, DomainError> {
    let query = message
        .queries()
        .first()
        .ok_or_else(|| DomainError::InvalidDnsMessage("query has no question".to_string()))?;

    let question = Question::new(
        &query.name().to_ascii(),
        u16::from(query.query_type()),
        u16::from(query.query_class()),
    )?;

    Ok(DnsRequest::new(message.id(), question, client)
        .with_recursion_desired(message.recursion_desired())
        .with_edns_payload(message.extensions().as_ref().map(|edns| edns.max_payload())))
}

/// Response skeleton: same id, opcode, RD bit and first question.
pub fn reply_to(request: &Message, code: ResponseCode) -> Message {
    let mut reply = Message::new();
    reply
        .set_id(request.id())
        .set_message_type(MessageType::Response)
        .set_op_code(request.op_code())
        .set_recursion_desired(request.recursion_desired())
        .set_response_code(code);

    if let Some(query) = request.queries().first() {
        reply.add_query(query.clone());
    }

    if request.extensions().is_some() {
        let mut edns = Edns::new();
        edns.set_max_payload(RESPONSE_EDNS_PAYLOAD);
        *reply.extensions_mut() = Some(edns);
    }

    reply
}

/// Shapes a relayed upstream answer for the requester: our own OPT when the
/// query carried one, none otherwise. The upstream's OPT is never forwarded.
pub fn relay_reply(mut response: Message, request: &Message) -> Message {
    *response.extensions_mut() = request.extensions().as_ref().map(|_| {
        let mut edns = Edns::new();
        edns.set_max_payload(RESPONSE_EDNS_PAYLOAD);
        edns
    });
    response
}

/// Serializes `reply`, dropping the answers and setting TC when it does not
/// fit in `max_size`.
pub fn encode_reply(mut reply: Message, max_size: u16) -> Result<Vec<u8>, DomainError> {
    let bytes = to_bytes(&reply)?;
    if bytes.len() <= usize::from(max_size) {
        return Ok(bytes);
    }

    reply.take_answers();
    reply.take_additionals();
    reply.set_truncated(true);
    to_bytes(&reply)
}

pub fn to_bytes(message: &Message) -> Result<Vec<u8>, DomainError> {
    message
        .to_vec()
        .map_err(|e| DomainError::InvalidDnsMessage(format!("Failed to encode message: {}", e)))
}

/// Largest response the requester accepts over UDP.
pub fn max_response_size(request: &DnsRequest) -> u16 {
    request
        .edns_payload
        .map_or(MIN_UDP_PAYLOAD, |payload| payload.max(MIN_UDP_PAYLOAD))
}

fn wire_name(name: &Fqdn) -> Option<Name> {
    Name::from_ascii(name.as_str()).ok()
}

fn character_strings(text: &str) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();

    for c in text.chars() {
        if current.len() + c.len_utf8() > MAX_CHARACTER_STRING {
            chunks.push(std::mem::take(&mut current));
        }
        current.push(c);
    }
    chunks.push(current);
    chunks
}

/// PROXY markers have no wire form and yield `None`.
pub fn to_wire_record(record: &ResourceRecord) -> Option<Record> {
    let rdata = match &record.data {
        RecordData::A(addr) => RData::A(A(*addr)),
        RecordData::Aaaa(addr) => RData::AAAA(AAAA(*addr)),
        RecordData::Cname(target) => RData::CNAME(CNAME(wire_name(target)?)),
        RecordData::Ns(target) => RData::NS(NS(wire_name(target)?)),
        RecordData::Ptr(target) => RData::PTR(PTR(wire_name(target)?)),
        RecordData::Mx {
            preference,
            exchange,
        } => RData::MX(MX::new(*preference, wire_name(exchange)?)),
        RecordData::Txt(text) => RData::TXT(TXT::new(character_strings(text))),
        RecordData::Srv {
            priority,
            weight,
            port,
            target,
        } => RData::SRV(SRV::new(*priority, *weight, *port, wire_name(target)?)),
        RecordData::Soa {
            mname,
            rname,
            serial,
            refresh,
            retry,
            expire,
            minimum,
        } => RData::SOA(SOA::new(
            wire_name(mname)?,
            wire_name(rname)?,
            *serial,
            *refresh,
            *retry,
            *expire,
            *minimum,
        )),
        RecordData::Proxy(_) => return None,
    };

    Some(Record::from_rdata(
        wire_name(&record.owner)?,
        record.ttl,
        rdata,
    ))
}
