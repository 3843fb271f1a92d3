use super::codec;
use hickory_proto::op::{Message, MessageType, OpCode, ResponseCode};
use proxyzone_dns_application::use_cases::{DnsOutcome, HandleDnsQueryUseCase};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

pub struct DnsServerHandler {
    use_case: Arc<HandleDnsQueryUseCase>,
}

impl DnsServerHandler {
    pub fn new(use_case: Arc<HandleDnsQueryUseCase>) -> Self {
        Self { use_case }
    }

    /// Handles one inbound datagram. `None` means nothing is sent back.
    pub async fn handle_raw_udp(&self, query_buf: &[u8], client: SocketAddr) -> Option<Vec<u8>> {
        let request = match Message::from_vec(query_buf) {
            Ok(message) => message,
            Err(e) => {
                debug!(client = %client, error = %e, "Dropping undecodable datagram");
                return None;
            }
        };

        if request.message_type() != MessageType::Query {
            debug!(client = %client, "Dropping response datagram");
            return None;
        }

        if request.op_code() != OpCode::Query {
            warn!(client = %client, op_code = ?request.op_code(), "Unsupported opcode");
            return send_error_response(&request, ResponseCode::NotImp);
        }

        if request.queries().is_empty() {
            debug!(client = %client, "Dropping query without question");
            return None;
        }

        let dns_request = match codec::decode_query(&request, client) {
            Ok(dns_request) => dns_request,
            Err(e) => {
                warn!(client = %client, error = %e, "Malformed question");
                return send_error_response(&request, ResponseCode::FormErr);
            }
        };

        info!(
            domain = %dns_request.question.name,
            qtype = dns_request.question.qtype,
            client = %client,
            "DNS query received"
        );

        let max_size = codec::max_response_size(&dns_request);

        match self.use_case.execute(&dns_request).await {
            DnsOutcome::Answer(records) => {
                let mut reply = codec::reply_to(&request, ResponseCode::NoError);
                reply.set_authoritative(true);
                reply.add_answers(records.iter().filter_map(codec::to_wire_record));

                debug!(domain = %dns_request.question.name, answers = reply.answers().len(), "Sending response");
                send(reply, max_size)
            }
            DnsOutcome::NameNotFound => send_negative(&request, ResponseCode::NXDomain, max_size),
            DnsOutcome::TypeNotFound => send_negative(&request, ResponseCode::NXRRSet, max_size),
            DnsOutcome::Relayed(response) => send(codec::relay_reply(response, &request), max_size),
            DnsOutcome::Abandoned => None,
        }
    }
}

fn send_negative(request: &Message, code: ResponseCode, max_size: u16) -> Option<Vec<u8>> {
    let mut reply = codec::reply_to(request, code);
    reply.set_authoritative(true);
    send(reply, max_size)
}

fn send_error_response(request: &Message, code: ResponseCode) -> Option<Vec<u8>> {
    debug!(code = ?code, "Sending error response");
    send(codec::reply_to(request, code), codec::MIN_UDP_PAYLOAD)
}

fn send(reply: Message, max_size: u16) -> Option<Vec<u8>> {
    match codec::encode_reply(reply, max_size) {
        Ok(bytes) => Some(bytes),
        Err(e) => {
            error!(error = %e, "Failed to encode response");
            None
        }
    }
}
