use dnscache_application::DnsRequest;
use hickory_proto::op::{Edns, Message, MessageType, OpCode};
use hickory_proto::rr::Record;

use super::entry::CacheEntry;

/// Turns a stored entry into a reply for a specific request.
pub struct ResponseBuilder;

impl ResponseBuilder {
    /// `None` when the entry has run out of TTL.
    ///
    /// Every record, signatures included, is served with the same remaining
    /// TTL. The reply takes the ID, question, RD and CD from the request and
    /// the rcode, AA, AD and RA from the entry. An EDNS request gets an OPT
    /// echoing its DO bit and advertised payload size.
    pub fn build(entry: &CacheEntry, request: &DnsRequest, now_secs: u64) -> Option<Message> {
        let remaining = entry.remaining_ttl(now_secs);
        if remaining <= 0 {
            return None;
        }
        let remaining = u32::try_from(remaining).unwrap_or(u32::MAX);

        let query = &request.message;
        let mut response = Message::new(query.id(), MessageType::Response, OpCode::Query);
        response
            .add_queries(query.queries().iter().cloned())
            .set_recursion_desired(query.recursion_desired())
            .set_checking_disabled(query.checking_disabled())
            .set_authoritative(entry.authoritative())
            .set_authentic_data(entry.authentic_data())
            .set_recursion_available(entry.recursion_available())
            .set_response_code(entry.response_code());

        response.add_answers(Self::aged(entry.answers(), remaining));
        response.add_name_servers(Self::aged(entry.authorities(), remaining));
        response.add_additionals(Self::aged(entry.additionals(), remaining));

        if query.extensions().is_some() {
            response.set_edns(Self::edns_for(request));
        }

        Some(response)
    }

    fn edns_for(request: &DnsRequest) -> Edns {
        let mut edns = Edns::new();
        edns.set_max_payload(request.message.max_payload())
            .set_dnssec_ok(request.dnssec_ok);
        edns
    }

    fn aged(records: &[Record], ttl: u32) -> impl Iterator<Item = Record> + '_ {
        records.iter().map(move |record| {
            let mut record = record.clone();
            record.set_ttl(ttl);
            record
        })
    }
}
