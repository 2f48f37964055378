#![allow(dead_code)]
use dnscache_application::DnsRequest;
use hickory_proto::dnssec::crypto::Ed25519SigningKey;
use hickory_proto::dnssec::rdata::{DNSSECRData, DNSKEY as HickoryDNSKEY, RRSIG};
use hickory_proto::dnssec::{Algorithm, PublicKey, PublicKeyBuf, SigSigner, SigningKey};
use hickory_proto::op::{Edns, Message, MessageType, OpCode, Query, ResponseCode};
use hickory_proto::rr::rdata::{A, MX, NS, SOA};
use hickory_proto::rr::{DNSClass, Name, RData, Record, RecordSet, RecordType};
use std::net::Ipv4Addr;
use std::str::FromStr;
use time::OffsetDateTime;

pub fn name(s: &str) -> Name {
    Name::from_str(s).unwrap()
}

/// Recursive query for a single question with a random ID.
pub fn query_message(domain: &str, record_type: RecordType) -> Message {
    let mut message = Message::new(fastrand::u16(..), MessageType::Query, OpCode::Query);
    message
        .set_recursion_desired(true)
        .add_query(Query::query(name(domain), record_type));
    message
}

pub fn request(domain: &str, record_type: RecordType, dnssec_ok: bool) -> DnsRequest {
    DnsRequest::new(query_message(domain, record_type), dnssec_ok)
}

/// A request carrying an OPT record with the given DO bit and payload size.
pub fn edns_request(
    domain: &str,
    record_type: RecordType,
    dnssec_ok: bool,
    max_payload: u16,
) -> DnsRequest {
    let mut message = query_message(domain, record_type);
    message.set_edns(edns(dnssec_ok, max_payload));
    DnsRequest::new(message, dnssec_ok)
}

pub fn edns(dnssec_ok: bool, max_payload: u16) -> Edns {
    let mut edns = Edns::new();
    edns.set_max_payload(max_payload).set_dnssec_ok(dnssec_ok);
    edns
}

pub fn a_record(owner: &str, ttl: u32, ip: Ipv4Addr) -> Record {
    Record::from_rdata(name(owner), ttl, RData::A(A(ip)))
}

pub fn mx_record(owner: &str, ttl: u32, preference: u16, exchange: &str) -> Record {
    Record::from_rdata(
        name(owner),
        ttl,
        RData::MX(MX::new(preference, name(exchange))),
    )
}

pub fn ns_record(owner: &str, ttl: u32, target: &str) -> Record {
    Record::from_rdata(name(owner), ttl, RData::NS(NS(name(target))))
}

pub fn soa_record(zone: &str, ttl: u32, minimum: u32) -> Record {
    let soa = SOA::new(
        name(&format!("sns.dns.icann.{}", zone)),
        name(&format!("noc.dns.icann.{}", zone)),
        2016082540,
        7200,
        3600,
        1209600,
        minimum,
    );
    Record::from_rdata(name(zone), ttl, RData::SOA(soa))
}

/// The two MX records served for miek.nl.
pub fn miek_mx_records(ttl: u32) -> Vec<Record> {
    vec![
        mx_record("miek.nl.", ttl, 1, "aspmx.l.google.com."),
        mx_record("miek.nl.", ttl, 10, "aspmx2.googlemail.com."),
    ]
}

/// An RRSIG over `records` whose validity starts at `inception_unix` and
/// lasts `validity_secs`.
pub fn rrsig_record(records: &[Record], inception_unix: i64, validity_secs: u64) -> Record {
    let first = &records[0];
    let owner = first.name().clone();

    let pkcs8 = Ed25519SigningKey::generate_pkcs8().unwrap();
    let signing_key = Ed25519SigningKey::from_pkcs8(&pkcs8).unwrap();
    let pub_key_buf = signing_key.to_public_key().unwrap();
    let h_pub = PublicKeyBuf::new(pub_key_buf.public_bytes().to_vec(), Algorithm::ED25519);
    let h_dnskey = HickoryDNSKEY::with_flags(256, h_pub);
    let signer = SigSigner::dnssec(
        h_dnskey,
        Box::new(signing_key),
        owner.clone(),
        std::time::Duration::from_secs(validity_secs),
    );

    let mut rrset = RecordSet::new(owner.clone(), first.record_type(), 0);
    for record in records {
        rrset.insert(record.clone(), 0);
    }

    let inception = OffsetDateTime::from_unix_timestamp(inception_unix).unwrap();
    let rrsig = RRSIG::from_rrset(&rrset, DNSClass::IN, inception, &signer).unwrap();
    Record::from_rdata(owner, first.ttl(), RData::DNSSEC(DNSSECRData::RRSIG(rrsig)))
}

/// Builds downstream replies for tests.
pub struct ResponseFixture {
    message: Message,
}

impl ResponseFixture {
    pub fn reply_to(request: &DnsRequest) -> Self {
        let mut message = Message::new(request.id(), MessageType::Response, OpCode::Query);
        message.add_queries(request.message.queries().iter().cloned());
        message.set_recursion_desired(true);
        Self { message }
    }

    /// NOERROR with AA, RA and AD set, the way an authoritative signer answers.
    pub fn authoritative(request: &DnsRequest) -> Self {
        Self::reply_to(request)
            .aa(true)
            .ra(true)
            .ad(true)
    }

    pub fn aa(mut self, value: bool) -> Self {
        self.message.set_authoritative(value);
        self
    }

    pub fn ra(mut self, value: bool) -> Self {
        self.message.set_recursion_available(value);
        self
    }

    pub fn ad(mut self, value: bool) -> Self {
        self.message.set_authentic_data(value);
        self
    }

    pub fn tc(mut self, value: bool) -> Self {
        self.message.set_truncated(value);
        self
    }

    pub fn rcode(mut self, rcode: ResponseCode) -> Self {
        self.message.set_response_code(rcode);
        self
    }

    pub fn answer(mut self, record: Record) -> Self {
        self.message.add_answer(record);
        self
    }

    pub fn answers(mut self, records: Vec<Record>) -> Self {
        self.message.add_answers(records);
        self
    }

    pub fn authority(mut self, record: Record) -> Self {
        self.message.add_name_server(record);
        self
    }

    pub fn additional(mut self, record: Record) -> Self {
        self.message.add_additional(record);
        self
    }

    pub fn edns(mut self, dnssec_ok: bool, max_payload: u16) -> Self {
        self.message.set_edns(edns(dnssec_ok, max_payload));
        self
    }

    pub fn build(self) -> Message {
        self.message
    }
}
