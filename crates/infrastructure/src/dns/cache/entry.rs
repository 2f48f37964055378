use dnscache_domain::ResponseCategory;
use hickory_proto::op::{Message, ResponseCode};
use hickory_proto::rr::{Record, RecordType};
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};

/// A stored response, immutable once built apart from its hit counter.
///
/// Records are kept with the TTLs they arrived with; serving rewrites them
/// against `inserted_at_secs`.
#[derive(Debug)]
pub struct CacheEntry {
    answers: Vec<Record>,
    authorities: Vec<Record>,
    additionals: Vec<Record>,
    response_code: ResponseCode,
    authoritative: bool,
    authentic_data: bool,
    recursion_available: bool,
    category: ResponseCategory,
    dnssec_ok: bool,
    ttl: u32,
    inserted_at_secs: u64,
    hit_count: AtomicU64,
}

impl CacheEntry {
    pub fn from_response(
        response: &Message,
        category: ResponseCategory,
        dnssec_ok: bool,
        ttl: u32,
        now_secs: u64,
    ) -> Self {
        Self {
            answers: response.answers().to_vec(),
            authorities: response.name_servers().to_vec(),
            additionals: response
                .additionals()
                .iter()
                .filter(|r| r.record_type() != RecordType::OPT)
                .cloned()
                .collect(),
            response_code: response.response_code(),
            authoritative: response.authoritative(),
            authentic_data: response.authentic_data(),
            recursion_available: response.recursion_available(),
            category,
            dnssec_ok,
            ttl,
            inserted_at_secs: now_secs,
            hit_count: AtomicU64::new(0),
        }
    }

    pub fn answers(&self) -> &[Record] {
        &self.answers
    }

    pub fn authorities(&self) -> &[Record] {
        &self.authorities
    }

    pub fn additionals(&self) -> &[Record] {
        &self.additionals
    }

    pub fn response_code(&self) -> ResponseCode {
        self.response_code
    }

    pub fn authoritative(&self) -> bool {
        self.authoritative
    }

    pub fn authentic_data(&self) -> bool {
        self.authentic_data
    }

    pub fn recursion_available(&self) -> bool {
        self.recursion_available
    }

    pub fn category(&self) -> ResponseCategory {
        self.category
    }

    pub fn dnssec_ok(&self) -> bool {
        self.dnssec_ok
    }

    pub fn ttl(&self) -> u32 {
        self.ttl
    }

    pub fn inserted_at_secs(&self) -> u64 {
        self.inserted_at_secs
    }

    /// Seconds of life left; zero or negative means stale.
    #[inline]
    pub fn remaining_ttl(&self, now_secs: u64) -> i64 {
        self.inserted_at_secs as i64 + i64::from(self.ttl) - now_secs as i64
    }

    #[inline]
    pub fn is_stale(&self, now_secs: u64) -> bool {
        self.remaining_ttl(now_secs) <= 0
    }

    /// Remaining lifetime as a fraction of the stored TTL, in `[0, 1]`.
    pub fn remaining_fraction(&self, now_secs: u64) -> f64 {
        if self.ttl == 0 {
            return 0.0;
        }
        (self.remaining_ttl(now_secs).max(0) as f64 / f64::from(self.ttl)).min(1.0)
    }

    /// Counts a hit and returns the new total.
    #[inline]
    pub fn record_hit(&self) -> u64 {
        self.hit_count.fetch_add(1, AtomicOrdering::Relaxed) + 1
    }

    pub fn hits(&self) -> u64 {
        self.hit_count.load(AtomicOrdering::Relaxed)
    }
}
