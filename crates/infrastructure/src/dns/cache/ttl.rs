use dnscache_domain::{CacheBucket, CacheConfig, ResponseCategory};
use hickory_proto::dnssec::rdata::DNSSECRData;
use hickory_proto::op::Message;
use hickory_proto::rr::{RData, Record};

use super::classify::ResponseClassifier;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TtlBounds {
    pub min: u32,
    pub max: u32,
}

impl TtlBounds {
    pub fn new(min: u32, max: u32) -> Self {
        Self { min, max }
    }

    #[inline]
    pub fn clamp(&self, ttl: u32) -> u32 {
        ttl.max(self.min).min(self.max)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TtlDecision {
    pub ttl: u32,
    pub cacheable: bool,
}

impl TtlDecision {
    fn cache_for(ttl: u32) -> Self {
        Self {
            ttl,
            cacheable: true,
        }
    }

    fn uncacheable() -> Self {
        Self {
            ttl: 0,
            cacheable: false,
        }
    }
}

/// Computes how long a classified response may live in the cache.
#[derive(Debug, Clone)]
pub struct TtlPolicy {
    positive: TtlBounds,
    negative: TtlBounds,
}

impl TtlPolicy {
    pub fn new(positive: TtlBounds, negative: TtlBounds) -> Self {
        Self { positive, negative }
    }

    pub fn from_config(config: &CacheConfig) -> Self {
        Self::new(
            TtlBounds::new(config.positive_min_ttl, config.positive_max_ttl),
            TtlBounds::new(config.negative_min_ttl, config.negative_max_ttl),
        )
    }

    pub fn bounds(&self, bucket: CacheBucket) -> TtlBounds {
        match bucket {
            CacheBucket::Positive => self.positive,
            CacheBucket::Negative => self.negative,
        }
    }

    /// Base TTL from the response, optionally cut short by the earliest
    /// signature expiry, then clamped to the bucket bounds.
    ///
    /// With `dnssec_ok`, the minimum bound never lifts the result past the
    /// moment the first signature expires.
    pub fn effective_ttl(
        &self,
        response: &Message,
        category: ResponseCategory,
        dnssec_ok: bool,
        now: u64,
    ) -> TtlDecision {
        let Some(bucket) = category.bucket() else {
            return TtlDecision::uncacheable();
        };

        let base = match Self::base_ttl(response, category) {
            Some(ttl) if ttl > 0 => ttl,
            _ => return TtlDecision::uncacheable(),
        };

        let signature_window = if dnssec_ok {
            match Self::signature_window(response, now) {
                Some(window) if window <= 0 => return TtlDecision::uncacheable(),
                Some(window) => Some(u32::try_from(window).unwrap_or(u32::MAX)),
                None => None,
            }
        } else {
            None
        };

        let ttl = match signature_window {
            Some(window) => self.bounds(bucket).clamp(base.min(window)).min(window),
            None => self.bounds(bucket).clamp(base),
        };

        if ttl == 0 {
            return TtlDecision::uncacheable();
        }
        TtlDecision::cache_for(ttl)
    }

    /// Minimum answer TTL for positive answers; the SOA minimum field for
    /// negative ones (RFC 2308).
    fn base_ttl(response: &Message, category: ResponseCategory) -> Option<u32> {
        match category {
            ResponseCategory::Success => response.answers().iter().map(Record::ttl).min(),
            ResponseCategory::NoData | ResponseCategory::NameError => {
                match ResponseClassifier::authority_soa(response)?.data() {
                    RData::SOA(soa) => Some(soa.minimum()),
                    _ => None,
                }
            }
            _ => None,
        }
    }

    /// Seconds until the earliest RRSIG in the response expires, or `None`
    /// when the response carries no signatures.
    pub fn signature_window(response: &Message, now: u64) -> Option<i64> {
        response
            .answers()
            .iter()
            .chain(response.name_servers())
            .chain(response.additionals())
            .filter_map(|record| match record.data() {
                RData::DNSSEC(DNSSECRData::RRSIG(rrsig)) => {
                    Some(rrsig.input().sig_expiration.get())
                }
                _ => None,
            })
            .min()
            .map(|expiration| i64::from(expiration) - now as i64)
    }
}
