use compact_str::CompactString;
use dnscache_application::DnsRequest;
use hickory_proto::op::Query;
use std::fmt;

/// Identity of a cached answer: folded owner name, numeric query type and
/// whether the asker wanted DNSSEC records.
///
/// Signed and unsigned answers for the same question live under different
/// keys, so a DO query never receives an answer stripped of its signatures.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct CacheKey {
    name: CompactString,
    qtype: u16,
    dnssec_ok: bool,
}

impl CacheKey {
    /// Names are folded with ASCII lowercase only; DNS case-insensitivity
    /// does not extend beyond ASCII letters.
    #[inline]
    pub fn derive(name: &str, qtype: u16, dnssec_ok: bool) -> Self {
        Self {
            name: name.chars().map(|c| c.to_ascii_lowercase()).collect(),
            qtype,
            dnssec_ok,
        }
    }

    /// Key for the first question of the request, or `None` for a message
    /// that asks nothing. IDN labels stay in their `xn--` form.
    pub fn from_request(request: &DnsRequest) -> Option<Self> {
        let query = request.question()?;
        Some(Self::derive(
            &query.name().to_ascii(),
            u16::from(query.query_type()),
            request.dnssec_ok,
        ))
    }

    /// Whether `query` asks the question this key stands for.
    pub fn matches(&self, query: &Query) -> bool {
        self.qtype == u16::from(query.query_type())
            && self.name.eq_ignore_ascii_case(&query.name().to_ascii())
    }

    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    pub fn qtype(&self) -> u16 {
        self.qtype
    }

    pub fn dnssec_ok(&self) -> bool {
        self.dnssec_ok
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.name, self.qtype)?;
        if self.dnssec_ok {
            f.write_str("/do")?;
        }
        Ok(())
    }
}
