use dnscache_domain::ResponseCategory;
use hickory_proto::op::{Message, ResponseCode};
use hickory_proto::rr::{RData, Record};

/// Sorts downstream responses into cache categories.
///
/// Rules are evaluated top to bottom and the first match wins. Anything the
/// rules do not recognise is `OtherError`, which is never cached.
pub struct ResponseClassifier;

impl ResponseClassifier {
    pub fn classify(response: &Message) -> ResponseCategory {
        if response.truncated() {
            return ResponseCategory::Truncated;
        }

        let authority = response.name_servers();
        let has_soa = Self::has_soa(authority);
        let answered_by_trusted_source =
            response.authoritative() || response.recursion_available();

        match response.response_code() {
            ResponseCode::NXDomain if has_soa => return ResponseCategory::NameError,
            ResponseCode::NXDomain => return ResponseCategory::OtherError,
            ResponseCode::NoError if answered_by_trusted_source => {
                if !response.answers().is_empty() {
                    return ResponseCategory::Success;
                }
                if has_soa {
                    return ResponseCategory::NoData;
                }
            }
            _ => {}
        }

        if response.answers().is_empty() && !has_soa && Self::has_ns(authority) {
            return ResponseCategory::Delegation;
        }

        ResponseCategory::OtherError
    }

    /// The SOA carried in the authority section, if any.
    pub fn authority_soa(response: &Message) -> Option<&Record> {
        response
            .name_servers()
            .iter()
            .find(|r| matches!(r.data(), RData::SOA(_)))
    }

    fn has_soa(records: &[Record]) -> bool {
        records.iter().any(|r| matches!(r.data(), RData::SOA(_)))
    }

    fn has_ns(records: &[Record]) -> bool {
        records.iter().any(|r| matches!(r.data(), RData::NS(_)))
    }
}
