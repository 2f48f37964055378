use async_trait::async_trait;
use dnscache_domain::DomainError;
use hickory_proto::op::Message;

use crate::request::DnsRequest;

/// The next stage of the pipeline: anything that can turn a query into a
/// response. Errors are returned as-is; callers decide how to surface them.
#[async_trait]
pub trait DnsForwarder: Send + Sync {
    async fn forward(&self, request: &DnsRequest) -> Result<Message, DomainError>;

    /// Answer from local state only, without contacting anything downstream.
    /// Returns `Some(response)` on hit, `None` on miss.
    /// Default implementation returns None (no cache).
    fn try_cache(&self, _request: &DnsRequest) -> Option<Message> {
        None
    }
}
