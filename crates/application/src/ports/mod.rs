mod bounded_store;
mod dns_cache_port;
mod dns_forwarder;

pub use bounded_store::BoundedStore;
pub use dns_cache_port::{CacheMetricsSnapshot, DnsCachePort};
pub use dns_forwarder::DnsForwarder;
