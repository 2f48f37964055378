//! DNS response cache engine and its network adapters.
pub mod dns;

pub use dns::{CacheHandler, UdpForwarder};
