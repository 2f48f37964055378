pub mod cache;
pub mod forwarding;
pub mod handler;
pub mod prefetch;
pub mod wire;

pub use cache::{CacheKey, ManualClock, ResponseCache, SystemClock};
pub use forwarding::{MessageCodec, UdpForwarder};
pub use handler::CacheHandler;
pub use prefetch::Prefetcher;
