pub mod classify;
pub mod clock;
pub mod entry;
pub mod key;
pub mod lru_store;
pub mod metrics;
pub mod response;
pub mod response_cache;
pub mod store;
pub mod ttl;

pub use classify::ResponseClassifier;
pub use clock::{Clock, ManualClock, SystemClock};
pub use entry::CacheEntry;
pub use key::CacheKey;
pub use lru_store::ShardedLruStore;
pub use metrics::CacheMetrics;
pub use response::ResponseBuilder;
pub use response_cache::{CacheHit, ResponseCache};
pub use store::{EntryStore, Store};
pub use ttl::{TtlBounds, TtlDecision, TtlPolicy};
