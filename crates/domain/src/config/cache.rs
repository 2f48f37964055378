use serde::{Deserialize, Serialize};

use super::errors::ConfigError;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CacheConfig {
    /// Zones whose names are eligible for caching. "." covers everything.
    #[serde(default = "default_zones")]
    pub zones: Vec<String>,

    #[serde(default = "default_capacity")]
    pub positive_capacity: usize,

    #[serde(default = "default_capacity")]
    pub negative_capacity: usize,

    #[serde(default = "default_positive_min_ttl")]
    pub positive_min_ttl: u32,

    #[serde(default = "default_positive_max_ttl")]
    pub positive_max_ttl: u32,

    #[serde(default = "default_negative_min_ttl")]
    pub negative_min_ttl: u32,

    #[serde(default = "default_negative_max_ttl")]
    pub negative_max_ttl: u32,

    /// Hits an entry must exceed before it becomes a prefetch candidate.
    /// Zero disables prefetching.
    #[serde(default)]
    pub prefetch_amount: u64,

    /// Fraction of the original TTL below which a hot entry is refreshed.
    #[serde(default = "default_prefetch_threshold")]
    pub prefetch_threshold: f64,

    #[serde(default = "default_prefetch_concurrency")]
    pub prefetch_concurrency: usize,

    #[serde(default = "default_prefetch_queue_size")]
    pub prefetch_queue_size: usize,

    #[serde(default = "default_store_shards")]
    pub store_shards: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            zones: default_zones(),
            positive_capacity: default_capacity(),
            negative_capacity: default_capacity(),
            positive_min_ttl: default_positive_min_ttl(),
            positive_max_ttl: default_positive_max_ttl(),
            negative_min_ttl: default_negative_min_ttl(),
            negative_max_ttl: default_negative_max_ttl(),
            prefetch_amount: 0,
            prefetch_threshold: default_prefetch_threshold(),
            prefetch_concurrency: default_prefetch_concurrency(),
            prefetch_queue_size: default_prefetch_queue_size(),
            store_shards: default_store_shards(),
        }
    }
}

impl CacheConfig {
    pub fn prefetch_enabled(&self) -> bool {
        self.prefetch_amount > 0
    }

    /// True when `name` equals one of the configured zones or sits below it.
    /// Comparison is ASCII case-insensitive and ignores a trailing dot.
    pub fn matches_zone(&self, name: &str) -> bool {
        let name = trim_root(name);
        self.zones.iter().any(|zone| {
            let zone = trim_root(zone);
            if zone.is_empty() {
                return true;
            }
            if name.len() == zone.len() {
                return name.eq_ignore_ascii_case(zone);
            }
            name.len() > zone.len()
                && name.as_bytes()[name.len() - zone.len() - 1] == b'.'
                && name[name.len() - zone.len()..].eq_ignore_ascii_case(zone)
        })
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.zones.is_empty() {
            return Err(ConfigError::Validation(
                "cache.zones must list at least one zone".to_string(),
            ));
        }
        if self.positive_capacity == 0 || self.negative_capacity == 0 {
            return Err(ConfigError::Validation(
                "cache capacities must be greater than 0".to_string(),
            ));
        }
        if self.positive_min_ttl > self.positive_max_ttl {
            return Err(ConfigError::Validation(format!(
                "positive_min_ttl ({}) exceeds positive_max_ttl ({})",
                self.positive_min_ttl, self.positive_max_ttl
            )));
        }
        if self.negative_min_ttl > self.negative_max_ttl {
            return Err(ConfigError::Validation(format!(
                "negative_min_ttl ({}) exceeds negative_max_ttl ({})",
                self.negative_min_ttl, self.negative_max_ttl
            )));
        }
        if !(self.prefetch_threshold > 0.0 && self.prefetch_threshold <= 1.0) {
            return Err(ConfigError::Validation(format!(
                "prefetch_threshold must be in (0, 1], got {}",
                self.prefetch_threshold
            )));
        }
        if self.prefetch_concurrency == 0 || self.prefetch_queue_size == 0 {
            return Err(ConfigError::Validation(
                "prefetch_concurrency and prefetch_queue_size must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}

fn trim_root(name: &str) -> &str {
    name.strip_suffix('.').unwrap_or(name)
}

fn default_zones() -> Vec<String> {
    vec![".".to_string()]
}

fn default_capacity() -> usize {
    10_000
}

fn default_positive_min_ttl() -> u32 {
    0
}

fn default_positive_max_ttl() -> u32 {
    86_400
}

fn default_negative_min_ttl() -> u32 {
    30
}

fn default_negative_max_ttl() -> u32 {
    3_600
}

fn default_prefetch_threshold() -> f64 {
    0.1
}

fn default_prefetch_concurrency() -> usize {
    4
}

fn default_prefetch_queue_size() -> usize {
    1_024
}

fn default_store_shards() -> usize {
    16
}
