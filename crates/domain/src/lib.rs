//! DNS cache domain layer: response categories, errors and configuration.
pub mod category;
pub mod config;
pub mod errors;

pub use category::{CacheBucket, ResponseCategory};
pub use config::{CacheConfig, CliOverrides, Config, ConfigError, LoggingConfig, ServerConfig, UpstreamConfig};
pub use errors::DomainError;
