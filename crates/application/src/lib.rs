//! Ports between the cache engine and its collaborators.
pub mod ports;
pub mod request;

pub use request::DnsRequest;
