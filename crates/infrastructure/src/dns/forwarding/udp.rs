//! Plain UDP forwarding to a single upstream resolver (RFC 1035 §4.2.1).
//!
//! Truncated answers are returned as-is; retrying over TCP is up to the
//! caller.

use async_trait::async_trait;
use dnscache_application::ports::DnsForwarder;
use dnscache_application::DnsRequest;
use dnscache_domain::DomainError;
use hickory_proto::op::Message;
use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr};
use std::time::Duration;
use tokio::net::UdpSocket;
use tracing::{debug, warn};

use super::codec::MessageCodec;

/// Maximum UDP DNS response size with EDNS(0)
const MAX_UDP_RESPONSE_SIZE: usize = 4096;

pub struct UdpForwarder {
    server_addr: SocketAddr,
    timeout: Duration,
}

impl UdpForwarder {
    pub fn new(server_addr: SocketAddr, timeout: Duration) -> Self {
        Self {
            server_addr,
            timeout,
        }
    }

    pub fn server_addr(&self) -> SocketAddr {
        self.server_addr
    }

    fn timeout_error(&self) -> DomainError {
        DomainError::TransportTimeout {
            server: self.server_addr.to_string(),
        }
    }

    async fn exchange(&self, query: &[u8]) -> Result<Vec<u8>, DomainError> {
        let bind_addr: SocketAddr = if self.server_addr.is_ipv4() {
            (Ipv4Addr::UNSPECIFIED, 0).into()
        } else {
            (Ipv6Addr::UNSPECIFIED, 0).into()
        };

        let socket = UdpSocket::bind(bind_addr)
            .await
            .map_err(|e| DomainError::IoError(format!("Failed to bind UDP socket: {}", e)))?;

        let bytes_sent = tokio::time::timeout(self.timeout, socket.send_to(query, self.server_addr))
            .await
            .map_err(|_| self.timeout_error())?
            .map_err(|e| {
                DomainError::IoError(format!(
                    "Failed to send UDP query to {}: {}",
                    self.server_addr, e
                ))
            })?;

        debug!(server = %self.server_addr, bytes_sent, "UDP query sent");

        let deadline = tokio::time::Instant::now() + self.timeout;
        let mut recv_buf = vec![0u8; MAX_UDP_RESPONSE_SIZE];
        loop {
            let (bytes_received, from_addr) =
                tokio::time::timeout_at(deadline, socket.recv_from(&mut recv_buf))
                    .await
                    .map_err(|_| self.timeout_error())?
                    .map_err(|e| {
                        DomainError::IoError(format!(
                            "Failed to receive UDP response from {}: {}",
                            self.server_addr, e
                        ))
                    })?;

            if from_addr != self.server_addr {
                warn!(
                    expected = %self.server_addr,
                    received_from = %from_addr,
                    "Dropping UDP datagram from unexpected source"
                );
                continue;
            }

            recv_buf.truncate(bytes_received);
            return Ok(recv_buf);
        }
    }

    fn answers_request(request: &DnsRequest, response: &Message) -> bool {
        match (request.question(), response.queries().first()) {
            (Some(asked), Some(answered)) => {
                asked.name() == answered.name()
                    && asked.query_type() == answered.query_type()
                    && asked.query_class() == answered.query_class()
            }
            (None, _) => true,
            (Some(_), None) => false,
        }
    }
}

#[async_trait]
impl DnsForwarder for UdpForwarder {
    async fn forward(&self, request: &DnsRequest) -> Result<Message, DomainError> {
        let query = MessageCodec::encode(&request.message)?;
        let reply = self.exchange(&query).await?;
        let response = MessageCodec::decode(&reply)?;

        if response.id() != request.id() {
            return Err(DomainError::InvalidDnsResponse(format!(
                "Response ID {} does not match query ID {}",
                response.id(),
                request.id()
            )));
        }

        if !Self::answers_request(request, &response) {
            return Err(DomainError::InvalidDnsResponse(format!(
                "Response question does not match query {}",
                request.id()
            )));
        }

        debug!(
            server = %self.server_addr,
            rcode = ?response.response_code(),
            answers = response.answers().len(),
            truncated = response.truncated(),
            "UDP response received"
        );
        Ok(response)
    }
}
