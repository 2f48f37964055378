use dnscache_application::DnsRequest;
use dnscache_infrastructure::dns::{wire, MessageCodec};
use dnscache_infrastructure::CacheHandler;
use hickory_proto::op::{Message, MessageType, OpCode, ResponseCode};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::UdpSocket;
use tracing::{debug, error, info, warn};

const MAX_DATAGRAM: usize = 4096;

/// Serves DNS over UDP, one task per datagram.
pub async fn start_dns_server(bind_addr: String, handler: Arc<CacheHandler>) -> anyhow::Result<()> {
    let socket_addr: SocketAddr = bind_addr.parse()?;
    let socket = Arc::new(UdpSocket::bind(socket_addr).await?);

    info!(bind_address = %socket_addr, "DNS cache listening on UDP");

    let mut recv_buf = vec![0u8; MAX_DATAGRAM];
    loop {
        let (n, peer) = match socket.recv_from(&mut recv_buf).await {
            Ok(received) => received,
            Err(e) => {
                error!(error = %e, "UDP receive failed");
                continue;
            }
        };

        let query = recv_buf[..n].to_vec();
        let socket = Arc::clone(&socket);
        let handler = Arc::clone(&handler);
        tokio::spawn(async move {
            let Some(reply) = answer(&handler, &query).await else {
                return;
            };
            if let Err(e) = socket.send_to(&reply, peer).await {
                warn!(client = %peer, error = %e, "Failed to send DNS reply");
            }
        });
    }
}

async fn answer(handler: &CacheHandler, query: &[u8]) -> Option<Vec<u8>> {
    let message = match MessageCodec::decode(query) {
        Ok(message) => message,
        Err(e) => {
            debug!(error = %e, "Dropping malformed query");
            return None;
        }
    };
    let request = DnsRequest::new(message, wire::query_dnssec_ok(query));

    let response = match handler.handle(&request).await {
        Ok(response) => response,
        Err(e) => {
            warn!(id = request.id(), error = %e, "Upstream failed, answering SERVFAIL");
            servfail(&request)
        }
    };

    let max_size = usize::from(request.message.max_payload());
    match MessageCodec::encode_within(&response, max_size) {
        Ok(bytes) => Some(bytes),
        Err(e) => {
            error!(id = request.id(), error = %e, "Failed to encode reply");
            None
        }
    }
}

fn servfail(request: &DnsRequest) -> Message {
    let mut reply = Message::new(request.id(), MessageType::Response, OpCode::Query);
    reply
        .add_queries(request.message.queries().iter().cloned())
        .set_recursion_desired(request.message.recursion_desired())
        .set_recursion_available(true)
        .set_response_code(ResponseCode::ServFail);
    reply
}
