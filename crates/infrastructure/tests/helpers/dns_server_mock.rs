#![allow(dead_code)]
use dnscache_infrastructure::dns::MessageCodec;
use hickory_proto::op::{Message, MessageType, OpCode};
use hickory_proto::rr::rdata::A;
use hickory_proto::rr::{Name, RData, Record};
use std::net::{Ipv4Addr, SocketAddr};
use std::str::FromStr;
use tokio::net::UdpSocket;
use tokio::sync::oneshot;

#[derive(Clone, Copy, Debug)]
pub enum MockBehavior {
    /// Answers every question with `A 303 IN A 127.0.0.53`.
    Answer,
    /// Answers, but with a transaction ID that does not match the query.
    WrongId,
    /// Swallows queries without replying.
    Silent,
    /// Answers a different question under the right transaction ID.
    WrongQuestion,
    /// Has a second socket send a forged `A 6.6.6.6` answer first, then
    /// answers normally.
    Spoofed,
}

pub struct MockDnsServer {
    addr: SocketAddr,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl MockDnsServer {
    pub async fn start(behavior: MockBehavior) -> Result<Self, std::io::Error> {
        let socket = UdpSocket::bind(SocketAddr::from(([127, 0, 0, 1], 0))).await?;
        let addr = socket.local_addr()?;

        let (shutdown_tx, mut shutdown_rx) = oneshot::channel();

        tokio::spawn(async move {
            let mut buf = vec![0u8; 4096];

            loop {
                tokio::select! {
                    _ = &mut shutdown_rx => {
                        break;
                    }
                    result = socket.recv_from(&mut buf) => {
                        if let Ok((len, peer)) = result {
                            if matches!(behavior, MockBehavior::Spoofed) {
                                Self::send_forgery(&buf[..len], peer).await;
                            }
                            if let Some(reply) = Self::build_reply(&buf[..len], behavior) {
                                let _ = socket.send_to(&reply, peer).await;
                            }
                        }
                    }
                }
            }
        });

        Ok(Self {
            addr,
            shutdown_tx: Some(shutdown_tx),
        })
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    fn build_reply(query: &[u8], behavior: MockBehavior) -> Option<Vec<u8>> {
        let query = MessageCodec::decode(query).ok()?;
        let id = match behavior {
            MockBehavior::Silent => return None,
            MockBehavior::WrongId => query.id().wrapping_add(1),
            MockBehavior::Answer | MockBehavior::WrongQuestion | MockBehavior::Spoofed => {
                query.id()
            }
        };

        let mut reply = Message::new(id, MessageType::Response, OpCode::Query);
        reply.set_recursion_desired(query.recursion_desired());
        reply.set_recursion_available(true);
        for question in query.queries() {
            let mut question = question.clone();
            if matches!(behavior, MockBehavior::WrongQuestion) {
                question.set_name(Name::from_str("evil.example.net.").ok()?);
            }
            reply.add_query(question.clone());
            reply.add_answer(Record::from_rdata(
                question.name().clone(),
                303,
                RData::A(A(Ipv4Addr::new(127, 0, 0, 53))),
            ));
        }
        MessageCodec::encode(&reply).ok()
    }

    async fn send_forgery(query: &[u8], peer: SocketAddr) {
        let Ok(query) = MessageCodec::decode(query) else {
            return;
        };
        let mut forged = Message::new(query.id(), MessageType::Response, OpCode::Query);
        forged.set_recursion_available(true);
        for question in query.queries() {
            forged.add_query(question.clone());
            forged.add_answer(Record::from_rdata(
                question.name().clone(),
                3000,
                RData::A(A(Ipv4Addr::new(6, 6, 6, 6))),
            ));
        }
        let (Ok(bytes), Ok(forger)) = (
            MessageCodec::encode(&forged),
            UdpSocket::bind(SocketAddr::from(([127, 0, 0, 1], 0))).await,
        ) else {
            return;
        };
        let _ = forger.send_to(&bytes, peer).await;
    }
}

impl Drop for MockDnsServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}
