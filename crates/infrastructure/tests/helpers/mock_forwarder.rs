#![allow(dead_code)]
use async_trait::async_trait;
use dnscache_application::ports::DnsForwarder;
use dnscache_application::DnsRequest;
use dnscache_domain::DomainError;
use hickory_proto::op::Message;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

/// Downstream stand-in that answers every query with the same canned
/// reply, re-stamped with the query's ID.
pub struct MockForwarder {
    reply: Mutex<Result<Message, DomainError>>,
    delay: Option<Duration>,
    calls: AtomicUsize,
}

impl MockForwarder {
    pub fn answering(reply: Message) -> Self {
        Self {
            reply: Mutex::new(Ok(reply)),
            delay: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing(error: DomainError) -> Self {
        Self {
            reply: Mutex::new(Err(error)),
            delay: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn set_reply(&self, reply: Result<Message, DomainError>) {
        *self.reply.lock().unwrap() = reply;
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DnsForwarder for MockForwarder {
    async fn forward(&self, request: &DnsRequest) -> Result<Message, DomainError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        let reply = self.reply.lock().unwrap().clone();
        reply.map(|mut message| {
            let mut header = *message.header();
            header.set_id(request.id());
            message.set_header(header);
            message
        })
    }
}

/// Polls `condition` until it holds or two seconds pass.
pub async fn wait_until(condition: impl Fn() -> bool) -> bool {
    for _ in 0..400 {
        if condition() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    condition()
}
