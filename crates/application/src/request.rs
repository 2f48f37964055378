use hickory_proto::op::{Message, Query};

/// A query travelling through the pipeline.
///
/// `dnssec_ok` carries the EDNS0 DO bit as seen by the dispatch layer, so
/// cache stages never need to re-inspect the OPT record.
#[derive(Debug, Clone)]
pub struct DnsRequest {
    pub message: Message,
    pub dnssec_ok: bool,
}

impl DnsRequest {
    pub fn new(message: Message, dnssec_ok: bool) -> Self {
        Self { message, dnssec_ok }
    }

    pub fn id(&self) -> u16 {
        self.message.id()
    }

    /// First question of the message. Multi-question queries are not used
    /// in practice and only the first one determines the cache key.
    pub fn question(&self) -> Option<&Query> {
        self.message.queries().first()
    }

    /// Same question under a different transaction ID.
    pub fn with_id(&self, id: u16) -> Self {
        let mut message = self.message.clone();
        let mut header = *message.header();
        header.set_id(id);
        message.set_header(header);
        Self {
            message,
            dnssec_ok: self.dnssec_ok,
        }
    }
}
