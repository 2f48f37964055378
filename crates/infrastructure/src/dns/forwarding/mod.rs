pub mod codec;
pub mod udp;

pub use codec::MessageCodec;
pub use udp::UdpForwarder;
