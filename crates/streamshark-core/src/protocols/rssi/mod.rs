//! Reliable SLAC Streaming Protocol (RSSI) decoding.
//!
//! Only the wire framing is decoded; connection state, retransmission and
//! acknowledgement tracking are out of scope. Every packet starts with a
//! 4-byte common header whose control byte selects one of two layouts:
//!
//! - SYN packets carry an 18-byte block of connection parameters and end
//!   there, even when bytes remain.
//! - Regular packets carry two spare bytes and a checksum; whatever follows
//!   is payload, handed to the `axisp` decoder through the registry.
//!
//! Multi-byte integers are big-endian. Checksums are extracted, not
//! verified.

pub mod dissector;
pub mod layout;
pub mod parser;
pub mod schema;

pub use dissector::RssiDissector;
pub use parser::{
    ControlFlags, PacketVariant, RssiBody, RssiHeader, RssiPacket, SynParameters, parse_rssi,
};
