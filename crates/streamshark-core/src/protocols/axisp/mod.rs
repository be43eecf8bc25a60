//! AXI-Stream Packet (AXISP) decoding.
//!
//! An AXISP frame is an 8-byte header, a payload and an 8-byte tail. The
//! payload length is not carried on the wire: it is whatever the reported
//! frame length leaves between header and tail, so a frame shorter than 16
//! reported bytes is rejected with `NegativePayloadLength` instead of being
//! clamped.
//!
//! Multi-byte integers are little-endian. The first header byte packs the
//! version (low nibble) and CRC type (high nibble); both are derived from a
//! single read. Offsets live in `layout`, field registration in `schema`.

pub mod dissector;
pub mod layout;
pub mod parser;
pub mod schema;

pub use dissector::AxispDissector;
pub use parser::{AxispFrame, AxispHeader, AxispTail, parse_axisp};
