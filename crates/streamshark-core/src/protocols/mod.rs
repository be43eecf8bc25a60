//! Protocol decoding modules.
//!
//! Each protocol follows a layered structure:
//! - `layout`: byte offsets, lengths and bit masks (source of truth)
//! - `schema`: field registration entries (names, abbreviations, radix)
//! - `parser`: domain-level decoding through a `FieldCursor`
//! - `dissector`: the registry entry and hand-off decision
//!
//! Shared primitives (frame views, cursor, fields, errors) live in `common`.
//! Parsers are pure and contain no I/O; decoders find each other only
//! through the `registry`.

pub mod axisp;
pub mod common;
pub mod registry;
pub mod rssi;
