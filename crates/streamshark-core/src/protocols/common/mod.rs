//! Decoding primitives shared by every protocol.
//!
//! `frame` is the borrowed byte view handed to decoders, `reader` the
//! bounds-checked cursor that turns bytes into fields, `field` the output
//! vocabulary, `tree` the per-packet result, and `error` the per-packet
//! failure taxonomy.

pub mod error;
pub mod field;
pub mod frame;
pub mod reader;
pub mod tree;

pub use error::DecodeError;
pub use field::{DecodedField, DisplayRadix, FieldKind, FieldSpec, FieldValue};
pub use frame::Frame;
pub use reader::FieldCursor;
pub use tree::{Dissection, Layer};
