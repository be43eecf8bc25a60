use crate::protocols::common::field::{DisplayRadix, FieldKind, FieldSpec};

use super::layout;

pub const VERSION: FieldSpec =
    FieldSpec::uint("Version", "axisp.version", FieldKind::U8, DisplayRadix::Hex);
pub const CRC_TYPE: FieldSpec =
    FieldSpec::uint("CRC type", "axisp.crc_type", FieldKind::U8, DisplayRadix::Hex);
pub const TUSER: FieldSpec =
    FieldSpec::uint("TUser", "axisp.tuser", FieldKind::U8, DisplayRadix::Hex);
pub const CHANNEL: FieldSpec =
    FieldSpec::uint("Channel", "axisp.channel", FieldKind::U8, DisplayRadix::Hex);
pub const TID: FieldSpec = FieldSpec::uint("TId", "axisp.tid", FieldKind::U8, DisplayRadix::Hex);
pub const SEQUENCE: FieldSpec =
    FieldSpec::uint("Sequence Number", "axisp.seq", FieldKind::U16, DisplayRadix::Dec);
pub const HEADER_FLAGS: FieldSpec =
    FieldSpec::uint("Header Flags", "axisp.hflags", FieldKind::U8, DisplayRadix::Hex);
pub const SOF: FieldSpec =
    FieldSpec::flag("Start Of Frame", "axisp.sof", layout::FLAG_SOF as u32);
pub const PAYLOAD: FieldSpec = FieldSpec::bytes("Payload", "axisp.payload");
pub const TUSER_LAST: FieldSpec =
    FieldSpec::uint("TUser Last", "axisp.tuser_last", FieldKind::U8, DisplayRadix::Hex);
pub const TAIL_FLAGS: FieldSpec =
    FieldSpec::uint("Tail Flags", "axisp.tflags", FieldKind::U8, DisplayRadix::Hex);
pub const EOF: FieldSpec = FieldSpec::flag("End Of Frame", "axisp.eof", layout::FLAG_EOF as u32);
pub const LAST_BYTE_COUNT: FieldSpec = FieldSpec::uint(
    "Last Byte Count",
    "axisp.last_byte_cnt",
    FieldKind::U8,
    DisplayRadix::Dec,
);
pub const CRC: FieldSpec = FieldSpec::uint("CRC", "axisp.crc", FieldKind::U32, DisplayRadix::Hex);

pub static FIELDS: [FieldSpec; 14] = [
    VERSION,
    CRC_TYPE,
    TUSER,
    CHANNEL,
    TID,
    SEQUENCE,
    HEADER_FLAGS,
    SOF,
    PAYLOAD,
    TUSER_LAST,
    TAIL_FLAGS,
    EOF,
    LAST_BYTE_COUNT,
    CRC,
];
