use crate::protocols::common::field::{DisplayRadix, FieldKind, FieldSpec};

use super::layout;

pub const CONTROL_FLAGS: FieldSpec =
    FieldSpec::uint("Control Flags", "rssi.flags", FieldKind::U8, DisplayRadix::Hex);
pub const FLAG_BUSY: FieldSpec =
    FieldSpec::flag("Busy", "rssi.flags.busy", layout::FLAG_BUSY as u32);
pub const FLAG_NULL: FieldSpec =
    FieldSpec::flag("NULL", "rssi.flags.null", layout::FLAG_NULL as u32);
pub const FLAG_RST: FieldSpec =
    FieldSpec::flag("Reset", "rssi.flags.reset", layout::FLAG_RST as u32);
pub const FLAG_EAC: FieldSpec =
    FieldSpec::flag("EAC", "rssi.flags.eac", layout::FLAG_EAC as u32);
pub const FLAG_ACK: FieldSpec =
    FieldSpec::flag("ACK", "rssi.flags.ack", layout::FLAG_ACK as u32);
pub const FLAG_SYN: FieldSpec =
    FieldSpec::flag("SYN", "rssi.flags.syn", layout::FLAG_SYN as u32);

/// Control bits in wire order, lowest bit first.
pub const CONTROL_BITS: [FieldSpec; 6] =
    [FLAG_BUSY, FLAG_NULL, FLAG_RST, FLAG_EAC, FLAG_ACK, FLAG_SYN];

pub const HEADER_LENGTH: FieldSpec =
    FieldSpec::uint("Header Length", "rssi.header_length", FieldKind::U8, DisplayRadix::Dec);
pub const SEQUENCE_NUMBER: FieldSpec =
    FieldSpec::uint("Sequence Number", "rssi.seqnum", FieldKind::U8, DisplayRadix::Dec);
pub const ACK_NUMBER: FieldSpec = FieldSpec::uint(
    "Acknowledgement Number",
    "rssi.acknum",
    FieldKind::U8,
    DisplayRadix::Dec,
);
pub const CHECKSUM: FieldSpec =
    FieldSpec::uint("Checksum", "rssi.checksum", FieldKind::U16, DisplayRadix::Hex);
pub const PAYLOAD: FieldSpec = FieldSpec::bytes("Payload", "rssi.payload");

pub const SYN_FLAGS: FieldSpec =
    FieldSpec::uint("Syn Flags", "rssi.syn_flags", FieldKind::U8, DisplayRadix::Hex);
pub const SYN_CHECKSUM_FLAG: FieldSpec = FieldSpec::flag(
    "Checksum Enabled",
    "rssi.checksum_flag",
    layout::SYN_FLAG_CHECKSUM as u32,
);
pub const VERSION: FieldSpec =
    FieldSpec::uint("Version", "rssi.version", FieldKind::U8, DisplayRadix::Dec);
pub const MAX_OUTSTANDING_SEGMENTS: FieldSpec = FieldSpec::uint(
    "Max outstanding segments",
    "rssi.max_outstanding_segments",
    FieldKind::U8,
    DisplayRadix::Dec,
);
pub const MAX_SEGMENT_SIZE: FieldSpec = FieldSpec::uint(
    "Max segment size",
    "rssi.max_segment_size",
    FieldKind::U16,
    DisplayRadix::Dec,
);
pub const RETRANSMISSION_TIMEOUT: FieldSpec = FieldSpec::uint(
    "Retransmission timeout",
    "rssi.retransmission_timeout",
    FieldKind::U16,
    DisplayRadix::Dec,
);
pub const CUMULATIVE_ACK_TIMEOUT: FieldSpec =
    FieldSpec::uint("Ack timeout", "rssi.ack_timeout", FieldKind::U16, DisplayRadix::Dec);
pub const NULL_TIMEOUT: FieldSpec =
    FieldSpec::uint("Null timeout", "rssi.null_timeout", FieldKind::U16, DisplayRadix::Dec);
pub const MAX_RETRANSMISSIONS: FieldSpec = FieldSpec::uint(
    "Max retransmissions",
    "rssi.max_retransmissions",
    FieldKind::U8,
    DisplayRadix::Dec,
);
pub const MAX_CUMULATIVE_ACKS: FieldSpec =
    FieldSpec::uint("Max Acks", "rssi.max_acks", FieldKind::U8, DisplayRadix::Dec);
pub const MAX_OUT_OF_SEQ_ACKS: FieldSpec = FieldSpec::uint(
    "Max Out of Sequence Acks",
    "rssi.max_oos_acks",
    FieldKind::U8,
    DisplayRadix::Dec,
);
pub const TIMEOUT_UNIT: FieldSpec =
    FieldSpec::uint("Timeout Unit", "rssi.timeout_unit", FieldKind::U8, DisplayRadix::Dec);
pub const CONNECTION_ID: FieldSpec =
    FieldSpec::uint("Connection Id", "rssi.conn_id", FieldKind::U32, DisplayRadix::Dec);

pub static FIELDS: [FieldSpec; 25] = [
    CONTROL_FLAGS,
    FLAG_BUSY,
    FLAG_NULL,
    FLAG_RST,
    FLAG_EAC,
    FLAG_ACK,
    FLAG_SYN,
    HEADER_LENGTH,
    SEQUENCE_NUMBER,
    ACK_NUMBER,
    CHECKSUM,
    VERSION,
    SYN_FLAGS,
    SYN_CHECKSUM_FLAG,
    MAX_OUTSTANDING_SEGMENTS,
    MAX_SEGMENT_SIZE,
    RETRANSMISSION_TIMEOUT,
    CUMULATIVE_ACK_TIMEOUT,
    NULL_TIMEOUT,
    MAX_RETRANSMISSIONS,
    MAX_CUMULATIVE_ACKS,
    MAX_OUT_OF_SEQ_ACKS,
    TIMEOUT_UNIT,
    CONNECTION_ID,
    PAYLOAD,
];
