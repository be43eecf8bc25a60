pub const PROTOCOL: &str = "rssi";
/// Protocol that regular-packet payloads are handed to.
pub const PAYLOAD_PROTOCOL: &str = "axisp";

pub const CONTROL_FLAGS_OFFSET: usize = 0;
pub const HEADER_LENGTH_OFFSET: usize = 1;
pub const SEQUENCE_OFFSET: usize = 2;
pub const ACK_OFFSET: usize = 3;
pub const COMMON_HEADER_LEN: usize = 4;

pub const FLAG_BUSY: u8 = 1;
pub const FLAG_NULL: u8 = 1 << 3;
pub const FLAG_RST: u8 = 1 << 4;
pub const FLAG_EAC: u8 = 1 << 5;
pub const FLAG_ACK: u8 = 1 << 6;
pub const FLAG_SYN: u8 = 1 << 7;
pub const DEFINED_FLAGS: u8 = FLAG_BUSY | FLAG_NULL | FLAG_RST | FLAG_EAC | FLAG_ACK | FLAG_SYN;

// SYN parameter block, directly after the common header.
pub const SYN_VERSION_OFFSET: usize = 4;
pub const SYN_MAX_OUTSTANDING_OFFSET: usize = 5;
pub const SYN_MAX_SEGMENT_SIZE_RANGE: std::ops::Range<usize> = 6..8;
pub const SYN_RETRANSMISSION_TIMEOUT_RANGE: std::ops::Range<usize> = 8..10;
pub const SYN_CUMULATIVE_ACK_TIMEOUT_RANGE: std::ops::Range<usize> = 10..12;
pub const SYN_NULL_TIMEOUT_RANGE: std::ops::Range<usize> = 12..14;
pub const SYN_MAX_RETRANSMISSIONS_OFFSET: usize = 14;
pub const SYN_MAX_CUMULATIVE_ACKS_OFFSET: usize = 15;
pub const SYN_MAX_OUT_OF_SEQ_OFFSET: usize = 16;
pub const SYN_TIMEOUT_UNIT_OFFSET: usize = 17;
pub const SYN_CONNECTION_ID_RANGE: std::ops::Range<usize> = 18..22;
pub const SYN_BLOCK_LEN: usize = 18;
pub const SYN_HEADER_LEN: usize = COMMON_HEADER_LEN + SYN_BLOCK_LEN;

pub const SYN_FLAG_CHECKSUM: u8 = 1 << 2;
pub const SYN_VERSION_SHIFT: u32 = 4;

// Regular packets: two spare bytes, then the checksum.
pub const REGULAR_SPARE_LEN: usize = 2;
pub const CHECKSUM_RANGE: std::ops::Range<usize> = 6..8;
pub const REGULAR_HEADER_LEN: usize = 8;

pub fn syn_version(raw: u8) -> u8 {
    raw >> SYN_VERSION_SHIFT
}
