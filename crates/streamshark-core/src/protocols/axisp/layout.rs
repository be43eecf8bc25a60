pub const PROTOCOL: &str = "axisp";

pub const HEADER_LEN: usize = 8;
pub const TAIL_LEN: usize = 8;
pub const MIN_LEN: usize = HEADER_LEN + TAIL_LEN;

pub const VERSION_OFFSET: usize = 0;
pub const TUSER_OFFSET: usize = 1;
pub const CHANNEL_OFFSET: usize = 2;
pub const TID_OFFSET: usize = 3;
pub const SEQUENCE_RANGE: std::ops::Range<usize> = 4..6;
pub const RESERVED_LEN: usize = 1;
pub const HEADER_FLAGS_OFFSET: usize = 7;
pub const PAYLOAD_OFFSET: usize = HEADER_LEN;

// Tail offsets are counted back from the reported end of the frame.
pub const TUSER_LAST_FROM_END: usize = 8;
pub const TAIL_FLAGS_FROM_END: usize = 7;
pub const LAST_BYTE_COUNT_FROM_END: usize = 6;
pub const TAIL_RESERVED_LEN: usize = 1;
pub const CRC_FROM_END: usize = 4;

pub const VERSION_MASK: u8 = 0x0f;
pub const CRC_TYPE_SHIFT: u32 = 4;

pub const FLAG_SOF: u8 = 0x80;
pub const FLAG_EOF: u8 = 0x01;

pub fn version(packed: u8) -> u8 {
    packed & VERSION_MASK
}

pub fn crc_type(packed: u8) -> u8 {
    packed >> CRC_TYPE_SHIFT
}
