use std::ops::Range;

use crate::protocols::common::error::DecodeError;
use crate::protocols::common::frame::Frame;
use crate::protocols::common::reader::FieldCursor;
use crate::protocols::common::tree::Layer;

use super::layout;
use super::schema;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AxispHeader {
    pub version: u8,
    pub crc_type: u8,
    pub tuser: u8,
    pub channel: u8,
    pub tid: u8,
    pub sequence: u16,
    pub sof: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AxispTail {
    pub tuser_last: u8,
    pub eof: bool,
    pub last_byte_count: u8,
    pub crc: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AxispFrame {
    pub header: AxispHeader,
    /// Payload range relative to the start of the frame, in reported bytes.
    pub payload: Range<usize>,
    pub tail: AxispTail,
}

/// Decode an AXISP frame, appending its fields to `layer`.
///
/// The payload length is derived from the reported length so truncated
/// captures still report the intended size. A frame whose reported length
/// cannot hold both header and tail fails with `NegativePayloadLength` once
/// the header has been decoded, without touching the tail.
pub fn parse_axisp(frame: Frame<'_>, layer: &mut Layer) -> Result<AxispFrame, DecodeError> {
    let mut cursor = FieldCursor::new(frame, layer);
    let header = read_header(&mut cursor)?;
    let payload = read_payload(&mut cursor)?;
    let tail = read_tail(&mut cursor)?;
    Ok(AxispFrame {
        header,
        payload,
        tail,
    })
}

fn read_header(cursor: &mut FieldCursor<'_, '_>) -> Result<AxispHeader, DecodeError> {
    let packed_offset = cursor.offset();
    let packed = cursor.take_u8()?;
    let crc_type = layout::crc_type(packed);
    let version = layout::version(packed);
    cursor.add_u8_at(&schema::CRC_TYPE, packed_offset, crc_type);
    cursor.add_u8_at(&schema::VERSION, packed_offset, version);

    let tuser = cursor.read_u8(&schema::TUSER)?;
    let channel = cursor.read_u8(&schema::CHANNEL)?;
    let tid = cursor.read_u8(&schema::TID)?;
    let sequence = cursor.read_u16_le(&schema::SEQUENCE)?;
    cursor.skip(layout::RESERVED_LEN);
    let flags = cursor.read_flags_u8(&schema::HEADER_FLAGS, &[schema::SOF])?;

    Ok(AxispHeader {
        version,
        crc_type,
        tuser,
        channel,
        tid,
        sequence,
        sof: flags & layout::FLAG_SOF != 0,
    })
}

fn read_payload(cursor: &mut FieldCursor<'_, '_>) -> Result<Range<usize>, DecodeError> {
    let frame = cursor.frame();
    let len = cursor
        .reported_remaining()
        .checked_sub(layout::TAIL_LEN)
        .ok_or(DecodeError::NegativePayloadLength {
            protocol: layout::PROTOCOL,
            reported: frame.reported_len(),
            overhead: layout::MIN_LEN,
        })?;
    let start = cursor.offset();
    cursor.read_bytes(&schema::PAYLOAD, len)?;
    Ok(start..start + len)
}

fn read_tail(cursor: &mut FieldCursor<'_, '_>) -> Result<AxispTail, DecodeError> {
    let tuser_last = cursor.read_u8(&schema::TUSER_LAST)?;
    let flags = cursor.read_flags_u8(&schema::TAIL_FLAGS, &[schema::EOF])?;
    let last_byte_count = cursor.read_u8(&schema::LAST_BYTE_COUNT)?;
    cursor.skip(layout::TAIL_RESERVED_LEN);
    let crc = cursor.read_u32_le(&schema::CRC)?;

    Ok(AxispTail {
        tuser_last,
        eof: flags & layout::FLAG_EOF != 0,
        last_byte_count,
        crc,
    })
}
