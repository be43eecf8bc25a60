use tracing::trace;

use crate::protocols::common::error::DecodeError;
use crate::protocols::common::frame::Frame;
use crate::protocols::common::reader::FieldCursor;
use crate::protocols::common::tree::Layer;

use super::layout;
use super::schema;

/// Header layout selected by the SYN bit of the control byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PacketVariant {
    Syn,
    Regular,
}

/// Control byte of the common header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControlFlags(u8);

impl ControlFlags {
    pub fn from_bits(raw: u8) -> Self {
        Self(raw)
    }

    pub fn bits(self) -> u8 {
        self.0
    }

    pub fn busy(self) -> bool {
        self.0 & layout::FLAG_BUSY != 0
    }

    pub fn null(self) -> bool {
        self.0 & layout::FLAG_NULL != 0
    }

    pub fn rst(self) -> bool {
        self.0 & layout::FLAG_RST != 0
    }

    pub fn eac(self) -> bool {
        self.0 & layout::FLAG_EAC != 0
    }

    pub fn ack(self) -> bool {
        self.0 & layout::FLAG_ACK != 0
    }

    pub fn syn(self) -> bool {
        self.0 & layout::FLAG_SYN != 0
    }

    pub fn variant(self) -> PacketVariant {
        if self.syn() {
            PacketVariant::Syn
        } else {
            PacketVariant::Regular
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RssiHeader {
    pub flags: ControlFlags,
    pub header_length: u8,
    pub sequence: u8,
    pub acknowledgement: u8,
}

/// Connection parameters proposed in a SYN packet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SynParameters {
    pub version: u8,
    pub syn_flags: u8,
    pub checksum_enabled: bool,
    pub max_outstanding_segments: u8,
    pub max_segment_size: u16,
    pub retransmission_timeout: u16,
    pub cumulative_ack_timeout: u16,
    pub null_timeout: u16,
    pub max_retransmissions: u8,
    pub max_cumulative_acks: u8,
    pub max_out_of_sequence_acks: u8,
    pub timeout_unit: u8,
    pub connection_id: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RssiBody<'a> {
    Syn(SynParameters),
    /// `payload` is the residual view after the checksum, possibly empty.
    Regular { checksum: u16, payload: Frame<'a> },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RssiPacket<'a> {
    pub header: RssiHeader,
    pub body: RssiBody<'a>,
}

impl RssiPacket<'_> {
    pub fn variant(&self) -> PacketVariant {
        match self.body {
            RssiBody::Syn(_) => PacketVariant::Syn,
            RssiBody::Regular { .. } => PacketVariant::Regular,
        }
    }
}

/// Decode an RSSI packet, appending its fields to `layer`.
///
/// The control byte is read once; its SYN bit picks the layout of the rest
/// of the header. Regular packets do not consume their payload: it is
/// returned as a sub-view for the next decoder.
pub fn parse_rssi<'a>(frame: Frame<'a>, layer: &mut Layer) -> Result<RssiPacket<'a>, DecodeError> {
    let mut cursor = FieldCursor::new(frame, layer);
    let header = read_common_header(&mut cursor)?;
    let variant = header.flags.variant();
    trace!(?variant, flags = header.flags.bits(), "rssi variant");

    let body = match variant {
        PacketVariant::Syn => RssiBody::Syn(read_syn_block(&mut cursor)?),
        PacketVariant::Regular => read_regular(&mut cursor)?,
    };
    Ok(RssiPacket { header, body })
}

fn read_common_header(cursor: &mut FieldCursor<'_, '_>) -> Result<RssiHeader, DecodeError> {
    let raw = cursor.read_flags_u8(&schema::CONTROL_FLAGS, &schema::CONTROL_BITS)?;
    let header_length = cursor.read_u8(&schema::HEADER_LENGTH)?;
    let sequence = cursor.read_u8(&schema::SEQUENCE_NUMBER)?;
    let acknowledgement = cursor.read_u8(&schema::ACK_NUMBER)?;
    Ok(RssiHeader {
        flags: ControlFlags::from_bits(raw),
        header_length,
        sequence,
        acknowledgement,
    })
}

fn read_syn_block(cursor: &mut FieldCursor<'_, '_>) -> Result<SynParameters, DecodeError> {
    let version_offset = cursor.offset();
    let raw = cursor.read_flags_u8(&schema::SYN_FLAGS, &[schema::SYN_CHECKSUM_FLAG])?;
    let version = layout::syn_version(raw);
    cursor.add_u8_at(&schema::VERSION, version_offset, version);

    Ok(SynParameters {
        version,
        syn_flags: raw,
        checksum_enabled: raw & layout::SYN_FLAG_CHECKSUM != 0,
        max_outstanding_segments: cursor.read_u8(&schema::MAX_OUTSTANDING_SEGMENTS)?,
        max_segment_size: cursor.read_u16_be(&schema::MAX_SEGMENT_SIZE)?,
        retransmission_timeout: cursor.read_u16_be(&schema::RETRANSMISSION_TIMEOUT)?,
        cumulative_ack_timeout: cursor.read_u16_be(&schema::CUMULATIVE_ACK_TIMEOUT)?,
        null_timeout: cursor.read_u16_be(&schema::NULL_TIMEOUT)?,
        max_retransmissions: cursor.read_u8(&schema::MAX_RETRANSMISSIONS)?,
        max_cumulative_acks: cursor.read_u8(&schema::MAX_CUMULATIVE_ACKS)?,
        max_out_of_sequence_acks: cursor.read_u8(&schema::MAX_OUT_OF_SEQ_ACKS)?,
        timeout_unit: cursor.read_u8(&schema::TIMEOUT_UNIT)?,
        connection_id: cursor.read_u32_be(&schema::CONNECTION_ID)?,
    })
}

fn read_regular<'a>(cursor: &mut FieldCursor<'a, '_>) -> Result<RssiBody<'a>, DecodeError> {
    cursor.skip(layout::REGULAR_SPARE_LEN);
    let checksum = cursor.read_u16_be(&schema::CHECKSUM)?;

    let payload_offset = cursor.offset();
    let remaining = cursor.reported_remaining();
    if remaining > 0 {
        cursor.read_bytes(&schema::PAYLOAD, remaining)?;
    }

    Ok(RssiBody::Regular {
        checksum,
        payload: cursor.frame().subset_remaining(payload_offset),
    })
}
