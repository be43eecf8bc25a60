use crate::protocols::common::error::DecodeError;
use crate::protocols::common::field::FieldSpec;
use crate::protocols::common::frame::Frame;
use crate::protocols::common::tree::Layer;
use crate::protocols::registry::{Dissector, Next};

use super::layout;
use super::parser::{RssiBody, parse_rssi};
use super::schema;

/// Registry entry for RSSI. Regular packets with a non-empty payload hand
/// it to whatever is registered as `axisp`.
#[derive(Debug, Clone, Copy, Default)]
pub struct RssiDissector;

impl Dissector for RssiDissector {
    fn name(&self) -> &'static str {
        layout::PROTOCOL
    }

    fn display_name(&self) -> &'static str {
        "SLAC RSSI Protocol"
    }

    fn schema(&self) -> &'static [FieldSpec] {
        &schema::FIELDS
    }

    fn handoff(&self) -> Option<&'static str> {
        Some(layout::PAYLOAD_PROTOCOL)
    }

    fn dissect<'a>(&self, frame: Frame<'a>, layer: &mut Layer) -> Result<Next<'a>, DecodeError> {
        let packet = parse_rssi(frame, layer)?;
        Ok(match packet.body {
            RssiBody::Syn(_) => Next::Done,
            RssiBody::Regular { payload, .. } if payload.reported_len() == 0 => Next::Done,
            RssiBody::Regular { payload, .. } => Next::Handoff {
                protocol: layout::PAYLOAD_PROTOCOL,
                frame: payload,
            },
        })
    }
}
