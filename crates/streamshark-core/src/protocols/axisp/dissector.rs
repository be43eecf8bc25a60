use crate::protocols::common::error::DecodeError;
use crate::protocols::common::field::FieldSpec;
use crate::protocols::common::frame::Frame;
use crate::protocols::common::tree::Layer;
use crate::protocols::registry::{Dissector, Next};

use super::layout;
use super::parser::parse_axisp;
use super::schema;

/// Registry entry for AXISP. Terminal: the payload is never handed on.
#[derive(Debug, Clone, Copy, Default)]
pub struct AxispDissector;

impl Dissector for AxispDissector {
    fn name(&self) -> &'static str {
        layout::PROTOCOL
    }

    fn display_name(&self) -> &'static str {
        "AXI Stream Packet Protocol"
    }

    fn schema(&self) -> &'static [FieldSpec] {
        &schema::FIELDS
    }

    fn dissect<'a>(&self, frame: Frame<'a>, layer: &mut Layer) -> Result<Next<'a>, DecodeError> {
        parse_axisp(frame, layer)?;
        Ok(Next::Done)
    }
}
