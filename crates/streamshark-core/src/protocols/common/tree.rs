use serde::Serialize;

use super::error::DecodeError;
use super::field::{DecodedField, FieldSpec, FieldValue};
use super::frame::Frame;

/// Protocol name of the layer used for bytes no decoder claimed.
pub const DATA_PROTOCOL: &str = "data";
pub const DATA_FIELD: FieldSpec = FieldSpec::bytes("Data", "data.data");

/// Fields produced by one protocol decoder for one frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Layer {
    pub protocol: &'static str,
    pub offset: usize,
    pub length: usize,
    pub fields: Vec<DecodedField>,
}

impl Layer {
    pub fn new(protocol: &'static str, frame: &Frame<'_>) -> Self {
        Self {
            protocol,
            offset: frame.base(),
            length: frame.reported_len(),
            fields: Vec::new(),
        }
    }

    /// Layer holding an opaque range nothing could decode.
    pub fn unclassified(frame: &Frame<'_>) -> Self {
        let mut layer = Self::new(DATA_PROTOCOL, frame);
        layer.fields.push(DecodedField::new(
            &DATA_FIELD,
            frame.base(),
            frame.reported_len(),
            FieldValue::Bytes(frame.data().to_vec()),
        ));
        layer
    }

    pub fn field(&self, abbrev: &str) -> Option<&DecodedField> {
        self.fields.iter().find(|field| field.abbrev == abbrev)
    }
}

/// Result of decoding one packet: the layers in decode order, plus the
/// failure that stopped decoding, if any.
///
/// # Examples
/// ```
/// use streamshark_core::{Frame, default_registry};
///
/// let bytes = [0x40, 0x08, 0x01, 0x02, 0x00, 0x00, 0xbe, 0xef];
/// let dissection = default_registry().dissect("rssi", Frame::new(&bytes))?;
/// assert!(dissection.is_ok());
/// assert_eq!(dissection.protocols(), vec!["rssi"]);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Dissection {
    pub layers: Vec<Layer>,
    /// Hand-off target that was requested but is not registered.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unresolved_handoff: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<DecodeError>,
}

impl Dissection {
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }

    pub fn layer(&self, protocol: &str) -> Option<&Layer> {
        self.layers.iter().find(|layer| layer.protocol == protocol)
    }

    pub fn fields(&self) -> impl Iterator<Item = &DecodedField> {
        self.layers.iter().flat_map(|layer| layer.fields.iter())
    }

    pub fn field(&self, abbrev: &str) -> Option<&DecodedField> {
        self.fields().find(|field| field.abbrev == abbrev)
    }

    pub fn protocols(&self) -> Vec<&'static str> {
        self.layers.iter().map(|layer| layer.protocol).collect()
    }
}
