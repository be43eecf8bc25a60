use serde::Serialize;
use thiserror::Error;

/// Per-packet decode failure.
///
/// Decoding stops at the failing field; the fields produced before it stay
/// in the `Dissection`.
///
/// # Examples
/// ```
/// use streamshark_core::DecodeError;
///
/// let err = DecodeError::NegativePayloadLength {
///     protocol: "axisp",
///     reported: 15,
///     overhead: 16,
/// };
/// assert!(err.is_malformed());
/// assert!(err.to_string().contains("negative axisp payload length"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DecodeError {
    #[error(
        "malformed {protocol} frame: need {needed} bytes at offset {offset}, reported length {reported}"
    )]
    MalformedFrame {
        protocol: &'static str,
        offset: usize,
        needed: usize,
        reported: usize,
    },
    #[error(
        "negative {protocol} payload length: reported length {reported} is below the {overhead} bytes of header and tail"
    )]
    NegativePayloadLength {
        protocol: &'static str,
        reported: usize,
        overhead: usize,
    },
    #[error(
        "{protocol} capture truncated: need {needed} bytes at offset {offset}, captured {captured}"
    )]
    CaptureTruncated {
        protocol: &'static str,
        offset: usize,
        needed: usize,
        captured: usize,
    },
}

impl DecodeError {
    pub fn protocol(&self) -> &'static str {
        match self {
            DecodeError::MalformedFrame { protocol, .. }
            | DecodeError::NegativePayloadLength { protocol, .. }
            | DecodeError::CaptureTruncated { protocol, .. } => protocol,
        }
    }

    /// Stable identifier used for report aggregation.
    pub fn kind(&self) -> &'static str {
        match self {
            DecodeError::MalformedFrame { .. } => "malformed_frame",
            DecodeError::NegativePayloadLength { .. } => "negative_payload_length",
            DecodeError::CaptureTruncated { .. } => "capture_truncated",
        }
    }

    /// True for frames whose reported length cannot hold the layout.
    pub fn is_malformed(&self) -> bool {
        matches!(
            self,
            DecodeError::MalformedFrame { .. } | DecodeError::NegativePayloadLength { .. }
        )
    }
}
