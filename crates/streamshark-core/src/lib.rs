//! streamshark core library: RSSI and AXISP protocol decoding.
//!
//! The crate has two layers. `protocols` holds the byte-level decoders
//! (layout/schema/parser/dissector per protocol) and the registry that
//! resolves hand-offs between them by short name. Around it sits an offline
//! pipeline: packet sources feed UDP extraction, every matching datagram is
//! dissected, and the results are aggregated into a deterministic report.
//! Decoding is side-effect free; all I/O is isolated in `source` modules.
//!
//! Invariants:
//! - Every decoded field lies within the frame's reported length.
//! - A derived payload length is never negative; such frames fail instead.
//! - A failed decode keeps every field produced before the failure.
//! - Report outputs are deterministic and stable across runs.
//!
//! # Examples
//! ```
//! use streamshark_core::{Frame, default_registry};
//!
//! let mut bytes = vec![0x40, 0x08, 0x01, 0x02, 0x00, 0x00, 0xbe, 0xef];
//! bytes.extend_from_slice(&[0x14, 0, 0, 0, 0, 0, 0, 0x80, 0, 0x01, 0, 0, 0, 0, 0, 0]);
//!
//! let dissection = default_registry().dissect("rssi", Frame::new(&bytes))?;
//! assert_eq!(dissection.protocols(), vec!["rssi", "axisp"]);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ```no_run
//! use std::path::Path;
//!
//! use streamshark_core::{DecodeOptions, analyze_pcap_file};
//!
//! let report = analyze_pcap_file(Path::new("capture.pcapng"), &DecodeOptions::default())?;
//! println!("decoded: {}", report.decode.decoded);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use serde::Serialize;

mod analysis;
pub mod protocols;
mod source;

pub use analysis::{
    AnalysisError, DecodeOptions, MAX_ERROR_EXAMPLES, analyze_pcap_file, analyze_source,
    analyze_with_registry,
};
pub use protocols::axisp::AxispDissector;
pub use protocols::common::{
    DecodeError, DecodedField, DisplayRadix, Dissection, FieldKind, FieldSpec, FieldValue, Frame,
    Layer,
};
pub use protocols::registry::{
    Dissector, Next, ProtocolSchema, Registry, RegistryBuilder, RegistryError, default_registry,
};
pub use protocols::rssi::RssiDissector;
pub use source::{PacketEvent, PacketSource, PcapFileSource, SourceError};

/// Current report schema version.
pub const REPORT_VERSION: u32 = 1;
/// Default timestamp used when no capture time is available.
pub const DEFAULT_GENERATED_AT: &str = "1970-01-01T00:00:00Z";

/// Decode report with deterministic ordering.
///
/// # Examples
/// ```
/// use streamshark_core::make_stub_report;
///
/// let report = make_stub_report("capture.pcapng", 123);
/// assert_eq!(report.report_version, streamshark_core::REPORT_VERSION);
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct DecodeReport {
    /// Report schema version (not the binary version).
    pub report_version: u32,
    /// Tool identification metadata.
    pub tool: ToolInfo,
    /// RFC3339 timestamp representing the report generation time.
    pub generated_at: String,

    /// Input capture metadata.
    pub input: InputInfo,

    /// Optional capture summary (may be empty when unavailable).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capture_summary: Option<CaptureSummary>,
    /// Top-level protocol every datagram was decoded as.
    pub protocol: String,
    /// Decode counters.
    pub decode: DecodeSummary,
    /// Error summaries ordered by kind, then protocol.
    pub errors: Vec<ErrorSummary>,
    /// Per-datagram dissections in capture order.
    pub packets: Vec<PacketRecord>,
}

/// Tool metadata embedded in reports.
///
/// # Examples
/// ```
/// use streamshark_core::ToolInfo;
///
/// let tool = ToolInfo {
///     name: "streamshark".to_string(),
///     version: "0.1.0".to_string(),
/// };
/// assert_eq!(tool.name, "streamshark");
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct ToolInfo {
    pub name: String,
    /// Tool version (semver).
    pub version: String,
}

/// Input capture metadata embedded in reports.
#[derive(Debug, Clone, Serialize)]
pub struct InputInfo {
    /// Input path as provided to the analyzer.
    pub path: String,
    /// Input size in bytes.
    pub bytes: u64,
}

/// Basic capture summary (timestamps may be absent).
#[derive(Debug, Clone, Serialize)]
pub struct CaptureSummary {
    /// Total packet count observed in the capture.
    pub packets_total: u64,
    /// RFC3339 timestamp of the first packet (if known).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_start: Option<String>,
    /// RFC3339 timestamp of the last packet (if known).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_end: Option<String>,
}

/// Decode counters over every datagram that passed the port filter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DecodeSummary {
    pub udp_datagrams: u64,
    /// Datagrams decoded without error (unresolved hand-offs included).
    pub decoded: u64,
    /// Frames whose reported length cannot hold the layout.
    pub malformed: u64,
    /// Frames cut short by the capture snap length.
    pub truncated: u64,
    pub unresolved_handoffs: u64,
    pub syn_packets: u64,
    pub regular_packets: u64,
    /// AXISP frames decoded in full.
    pub axisp_frames: u64,
}

/// Aggregated occurrences of one decode error kind.
///
/// # Examples
/// ```
/// use streamshark_core::ErrorSummary;
///
/// let summary = ErrorSummary {
///     kind: "malformed_frame".to_string(),
///     protocol: "rssi".to_string(),
///     count: 1,
///     examples: vec!["packet 0 10.0.0.1:8198 @ 1970-01-01T00:00:00Z: ...".to_string()],
/// };
/// assert_eq!(summary.count, 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorSummary {
    /// Stable error identifier (e.g., `malformed_frame`).
    pub kind: String,
    /// Protocol whose decoder failed.
    pub protocol: String,
    pub count: u64,
    /// At most three example contexts, formatted as `packet N ip:port @ ts: message`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub examples: Vec<String>,
}

/// One decoded UDP datagram.
#[derive(Debug, Clone, Serialize)]
pub struct PacketRecord {
    /// Zero-based index of the packet in the capture.
    pub index: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    /// Source endpoint in `ip:port` form.
    pub src: String,
    /// Destination endpoint in `ip:port` form.
    pub dst: String,
    #[serde(flatten)]
    pub dissection: Dissection,
}

/// Build a stub report with base fields filled and empty aggregates.
///
/// # Examples
/// ```
/// use streamshark_core::make_stub_report;
///
/// let report = make_stub_report("capture.pcapng", 123);
/// assert_eq!(report.protocol, "rssi");
/// assert!(report.packets.is_empty());
/// ```
pub fn make_stub_report(input_path: &str, input_bytes: u64) -> DecodeReport {
    DecodeReport {
        report_version: REPORT_VERSION,
        tool: ToolInfo {
            name: "streamshark".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        },
        generated_at: DEFAULT_GENERATED_AT.to_string(),
        input: InputInfo {
            path: input_path.to_string(),
            bytes: input_bytes,
        },
        capture_summary: None,
        protocol: DecodeOptions::default().protocol,
        decode: DecodeSummary::default(),
        errors: vec![],
        packets: vec![],
    }
}
