use std::path::Path;

use thiserror::Error;
use time::{OffsetDateTime, format_description::well_known::Rfc3339};
use tracing::{debug, info};

use crate::protocols::common::frame::Frame;
use crate::protocols::registry::{Registry, RegistryError, default_registry};
use crate::protocols::rssi::layout as rssi_layout;
use crate::source::{PacketEvent, PacketSource, PcapFileSource, SourceError};
use crate::{
    CaptureSummary, DEFAULT_GENERATED_AT, DecodeReport, InputInfo, PacketRecord, make_stub_report,
};

mod summary;
mod udp;

pub use summary::MAX_ERROR_EXAMPLES;

use summary::DecodeStats;
use udp::parse_udp_packet;

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Source error: {0}")]
    Source(#[from] SourceError),
    #[error("Registry error: {0}")]
    Registry(#[from] RegistryError),
}

/// Pipeline options.
///
/// # Examples
/// ```
/// use streamshark_core::DecodeOptions;
///
/// let options = DecodeOptions::default();
/// assert_eq!(options.protocol, "rssi");
/// assert!(options.accepts_port(8198, 9000));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeOptions {
    /// Protocol each UDP payload is decoded as.
    pub protocol: String,
    /// UDP ports to decode; a datagram matches when either port is listed.
    /// Empty means every port.
    pub ports: Vec<u16>,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            protocol: rssi_layout::PROTOCOL.to_string(),
            ports: Vec::new(),
        }
    }
}

impl DecodeOptions {
    pub fn accepts_port(&self, src_port: u16, dst_port: u16) -> bool {
        self.ports.is_empty() || self.ports.contains(&src_port) || self.ports.contains(&dst_port)
    }
}

pub fn analyze_pcap_file(
    path: &Path,
    options: &DecodeOptions,
) -> Result<DecodeReport, AnalysisError> {
    let bytes = path.metadata()?.len();
    let source = PcapFileSource::open(path)?;
    let input = InputInfo {
        path: path.display().to_string(),
        bytes,
    };
    analyze_source(input, source, options)
}

pub fn analyze_source<S: PacketSource>(
    input: InputInfo,
    source: S,
    options: &DecodeOptions,
) -> Result<DecodeReport, AnalysisError> {
    analyze_with_registry(default_registry(), input, source, options)
}

/// Run the pipeline against an explicit registry.
pub fn analyze_with_registry<S: PacketSource>(
    registry: &Registry,
    input: InputInfo,
    mut source: S,
    options: &DecodeOptions,
) -> Result<DecodeReport, AnalysisError> {
    if !registry.contains(&options.protocol) {
        return Err(RegistryError::UnknownProtocol {
            name: options.protocol.clone(),
        }
        .into());
    }

    let mut packets_total = 0u64;
    let mut first_ts = None;
    let mut last_ts = None;
    let mut stats = DecodeStats::new();
    let mut packets = Vec::new();

    while let Some(event) = source.next_packet()? {
        let index = packets_total;
        packets_total += 1;
        update_ts_bounds(&mut first_ts, &mut last_ts, event.ts);

        let udp = match parse_udp_packet(event.linktype, &event.data) {
            Ok(Some(udp)) => udp,
            Ok(None) => continue,
            Err(err) => {
                debug!(index, error = %err, "skipping packet without usable UDP datagram");
                continue;
            }
        };
        if !options.accepts_port(udp.src_port, udp.dst_port) {
            continue;
        }

        stats.add_datagram();
        let frame = datagram_frame(&event, udp.payload);
        let dissection = registry.dissect(&options.protocol, frame)?;
        let timestamp = ts_to_rfc3339(event.ts);
        let src = udp.src_endpoint();
        let dst = udp.dst_endpoint();
        let context = match &timestamp {
            Some(ts) => format!("packet {index} {src} @ {ts}"),
            None => format!("packet {index} {src}"),
        };
        stats.add_dissection(&dissection, &context);
        packets.push(PacketRecord {
            index,
            timestamp,
            src,
            dst,
            dissection,
        });
    }

    info!(
        packets_total,
        datagrams = packets.len(),
        failed = stats.failed(),
        "capture decoded"
    );

    let mut report = make_stub_report(&input.path, input.bytes);
    report.protocol = options.protocol.clone();
    report.capture_summary = Some(CaptureSummary {
        packets_total,
        time_start: ts_to_rfc3339(first_ts),
        time_end: ts_to_rfc3339(last_ts),
    });
    report.generated_at = report
        .capture_summary
        .as_ref()
        .and_then(|summary| summary.time_end.clone().or(summary.time_start.clone()))
        .unwrap_or_else(|| DEFAULT_GENERATED_AT.to_string());
    let (decode, errors) = stats.finish();
    report.decode = decode;
    report.errors = errors;
    report.packets = packets;
    Ok(report)
}

/// Frame over a UDP payload; bytes cut from the capture count against the
/// payload's reported length.
fn datagram_frame<'a>(event: &PacketEvent, payload: &'a [u8]) -> Frame<'a> {
    Frame::with_reported_len(payload, payload.len() + event.truncated_by())
}

fn update_ts_bounds(first: &mut Option<f64>, last: &mut Option<f64>, ts: Option<f64>) {
    let ts = match ts {
        Some(ts) => ts,
        None => return,
    };
    match first {
        None => *first = Some(ts),
        Some(existing) => {
            if ts < *existing {
                *first = Some(ts);
            }
        }
    }
    match last {
        None => *last = Some(ts),
        Some(existing) => {
            if ts > *existing {
                *last = Some(ts);
            }
        }
    }
}

fn ts_to_rfc3339(ts: Option<f64>) -> Option<String> {
    let ts = ts?;
    let nanos = (ts * 1_000_000_000.0) as i128;
    OffsetDateTime::from_unix_timestamp_nanos(nanos)
        .ok()
        .and_then(|dt| dt.format(&Rfc3339).ok())
}
