use std::collections::BTreeMap;

use crate::protocols::axisp::layout as axisp_layout;
use crate::protocols::common::tree::Dissection;
use crate::protocols::rssi::layout as rssi_layout;
use crate::protocols::rssi::schema as rssi_schema;
use crate::{DecodeSummary, ErrorSummary};

/// At most this many example contexts are kept per error kind.
pub const MAX_ERROR_EXAMPLES: usize = 3;

/// Accumulates per-packet dissections into report aggregates.
#[derive(Debug, Default)]
pub struct DecodeStats {
    summary: DecodeSummary,
    errors: BTreeMap<(&'static str, &'static str), ErrorSummary>,
}

impl DecodeStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_datagram(&mut self) {
        self.summary.udp_datagrams += 1;
    }

    /// Fold one dissection in; `context` describes where it came from.
    pub fn add_dissection(&mut self, dissection: &Dissection, context: &str) {
        match &dissection.error {
            None => self.summary.decoded += 1,
            Some(err) => {
                if err.is_malformed() {
                    self.summary.malformed += 1;
                } else {
                    self.summary.truncated += 1;
                }
                let entry = self
                    .errors
                    .entry((err.kind(), err.protocol()))
                    .or_insert_with(|| ErrorSummary {
                        kind: err.kind().to_string(),
                        protocol: err.protocol().to_string(),
                        count: 0,
                        examples: Vec::new(),
                    });
                entry.count += 1;
                if entry.examples.len() < MAX_ERROR_EXAMPLES {
                    entry.examples.push(format!("{context}: {err}"));
                }
            }
        }

        if dissection.unresolved_handoff.is_some() {
            self.summary.unresolved_handoffs += 1;
        }

        if dissection.layer(rssi_layout::PROTOCOL).is_some() {
            match dissection
                .field(rssi_schema::FLAG_SYN.abbrev)
                .and_then(|field| field.value.as_bool())
            {
                Some(true) => self.summary.syn_packets += 1,
                Some(false) => self.summary.regular_packets += 1,
                None => {}
            }
        }

        let axisp_failed = dissection
            .error
            .as_ref()
            .is_some_and(|err| err.protocol() == axisp_layout::PROTOCOL);
        if dissection.layer(axisp_layout::PROTOCOL).is_some() && !axisp_failed {
            self.summary.axisp_frames += 1;
        }
    }

    pub fn failed(&self) -> u64 {
        self.summary.malformed + self.summary.truncated
    }

    /// Finish aggregation; error summaries are ordered by kind, then protocol.
    pub fn finish(self) -> (DecodeSummary, Vec<ErrorSummary>) {
        (self.summary, self.errors.into_values().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::{DecodeStats, MAX_ERROR_EXAMPLES};
    use crate::protocols::common::frame::Frame;
    use crate::protocols::registry::default_registry;

    fn dissect(bytes: &[u8]) -> crate::protocols::common::tree::Dissection {
        default_registry()
            .dissect("rssi", Frame::new(bytes))
            .expect("rssi registered")
    }

    #[test]
    fn counts_variants_and_axisp_frames() {
        let mut stats = DecodeStats::new();
        let mut regular = vec![0x40, 0x08, 0x01, 0x02, 0x00, 0x00, 0xbe, 0xef];
        regular.extend_from_slice(&[0x14, 0, 0, 0, 0, 0, 0, 0x80]);
        regular.extend_from_slice(&[0, 0x01, 0, 0, 0, 0, 0, 0]);
        let mut syn = vec![0x80, 0x18, 0x00, 0x00];
        syn.extend_from_slice(&[0u8; 18]);

        stats.add_datagram();
        stats.add_dissection(&dissect(&regular), "packet 0");
        stats.add_datagram();
        stats.add_dissection(&dissect(&syn), "packet 1");

        let (summary, errors) = stats.finish();
        assert_eq!(summary.udp_datagrams, 2);
        assert_eq!(summary.decoded, 2);
        assert_eq!(summary.regular_packets, 1);
        assert_eq!(summary.syn_packets, 1);
        assert_eq!(summary.axisp_frames, 1);
        assert!(errors.is_empty());
    }

    #[test]
    fn failed_axisp_is_not_counted_as_frame() {
        let mut stats = DecodeStats::new();
        let mut packet = vec![0x40, 0x08, 0x01, 0x02, 0x00, 0x00, 0xbe, 0xef];
        packet.extend_from_slice(&[0u8; 10]);
        stats.add_dissection(&dissect(&packet), "packet 0");

        assert_eq!(stats.failed(), 1);
        let (summary, errors) = stats.finish();
        assert_eq!(summary.axisp_frames, 0);
        assert_eq!(summary.malformed, 1);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, "negative_payload_length");
        assert_eq!(errors[0].protocol, "axisp");
    }

    #[test]
    fn examples_are_capped() {
        let mut stats = DecodeStats::new();
        for index in 0..5 {
            stats.add_dissection(&dissect(&[0x40, 0x08]), &format!("packet {index}"));
        }
        let (summary, errors) = stats.finish();
        assert_eq!(summary.malformed, 5);
        assert_eq!(errors[0].count, 5);
        assert_eq!(errors[0].examples.len(), MAX_ERROR_EXAMPLES);
        assert!(errors[0].examples[0].starts_with("packet 0: "));
    }
}
