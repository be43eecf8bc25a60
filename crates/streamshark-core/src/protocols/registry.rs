//! Protocol registry and hand-off resolution.
//!
//! Decoders never call each other directly. A decoder that wants its
//! remaining bytes decoded returns `Next::Handoff` with a protocol short name;
//! the registry resolves that name at dissection time. Registration order
//! therefore does not matter, and a missing target only downgrades the
//! residual bytes to an unclassified `data` layer.
//!
//! The registry is immutable once built. `default_registry` builds the
//! process-wide instance on first use and hands out shared references.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, trace, warn};

use super::axisp::AxispDissector;
use super::common::error::DecodeError;
use super::common::field::FieldSpec;
use super::common::frame::Frame;
use super::common::tree::{Dissection, Layer};
use super::rssi::RssiDissector;

/// Upper bound on layers per packet; guards against hand-off cycles.
pub const MAX_LAYERS: usize = 8;

/// What a decoder wants done with the bytes it did not consume.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Next<'a> {
    Done,
    Handoff {
        protocol: &'static str,
        frame: Frame<'a>,
    },
}

/// A protocol decoder as seen by the registry.
pub trait Dissector: Send + Sync {
    /// Registry key (e.g., "rssi").
    fn name(&self) -> &'static str;

    fn display_name(&self) -> &'static str {
        self.name()
    }

    /// Every field this decoder can emit.
    fn schema(&self) -> &'static [FieldSpec];

    /// Short name of the protocol this decoder may hand its payload to.
    fn handoff(&self) -> Option<&'static str> {
        None
    }

    /// Decode `frame`, appending fields to `layer`.
    fn dissect<'a>(&self, frame: Frame<'a>, layer: &mut Layer) -> Result<Next<'a>, DecodeError>;
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("unknown protocol '{name}'")]
    UnknownProtocol { name: String },
    #[error("protocol '{name}' registered twice")]
    Duplicate { name: &'static str },
}

/// Registration surface of one protocol, as exported to presentation layers.
#[derive(Debug, Clone, Serialize)]
pub struct ProtocolSchema {
    pub name: &'static str,
    pub display_name: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub handoff: Option<&'static str>,
    pub fields: &'static [FieldSpec],
}

#[derive(Default)]
pub struct RegistryBuilder {
    dissectors: BTreeMap<&'static str, Box<dyn Dissector>>,
}

impl RegistryBuilder {
    pub fn register<D: Dissector + 'static>(mut self, dissector: D) -> Result<Self, RegistryError> {
        let name = dissector.name();
        if self.dissectors.contains_key(name) {
            return Err(RegistryError::Duplicate { name });
        }
        self.dissectors.insert(name, Box::new(dissector));
        Ok(self)
    }

    pub fn build(self) -> Registry {
        Registry {
            dissectors: self.dissectors,
        }
    }
}

/// Immutable name → decoder map.
///
/// # Examples
/// ```
/// use streamshark_core::{AxispDissector, Frame, Registry};
///
/// let registry = Registry::builder().register(AxispDissector)?.build();
/// let bytes = [0u8; 16];
/// let dissection = registry.dissect("axisp", Frame::new(&bytes))?;
/// assert!(dissection.is_ok());
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub struct Registry {
    dissectors: BTreeMap<&'static str, Box<dyn Dissector>>,
}

impl Registry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::default()
    }

    pub fn get(&self, name: &str) -> Option<&dyn Dissector> {
        self.dissectors.get(name).map(|dissector| dissector.as_ref())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.dissectors.contains_key(name)
    }

    /// Registered names in stable order.
    pub fn names(&self) -> Vec<&'static str> {
        self.dissectors.keys().copied().collect()
    }

    pub fn schemas(&self) -> Vec<ProtocolSchema> {
        self.dissectors
            .values()
            .map(|dissector| ProtocolSchema {
                name: dissector.name(),
                display_name: dissector.display_name(),
                handoff: dissector.handoff(),
                fields: dissector.schema(),
            })
            .collect()
    }

    /// Hand-off declarations whose target is not registered, as
    /// `(declaring protocol, missing target)`.
    pub fn unresolved_handoffs(&self) -> Vec<(&'static str, &'static str)> {
        self.dissectors
            .values()
            .filter_map(|dissector| {
                let target = dissector.handoff()?;
                if self.contains(target) {
                    None
                } else {
                    Some((dissector.name(), target))
                }
            })
            .collect()
    }

    /// Decode `frame` as `protocol` and follow hand-offs to completion.
    pub fn dissect(&self, protocol: &str, frame: Frame<'_>) -> Result<Dissection, RegistryError> {
        let dissector = self
            .get(protocol)
            .ok_or_else(|| RegistryError::UnknownProtocol {
                name: protocol.to_string(),
            })?;
        let mut dissection = Dissection::default();
        self.run(dissector, frame, &mut dissection);
        Ok(dissection)
    }

    /// Continue `dissection` by decoding `frame` as the protocol registered
    /// under `name`. An unknown name is recorded as an unresolved hand-off
    /// and the frame becomes an unclassified `data` layer.
    pub fn dissect_handoff(
        &self,
        name: &'static str,
        frame: Frame<'_>,
        dissection: &mut Dissection,
    ) {
        match self.get(name) {
            Some(dissector) => self.run(dissector, frame, dissection),
            None => {
                warn!(
                    protocol = name,
                    offset = frame.base(),
                    "hand-off target not registered; payload left unclassified"
                );
                dissection.unresolved_handoff = Some(name);
                dissection.layers.push(Layer::unclassified(&frame));
            }
        }
    }

    fn run<'a>(&self, first: &dyn Dissector, frame: Frame<'a>, dissection: &mut Dissection) {
        let mut dissector = first;
        let mut frame = frame;
        loop {
            if dissection.layers.len() >= MAX_LAYERS {
                debug!(protocol = dissector.name(), "layer limit reached");
                dissection.layers.push(Layer::unclassified(&frame));
                return;
            }

            let mut layer = Layer::new(dissector.name(), &frame);
            let result = dissector.dissect(frame, &mut layer);
            dissection.layers.push(layer);

            match result {
                Ok(Next::Done) => return,
                Ok(Next::Handoff {
                    protocol,
                    frame: next,
                }) => match self.get(protocol) {
                    Some(target) => {
                        trace!(
                            from = dissector.name(),
                            to = protocol,
                            offset = next.base(),
                            len = next.reported_len(),
                            "hand-off"
                        );
                        dissector = target;
                        frame = next;
                    }
                    None => {
                        self.dissect_handoff(protocol, next, dissection);
                        return;
                    }
                },
                Err(err) => {
                    debug!(protocol = dissector.name(), error = %err, "decode failed");
                    dissection.error = Some(err);
                    return;
                }
            }
        }
    }
}

/// Registry holding every built-in decoder, built once per process.
pub fn default_registry() -> &'static Registry {
    static REGISTRY: OnceLock<Registry> = OnceLock::new();
    REGISTRY.get_or_init(|| {
        Registry::builder()
            .register(RssiDissector)
            .and_then(|builder| builder.register(AxispDissector))
            .inspect_err(|err| warn!(error = %err, "built-in decoder registration failed"))
            .unwrap_or_default()
            .build()
    })
}
