//! Protocol layer filtering.

use crate::decode::DecodedPacket;
use crate::error::{Error, ProtocolError};

/// Optional restriction of the scan to packets exposing a named layer.
///
/// The layer name is validated against the decoder's known set at
/// construction, before any packet is read, so an invalid filter never
/// starts a long scan.
#[derive(Debug, Clone)]
pub struct ProtocolFilter {
    layer: Option<String>,
}

impl ProtocolFilter {
    /// Build a filter, validating `name` against `known_layers`.
    ///
    /// `None` means no filtering. Names are normalized to lowercase to
    /// match the decoder's naming.
    pub fn new(name: Option<String>, known_layers: &[&str]) -> Result<Self, Error> {
        let layer = match name {
            None => None,
            Some(name) => {
                let normalized = name.to_ascii_lowercase();
                if !known_layers.contains(&normalized.as_str()) {
                    return Err(Error::Protocol(ProtocolError::UnknownLayer {
                        name,
                        known: known_layers.join(", "),
                    }));
                }
                Some(normalized)
            }
        };
        Ok(Self { layer })
    }

    /// A filter that accepts every packet.
    pub fn none() -> Self {
        Self { layer: None }
    }

    /// True when no filter is configured or the packet exposes the layer.
    pub fn applies(&self, packet: &DecodedPacket) -> bool {
        match &self.layer {
            None => true,
            Some(layer) => packet.has_layer(layer),
        }
    }

    /// The configured layer name, if any.
    pub fn layer(&self) -> Option<&str> {
        self.layer.as_deref()
    }
}
