//! Decoded packet representation.

use std::net::IpAddr;

use etherparse::{LinkSlice, NetSlice, SlicedPacket, TransportSlice, VlanSlice};

use super::layer;
use crate::capture::CapturedPacket;
use crate::error::DecodeError;

/// Link type constants from the PCAP link-layer header types registry.
const LINKTYPE_ETHERNET: u16 = 1;
const LINKTYPE_RAW: u16 = 101;

/// A captured packet after protocol decoding.
///
/// Addressing and payload are optional per packet; absence of any of them
/// is normal, not an error.
#[derive(Debug, Clone)]
pub struct DecodedPacket {
    layers: Vec<&'static str>,

    /// Network layer source address, if the packet has a network layer.
    pub src_ip: Option<IpAddr>,

    /// Network layer destination address.
    pub dst_ip: Option<IpAddr>,

    /// Transport layer source port, if the packet has TCP or UDP.
    pub src_port: Option<u16>,

    /// Transport layer destination port.
    pub dst_port: Option<u16>,

    /// Application payload: whatever bytes remain after the last header
    /// the decoder understood. Empty when the packet carries no payload.
    pub payload: Vec<u8>,
}

impl DecodedPacket {
    /// Decode a captured packet's protocol stack.
    ///
    /// Fails with a [`DecodeError`] on link types the decoder does not
    /// understand or bytes that do not parse as the advertised protocol
    /// stack. Callers are expected to treat such failures as per-packet
    /// faults, not fatal conditions.
    pub fn decode(packet: &CapturedPacket) -> Result<Self, DecodeError> {
        let sliced = match packet.link_type {
            LINKTYPE_ETHERNET => SlicedPacket::from_ethernet(&packet.data),
            LINKTYPE_RAW => SlicedPacket::from_ip(&packet.data),
            other => return Err(DecodeError::UnsupportedLinkType { link_type: other }),
        }
        .map_err(|e| DecodeError::Malformed {
            reason: e.to_string(),
        })?;

        let mut layers = Vec::with_capacity(4);
        if sliced.link.is_some() {
            layers.push(layer::ETHERNET);
        }
        if sliced.vlan.is_some() {
            layers.push(layer::VLAN);
        }

        let (src_ip, dst_ip) = match &sliced.net {
            Some(NetSlice::Ipv4(ipv4)) => {
                layers.push(layer::IPV4);
                let header = ipv4.header();
                (
                    Some(IpAddr::V4(header.source_addr())),
                    Some(IpAddr::V4(header.destination_addr())),
                )
            }
            Some(NetSlice::Ipv6(ipv6)) => {
                layers.push(layer::IPV6);
                let header = ipv6.header();
                (
                    Some(IpAddr::V6(header.source_addr())),
                    Some(IpAddr::V6(header.destination_addr())),
                )
            }
            None => (None, None),
        };

        let (src_port, dst_port) = match &sliced.transport {
            Some(TransportSlice::Tcp(tcp)) => {
                layers.push(layer::TCP);
                (Some(tcp.source_port()), Some(tcp.destination_port()))
            }
            Some(TransportSlice::Udp(udp)) => {
                layers.push(layer::UDP);
                (Some(udp.source_port()), Some(udp.destination_port()))
            }
            Some(TransportSlice::Icmpv4(_)) => {
                layers.push(layer::ICMP);
                (None, None)
            }
            Some(TransportSlice::Icmpv6(_)) => {
                layers.push(layer::ICMPV6);
                (None, None)
            }
            None => (None, None),
        };

        Ok(Self {
            layers,
            src_ip,
            dst_ip,
            src_port,
            dst_port,
            payload: application_payload(&sliced).to_vec(),
        })
    }

    /// Layer presence test by name (case-insensitive).
    pub fn has_layer(&self, name: &str) -> bool {
        self.layers.iter().any(|l| l.eq_ignore_ascii_case(name))
    }

    /// Names of the layers present in this packet, outermost first.
    pub fn layers(&self) -> &[&'static str] {
        &self.layers
    }

    /// Whether the packet carries any application payload.
    pub fn has_payload(&self) -> bool {
        !self.payload.is_empty()
    }
}

/// Bytes remaining after the innermost header the decoder understood.
///
/// Transport payload when a transport layer is present, otherwise the
/// network layer payload, otherwise whatever follows the VLAN or Ethernet
/// header. Non-IP frames therefore still expose their payload.
fn application_payload<'a>(sliced: &'a SlicedPacket<'_>) -> &'a [u8] {
    match &sliced.transport {
        Some(TransportSlice::Tcp(tcp)) => tcp.payload(),
        Some(TransportSlice::Udp(udp)) => udp.payload(),
        Some(TransportSlice::Icmpv4(icmp)) => icmp.payload(),
        Some(TransportSlice::Icmpv6(icmp)) => icmp.payload(),
        None => match &sliced.net {
            Some(NetSlice::Ipv4(ipv4)) => ipv4.payload().payload,
            Some(NetSlice::Ipv6(ipv6)) => ipv6.payload().payload,
            None => match &sliced.vlan {
                Some(VlanSlice::SingleVlan(vlan)) => vlan.payload().payload,
                Some(VlanSlice::DoubleVlan(vlan)) => vlan.payload().payload,
                None => match &sliced.link {
                    Some(LinkSlice::Ethernet2(eth)) => eth.payload().payload,
                    Some(LinkSlice::EtherPayload(ether)) => ether.payload,
                    None => &[],
                },
            },
        },
    }
}
