//! Protocol layer names understood by the decoder.

/// Canonical layer names, used for filter validation and presence tests.
pub mod layer {
    pub const ETHERNET: &str = "ethernet";
    pub const VLAN: &str = "vlan";
    pub const IPV4: &str = "ipv4";
    pub const IPV6: &str = "ipv6";
    pub const TCP: &str = "tcp";
    pub const UDP: &str = "udp";
    pub const ICMP: &str = "icmp";
    pub const ICMPV6: &str = "icmpv6";
}

/// The full set of layer names this decoder can report.
///
/// Protocol filters are validated against this set before a scan starts,
/// so the set tracks the decoder rather than being fixed at the call sites.
pub fn known_layers() -> &'static [&'static str] {
    &[
        layer::ETHERNET,
        layer::VLAN,
        layer::IPV4,
        layer::IPV6,
        layer::TCP,
        layer::UDP,
        layer::ICMP,
        layer::ICMPV6,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_layers_contains_transport_and_network() {
        let layers = known_layers();
        assert!(layers.contains(&"tcp"));
        assert!(layers.contains(&"udp"));
        assert!(layers.contains(&"ipv4"));
        assert!(layers.contains(&"ipv6"));
    }

    #[test]
    fn known_layers_are_lowercase() {
        for name in known_layers() {
            assert_eq!(*name, name.to_lowercase());
        }
    }
}
