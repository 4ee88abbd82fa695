//! IP range classification
//!
//! Total function from an IP address to a range verdict. The fetch gateway
//! only ever connects to addresses classified as public unicast; everything
//! else (loopback, RFC 1918, link-local, unique-local, multicast, and the
//! IANA special-purpose blocks) is rejected by the destination authorizer.

use std::fmt;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

/// Verdict for a single IP address.
///
/// Pure function of the address; no error cases. `Unspecified` covers the
/// unspecified addresses themselves (0.0.0.0/8, ::) as well as reserved
/// blocks with no public unicast routability (TEST-NETs, benchmarking,
/// 240.0.0.0/4, documentation prefixes).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IpRangeVerdict {
    Loopback,
    Private,
    LinkLocal,
    UniqueLocal,
    Unspecified,
    Multicast,
    PublicUnicast,
}

impl IpRangeVerdict {
    /// Whether the address may be connected to.
    pub fn is_public_unicast(self) -> bool {
        matches!(self, IpRangeVerdict::PublicUnicast)
    }
}

impl fmt::Display for IpRangeVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            IpRangeVerdict::Loopback => "loopback",
            IpRangeVerdict::Private => "private",
            IpRangeVerdict::LinkLocal => "link-local",
            IpRangeVerdict::UniqueLocal => "unique-local",
            IpRangeVerdict::Unspecified => "unspecified/reserved",
            IpRangeVerdict::Multicast => "multicast",
            IpRangeVerdict::PublicUnicast => "public unicast",
        };
        f.write_str(name)
    }
}

/// Classify any IP address into a range verdict.
pub fn classify(ip: IpAddr) -> IpRangeVerdict {
    match ip {
        IpAddr::V4(v4) => classify_v4(v4),
        IpAddr::V6(v6) => classify_v6(v6),
    }
}

fn classify_v4(ip: Ipv4Addr) -> IpRangeVerdict {
    let octets = ip.octets();

    if octets[0] == 0 {
        return IpRangeVerdict::Unspecified;
    }
    if ip.is_loopback() {
        return IpRangeVerdict::Loopback;
    }
    // RFC 1918 plus carrier-grade NAT (100.64.0.0/10)
    if ip.is_private() || (octets[0] == 100 && (octets[1] & 0b1100_0000) == 0b0100_0000) {
        return IpRangeVerdict::Private;
    }
    if ip.is_link_local() {
        return IpRangeVerdict::LinkLocal;
    }
    if ip.is_multicast() {
        return IpRangeVerdict::Multicast;
    }
    if is_reserved_v4(octets) {
        return IpRangeVerdict::Unspecified;
    }

    IpRangeVerdict::PublicUnicast
}

/// IANA special-purpose IPv4 blocks that are neither private nor routable.
fn is_reserved_v4(octets: [u8; 4]) -> bool {
    // 192.0.0.0/24 (IETF protocol assignments)
    if octets[0] == 192 && octets[1] == 0 && octets[2] == 0 {
        return true;
    }
    // TEST-NET-1/2/3 (RFC 5737)
    if (octets[0] == 192 && octets[1] == 0 && octets[2] == 2)
        || (octets[0] == 198 && octets[1] == 51 && octets[2] == 100)
        || (octets[0] == 203 && octets[1] == 0 && octets[2] == 113)
    {
        return true;
    }
    // 198.18.0.0/15 (benchmarking, RFC 2544)
    if octets[0] == 198 && (octets[1] & 0b1111_1110) == 18 {
        return true;
    }
    // 240.0.0.0/4 (reserved) including 255.255.255.255 broadcast
    octets[0] >= 240
}

fn classify_v6(ip: Ipv6Addr) -> IpRangeVerdict {
    if ip.is_unspecified() {
        return IpRangeVerdict::Unspecified;
    }
    // ::1 must be checked before any IPv4-embedding unwrap
    if ip.is_loopback() {
        return IpRangeVerdict::Loopback;
    }

    // IPv4-mapped (::ffff:a.b.c.d) classifies as the embedded IPv4
    if let Some(v4) = ip.to_ipv4_mapped() {
        return classify_v4(v4);
    }

    let segments = ip.segments();

    // Deprecated IPv4-compatible embedding (::a.b.c.d) still resolves in
    // practice, so it classifies as the embedded IPv4 too
    if segments[0..6] == [0, 0, 0, 0, 0, 0] && (segments[6] != 0 || segments[7] > 1) {
        return classify_v4(embedded_v4(segments));
    }
    // NAT64 well-known prefix 64:ff9b::/96
    if segments[0] == 0x64 && segments[1] == 0xff9b && segments[2..6] == [0, 0, 0, 0] {
        return classify_v4(embedded_v4(segments));
    }

    // fc00::/7 unique local
    if (segments[0] & 0xfe00) == 0xfc00 {
        return IpRangeVerdict::UniqueLocal;
    }
    // fe80::/10 link local
    if (segments[0] & 0xffc0) == 0xfe80 {
        return IpRangeVerdict::LinkLocal;
    }
    // ff00::/8 multicast
    if (segments[0] & 0xff00) == 0xff00 {
        return IpRangeVerdict::Multicast;
    }
    // 2001:db8::/32 documentation
    if segments[0] == 0x2001 && segments[1] == 0x0db8 {
        return IpRangeVerdict::Unspecified;
    }

    IpRangeVerdict::PublicUnicast
}

/// Extract the IPv4 address embedded in the last 32 bits.
fn embedded_v4(segments: [u16; 8]) -> Ipv4Addr {
    Ipv4Addr::new(
        (segments[6] >> 8) as u8,
        segments[6] as u8,
        (segments[7] >> 8) as u8,
        segments[7] as u8,
    )
}
