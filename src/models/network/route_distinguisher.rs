use crate::models::ToHexString;
use std::fmt::{Display, Formatter};
use std::net::Ipv4Addr;

/// Route Distinguisher -- 8-byte value scoping a VPN route, RFC 4364 section 4.2.
///
/// Kept as raw bytes so that every type, including ones this crate cannot interpret, survives a
/// parse/encode cycle unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RouteDistinguisher(pub [u8; 8]);

impl RouteDistinguisher {
    /// Type 0: 2-byte AS administrator, 4-byte assigned number.
    pub fn two_octet_as(asn: u16, assigned: u32) -> Self {
        let mut bytes = [0u8; 8];
        bytes[2..4].copy_from_slice(&asn.to_be_bytes());
        bytes[4..].copy_from_slice(&assigned.to_be_bytes());
        RouteDistinguisher(bytes)
    }

    /// Type 1: IPv4 address administrator, 2-byte assigned number.
    pub fn ipv4(addr: Ipv4Addr, assigned: u16) -> Self {
        let mut bytes = [0u8; 8];
        bytes[1] = 1;
        bytes[2..6].copy_from_slice(&addr.octets());
        bytes[6..].copy_from_slice(&assigned.to_be_bytes());
        RouteDistinguisher(bytes)
    }

    /// Type 2: 4-byte AS administrator, 2-byte assigned number.
    pub fn four_octet_as(asn: u32, assigned: u16) -> Self {
        let mut bytes = [0u8; 8];
        bytes[1] = 2;
        bytes[2..6].copy_from_slice(&asn.to_be_bytes());
        bytes[6..].copy_from_slice(&assigned.to_be_bytes());
        RouteDistinguisher(bytes)
    }

    pub fn rd_type(&self) -> u16 {
        u16::from_be_bytes([self.0[0], self.0[1]])
    }

    pub fn as_bytes(&self) -> &[u8; 8] {
        &self.0
    }
}

impl From<[u8; 8]> for RouteDistinguisher {
    fn from(value: [u8; 8]) -> Self {
        RouteDistinguisher(value)
    }
}

impl Display for RouteDistinguisher {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let b = &self.0;
        match self.rd_type() {
            0 => write!(
                f,
                "0:{}:{}",
                u16::from_be_bytes([b[2], b[3]]),
                u32::from_be_bytes([b[4], b[5], b[6], b[7]])
            ),
            1 => write!(
                f,
                "{}:{}",
                Ipv4Addr::new(b[2], b[3], b[4], b[5]),
                u16::from_be_bytes([b[6], b[7]])
            ),
            2 => write!(
                f,
                "{}:{}",
                u32::from_be_bytes([b[2], b[3], b[4], b[5]]),
                u16::from_be_bytes([b[6], b[7]])
            ),
            t => write!(f, "{}:{}", t, ToHexString(&b[2..])),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rd_display() {
        assert_eq!(RouteDistinguisher::two_octet_as(5, 3).to_string(), "0:5:3");
        assert_eq!(
            RouteDistinguisher([0, 1, 1, 2, 3, 4, 0, 10]).to_string(),
            "1.2.3.4:10"
        );
        assert_eq!(
            RouteDistinguisher::four_octet_as(400000, 7).to_string(),
            "400000:7"
        );
        assert_eq!(
            RouteDistinguisher([0, 9, 0xde, 0xad, 0xbe, 0xef, 0, 1]).to_string(),
            "9:DEADBEEF0001"
        );
    }

    #[test]
    fn test_rd_constructors() {
        let rd = RouteDistinguisher::ipv4(Ipv4Addr::new(1, 2, 3, 4), 10);
        assert_eq!(rd.as_bytes(), &[0, 1, 1, 2, 3, 4, 0, 10]);
        assert_eq!(rd.rd_type(), 1);

        let rd = RouteDistinguisher::two_octet_as(65000, 100);
        assert_eq!(rd.as_bytes(), &[0, 0, 0xfd, 0xe8, 0, 0, 0, 100]);
    }
}
