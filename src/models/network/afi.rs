use crate::error::ParserError;
use num_enum::{IntoPrimitive, TryFromPrimitive};
use std::fmt::{Display, Formatter};
use std::net::IpAddr;

/// AFI -- Address Family Identifier
///
/// <https://www.iana.org/assignments/address-family-numbers/address-family-numbers.xhtml>
#[derive(Debug, PartialEq, TryFromPrimitive, IntoPrimitive, Clone, Copy, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u16)]
pub enum Afi {
    Ipv4 = 1,
    Ipv6 = 2,
}

impl From<IpAddr> for Afi {
    #[inline]
    fn from(value: IpAddr) -> Self {
        match value {
            IpAddr::V4(_) => Afi::Ipv4,
            IpAddr::V6(_) => Afi::Ipv6,
        }
    }
}

/// SAFI -- Subsequent Address Family Identifier, restricted to the flowspec SAFIs
///
/// <https://www.iana.org/assignments/safi-namespace/safi-namespace.xhtml>
#[derive(Debug, PartialEq, TryFromPrimitive, IntoPrimitive, Clone, Copy, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum Safi {
    /// RFC 8955/8956 dissemination of flow specification rules
    FlowSpec = 133,
    /// RFC 8955 L3VPN dissemination of flow specification rules
    FlowSpecVpn = 134,
}

/// The grammar a flowspec NLRI is parsed with.
///
/// The address family decides the prefix width and the meaning of type codes 3 and 13, the VPN
/// flag decides whether a route distinguisher leads the NLRI. Callers resolve it once from the
/// negotiated AFI/SAFI and pass it into every parse call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FlowspecFamily {
    pub afi: Afi,
    pub vpn: bool,
}

impl FlowspecFamily {
    pub const IPV4: FlowspecFamily = FlowspecFamily::new(Afi::Ipv4, false);
    pub const IPV6: FlowspecFamily = FlowspecFamily::new(Afi::Ipv6, false);
    pub const IPV4_VPN: FlowspecFamily = FlowspecFamily::new(Afi::Ipv4, true);
    pub const IPV6_VPN: FlowspecFamily = FlowspecFamily::new(Afi::Ipv6, true);

    pub const fn new(afi: Afi, vpn: bool) -> Self {
        FlowspecFamily { afi, vpn }
    }

    pub const fn from_afi_safi(afi: Afi, safi: Safi) -> Self {
        match safi {
            Safi::FlowSpec => FlowspecFamily::new(afi, false),
            Safi::FlowSpecVpn => FlowspecFamily::new(afi, true),
        }
    }

    /// Look up the flowspec grammar for the raw AFI/SAFI codes of an MP_REACH_NLRI or
    /// MP_UNREACH_NLRI attribute. Non-flowspec codes fail with
    /// [ParserError::UnrecognizedEnumVariant].
    pub fn from_codes(afi: u16, safi: u8) -> Result<Self, ParserError> {
        let afi = Afi::try_from(afi)?;
        let safi = Safi::try_from(safi)?;
        Ok(FlowspecFamily::from_afi_safi(afi, safi))
    }

    pub const fn safi(&self) -> Safi {
        match self.vpn {
            true => Safi::FlowSpecVpn,
            false => Safi::FlowSpec,
        }
    }

    pub const fn is_ipv6(&self) -> bool {
        matches!(self.afi, Afi::Ipv6)
    }
}

impl Display for FlowspecFamily {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let afi = match self.afi {
            Afi::Ipv4 => "ipv4",
            Afi::Ipv6 => "ipv6",
        };
        match self.vpn {
            true => write!(f, "{} flowspec vpn", afi),
            false => write!(f, "{} flowspec", afi),
        }
    }
}
