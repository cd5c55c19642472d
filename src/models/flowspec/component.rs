use super::operators::{validate_chain, BitmaskOperand, NumericOperand};
use crate::error::ParserError;
use crate::models::FlowspecFamily;
use bitflags::bitflags;
use ipnet::{IpNet, Ipv4Net, Ipv6Net};
use num_enum::{IntoPrimitive, TryFromPrimitive};
use std::net::Ipv6Addr;

/// Flowspec component type codes (RFC 8955 Section 4, RFC 8956 Section 3)
///
/// Code 3 is the IPv4 protocol or the IPv6 next header depending on the family. Code 13 only
/// exists for IPv6.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, TryFromPrimitive, IntoPrimitive,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum ComponentType {
    DestinationPrefix = 1,
    SourcePrefix = 2,
    IpProtocol = 3,
    Port = 4,
    DestinationPort = 5,
    SourcePort = 6,
    IcmpType = 7,
    IcmpCode = 8,
    TcpFlags = 9,
    PacketLength = 10,
    Dscp = 11,
    Fragment = 12,
    FlowLabel = 13,
}

bitflags! {
    /// Fragment bitmask values (RFC 8955 Section 4.2.2.12)
    #[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct FragmentFlags: u8 {
        /// DF, don't fragment
        const DONT_FRAGMENT = 0x01;
        /// IsF, is a fragment other than the first
        const IS_FRAGMENT = 0x02;
        /// FF, first fragment
        const FIRST_FRAGMENT = 0x04;
        /// LF, last fragment
        const LAST_FRAGMENT = 0x08;
    }
}

/// Destination or source prefix of a rule.
///
/// `offset` is the RFC 8956 IPv6 prefix offset: the number of leading bits skipped before the
/// encoded pattern starts. Always 0 for IPv4.
///
/// Only address bits `offset..length` travel on the wire. The constructors clear host bits, and a
/// rule clears every bit outside that range when it is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FlowspecPrefix {
    pub prefix: IpNet,
    pub offset: u8,
}

impl FlowspecPrefix {
    pub fn new(prefix: IpNet) -> Self {
        FlowspecPrefix {
            prefix: prefix.trunc(),
            offset: 0,
        }
    }

    pub fn with_offset(prefix: Ipv6Net, offset: u8) -> Self {
        FlowspecPrefix {
            prefix: IpNet::V6(prefix.trunc()),
            offset,
        }
    }

    /// Copy with every address bit outside `offset..length` cleared.
    pub(crate) fn canonical(&self) -> Result<Self, ParserError> {
        let prefix = match self.prefix {
            IpNet::V4(net) => IpNet::V4(net.trunc()),
            IpNet::V6(net) => {
                let pattern_mask = u128::MAX.checked_shr(self.offset as u32).unwrap_or(0);
                let addr = u128::from(net.trunc().addr()) & pattern_mask;
                IpNet::V6(Ipv6Net::new(Ipv6Addr::from(addr), net.prefix_len())?)
            }
        };
        Ok(FlowspecPrefix {
            prefix,
            offset: self.offset,
        })
    }

    fn validate(&self) -> Result<(), ParserError> {
        let length = self.prefix.prefix_len();
        let valid = match self.prefix {
            IpNet::V4(_) => self.offset == 0,
            IpNet::V6(_) => self.offset <= length,
        };
        match valid {
            true => Ok(()),
            false => Err(ParserError::InvalidPrefixOffset {
                offset: self.offset,
                length,
            }),
        }
    }
}

impl From<Ipv4Net> for FlowspecPrefix {
    fn from(value: Ipv4Net) -> Self {
        FlowspecPrefix::new(IpNet::V4(value))
    }
}

impl From<Ipv6Net> for FlowspecPrefix {
    fn from(value: Ipv6Net) -> Self {
        FlowspecPrefix::new(IpNet::V6(value))
    }
}

/// One match criterion of a flowspec rule.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FlowspecComponent {
    /// Type 1
    DestinationPrefix(FlowspecPrefix),
    /// Type 2
    SourcePrefix(FlowspecPrefix),
    /// Type 3, IPv4 only
    IpProtocol(Vec<NumericOperand>),
    /// Type 3, IPv6 only
    NextHeader(Vec<NumericOperand>),
    /// Type 4, matches source or destination port
    Port(Vec<NumericOperand>),
    /// Type 5
    DestinationPort(Vec<NumericOperand>),
    /// Type 6
    SourcePort(Vec<NumericOperand>),
    /// Type 7
    IcmpType(Vec<NumericOperand>),
    /// Type 8
    IcmpCode(Vec<NumericOperand>),
    /// Type 9
    TcpFlags(Vec<BitmaskOperand>),
    /// Type 10, total IP packet length
    PacketLength(Vec<NumericOperand>),
    /// Type 11
    Dscp(Vec<NumericOperand>),
    /// Type 12, values are [FragmentFlags] bits
    Fragment(Vec<BitmaskOperand>),
    /// Type 13, IPv6 only
    FlowLabel(Vec<NumericOperand>),
}

impl FlowspecComponent {
    pub fn component_type(&self) -> ComponentType {
        match self {
            FlowspecComponent::DestinationPrefix(_) => ComponentType::DestinationPrefix,
            FlowspecComponent::SourcePrefix(_) => ComponentType::SourcePrefix,
            FlowspecComponent::IpProtocol(_) | FlowspecComponent::NextHeader(_) => {
                ComponentType::IpProtocol
            }
            FlowspecComponent::Port(_) => ComponentType::Port,
            FlowspecComponent::DestinationPort(_) => ComponentType::DestinationPort,
            FlowspecComponent::SourcePort(_) => ComponentType::SourcePort,
            FlowspecComponent::IcmpType(_) => ComponentType::IcmpType,
            FlowspecComponent::IcmpCode(_) => ComponentType::IcmpCode,
            FlowspecComponent::TcpFlags(_) => ComponentType::TcpFlags,
            FlowspecComponent::PacketLength(_) => ComponentType::PacketLength,
            FlowspecComponent::Dscp(_) => ComponentType::Dscp,
            FlowspecComponent::Fragment(_) => ComponentType::Fragment,
            FlowspecComponent::FlowLabel(_) => ComponentType::FlowLabel,
        }
    }

    /// Wire type code.
    #[inline]
    pub fn type_code(&self) -> u8 {
        self.component_type().into()
    }

    /// Name used by the rule renderer.
    pub fn field_name(&self) -> &'static str {
        match self {
            FlowspecComponent::DestinationPrefix(_) => "destination prefix",
            FlowspecComponent::SourcePrefix(_) => "source prefix",
            FlowspecComponent::IpProtocol(_) => "IP protocol",
            FlowspecComponent::NextHeader(_) => "next header",
            FlowspecComponent::Port(_) => "port",
            FlowspecComponent::DestinationPort(_) => "destination port",
            FlowspecComponent::SourcePort(_) => "source port",
            FlowspecComponent::IcmpType(_) => "ICMP type",
            FlowspecComponent::IcmpCode(_) => "ICMP code",
            FlowspecComponent::TcpFlags(_) => "TCP flags",
            FlowspecComponent::PacketLength(_) => "packet length",
            FlowspecComponent::Dscp(_) => "DSCP",
            FlowspecComponent::Fragment(_) => "fragment",
            FlowspecComponent::FlowLabel(_) => "flow label",
        }
    }

    fn supports_family(&self, family: FlowspecFamily) -> bool {
        match self {
            FlowspecComponent::DestinationPrefix(p) | FlowspecComponent::SourcePrefix(p) => {
                p.prefix.addr().is_ipv6() == family.is_ipv6()
            }
            FlowspecComponent::IpProtocol(_) => !family.is_ipv6(),
            FlowspecComponent::NextHeader(_) | FlowspecComponent::FlowLabel(_) => {
                family.is_ipv6()
            }
            _ => true,
        }
    }

    /// Check that the component belongs to `family` and that its prefix or operand chain is
    /// well formed.
    pub(crate) fn validate(&self, family: FlowspecFamily) -> Result<(), ParserError> {
        let code = self.type_code();
        if !self.supports_family(family) {
            return Err(ParserError::ComponentFamilyMismatch {
                component: code,
                family,
            });
        }

        match self {
            FlowspecComponent::DestinationPrefix(p) | FlowspecComponent::SourcePrefix(p) => {
                p.validate()
            }
            FlowspecComponent::TcpFlags(ops) | FlowspecComponent::Fragment(ops) => {
                validate_chain(code, ops)
            }
            FlowspecComponent::IpProtocol(ops)
            | FlowspecComponent::NextHeader(ops)
            | FlowspecComponent::Port(ops)
            | FlowspecComponent::DestinationPort(ops)
            | FlowspecComponent::SourcePort(ops)
            | FlowspecComponent::IcmpType(ops)
            | FlowspecComponent::IcmpCode(ops)
            | FlowspecComponent::PacketLength(ops)
            | FlowspecComponent::Dscp(ops)
            | FlowspecComponent::FlowLabel(ops) => validate_chain(code, ops),
        }
    }

    /// Prefix components with their bits outside the carried pattern cleared.
    pub(crate) fn canonical(self) -> Result<Self, ParserError> {
        match self {
            FlowspecComponent::DestinationPrefix(p) => {
                Ok(FlowspecComponent::DestinationPrefix(p.canonical()?))
            }
            FlowspecComponent::SourcePrefix(p) => {
                Ok(FlowspecComponent::SourcePrefix(p.canonical()?))
            }
            other => Ok(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_component_type_codes() {
        let component = FlowspecComponent::NextHeader(vec![NumericOperand::equal_to(6)]);
        assert_eq!(component.type_code(), 3);
        assert_eq!(component.component_type(), ComponentType::IpProtocol);

        let component = FlowspecComponent::FlowLabel(vec![NumericOperand::equal_to(6)]);
        assert_eq!(component.type_code(), 13);

        assert_eq!(ComponentType::try_from(11u8).unwrap(), ComponentType::Dscp);
        assert!(ComponentType::try_from(14u8).is_err());
        assert!(ComponentType::try_from(0u8).is_err());
    }

    #[test]
    fn test_family_checks() {
        let protocol = FlowspecComponent::IpProtocol(vec![NumericOperand::equal_to(6)]);
        assert!(protocol.validate(FlowspecFamily::IPV4).is_ok());
        assert!(matches!(
            protocol.validate(FlowspecFamily::IPV6),
            Err(ParserError::ComponentFamilyMismatch { component: 3, .. })
        ));

        let label = FlowspecComponent::FlowLabel(vec![NumericOperand::equal_to(258)]);
        assert!(label.validate(FlowspecFamily::IPV6_VPN).is_ok());
        assert!(label.validate(FlowspecFamily::IPV4).is_err());

        let prefix = FlowspecComponent::DestinationPrefix(FlowspecPrefix::from(
            Ipv4Net::from_str("10.0.1.0/24").unwrap(),
        ));
        assert!(prefix.validate(FlowspecFamily::IPV4).is_ok());
        assert!(prefix.validate(FlowspecFamily::IPV6).is_err());
    }

    #[test]
    fn test_prefix_offset_validation() {
        let net = Ipv6Net::from_str("2001:db8::/32").unwrap();
        let ok = FlowspecComponent::SourcePrefix(FlowspecPrefix::with_offset(net, 16));
        assert!(ok.validate(FlowspecFamily::IPV6).is_ok());

        let bad = FlowspecComponent::SourcePrefix(FlowspecPrefix::with_offset(net, 40));
        assert!(matches!(
            bad.validate(FlowspecFamily::IPV6),
            Err(ParserError::InvalidPrefixOffset {
                offset: 40,
                length: 32
            })
        ));

        let v4 = FlowspecPrefix {
            prefix: IpNet::from_str("10.0.0.0/8").unwrap(),
            offset: 1,
        };
        assert!(FlowspecComponent::SourcePrefix(v4)
            .validate(FlowspecFamily::IPV4)
            .is_err());
    }

    #[test]
    fn test_prefix_bits_cleared() {
        let prefix = FlowspecPrefix::from(Ipv4Net::from_str("10.0.1.5/24").unwrap());
        assert_eq!(prefix.prefix, IpNet::from_str("10.0.1.0/24").unwrap());

        // struct literals keep whatever they were given until a rule is built
        let prefix = FlowspecPrefix {
            prefix: IpNet::from_str("10.0.1.5/24").unwrap(),
            offset: 0,
        };
        assert_eq!(
            prefix.canonical().unwrap().prefix,
            IpNet::from_str("10.0.1.0/24").unwrap()
        );

        let prefix =
            FlowspecPrefix::with_offset(Ipv6Net::from_str("2001::1234:ff/112").unwrap(), 96);
        assert_eq!(prefix.prefix, IpNet::from_str("2001::1234:0/112").unwrap());
        let prefix = prefix.canonical().unwrap();
        assert_eq!(prefix.prefix, IpNet::from_str("::1234:0/112").unwrap());
        assert_eq!(prefix.offset, 96);

        let full = FlowspecPrefix::with_offset(Ipv6Net::from_str("2001::1/128").unwrap(), 128);
        assert_eq!(
            full.canonical().unwrap().prefix,
            IpNet::from_str("::/128").unwrap()
        );
    }

    #[test]
    fn test_fragment_flags() {
        let flags = FragmentFlags::from_bits_truncate(0x0e);
        assert!(flags.contains(FragmentFlags::IS_FRAGMENT));
        assert!(flags.contains(FragmentFlags::FIRST_FRAGMENT | FragmentFlags::LAST_FRAGMENT));
        assert!(!flags.contains(FragmentFlags::DONT_FRAGMENT));
    }
}
