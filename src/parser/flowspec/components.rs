use super::operators::parse_operands;
use crate::error::ParserError;
use crate::models::*;
use crate::parser::ReadUtils;
use ipnet::{IpNet, Ipv4Net, Ipv6Net};
use log::debug;
use std::net::{Ipv4Addr, Ipv6Addr};

/// Parse the body of one component whose type byte has already been read.
pub(crate) fn parse_component(
    input: &mut &[u8],
    type_code: u8,
    family: FlowspecFamily,
) -> Result<FlowspecComponent, ParserError> {
    let component_type = match ComponentType::try_from(type_code) {
        Ok(t) => t,
        Err(_) => {
            debug!("unsupported flowspec component type {}", type_code);
            return Err(ParserError::UnsupportedComponentType(type_code));
        }
    };

    let component = match component_type {
        ComponentType::DestinationPrefix => {
            FlowspecComponent::DestinationPrefix(parse_prefix(input, family)?)
        }
        ComponentType::SourcePrefix => {
            FlowspecComponent::SourcePrefix(parse_prefix(input, family)?)
        }
        ComponentType::IpProtocol => match family.is_ipv6() {
            true => FlowspecComponent::NextHeader(parse_operands(input)?),
            false => FlowspecComponent::IpProtocol(parse_operands(input)?),
        },
        ComponentType::Port => FlowspecComponent::Port(parse_operands(input)?),
        ComponentType::DestinationPort => {
            FlowspecComponent::DestinationPort(parse_operands(input)?)
        }
        ComponentType::SourcePort => FlowspecComponent::SourcePort(parse_operands(input)?),
        ComponentType::IcmpType => FlowspecComponent::IcmpType(parse_operands(input)?),
        ComponentType::IcmpCode => FlowspecComponent::IcmpCode(parse_operands(input)?),
        ComponentType::TcpFlags => FlowspecComponent::TcpFlags(parse_operands(input)?),
        ComponentType::PacketLength => FlowspecComponent::PacketLength(parse_operands(input)?),
        ComponentType::Dscp => FlowspecComponent::Dscp(parse_operands(input)?),
        ComponentType::Fragment => FlowspecComponent::Fragment(parse_operands(input)?),
        ComponentType::FlowLabel => match family.is_ipv6() {
            true => FlowspecComponent::FlowLabel(parse_operands(input)?),
            false => {
                debug!("flow label component in {}", family);
                return Err(ParserError::UnsupportedComponentType(type_code));
            }
        },
    };

    Ok(component)
}

/// Prefix component (types 1 and 2).
///
/// IPv4: `<length> <prefix>`, RFC 8955 Section 4.2.2.1.
/// IPv6: `<length> <offset> <pattern>`, RFC 8956 Section 3.1, where the pattern holds bits
/// `offset..length` of the address.
pub(crate) fn parse_prefix(
    input: &mut &[u8],
    family: FlowspecFamily,
) -> Result<FlowspecPrefix, ParserError> {
    let length = input.read_u8()?;

    match family.afi {
        Afi::Ipv4 => {
            // reject the mask before trusting the byte count derived from it
            Ipv4Net::new(Ipv4Addr::UNSPECIFIED, length)?;
            let mut buffer = [0u8; 4];
            let n_bytes = (length as usize).div_ceil(8);
            input.read_exact(&mut buffer[..n_bytes])?;
            let prefix = Ipv4Net::new(Ipv4Addr::from(buffer), length)?;
            Ok(FlowspecPrefix::new(IpNet::V4(prefix)))
        }
        Afi::Ipv6 => {
            Ipv6Net::new(Ipv6Addr::UNSPECIFIED, length)?;
            let offset = input.read_u8()?;
            if offset > length {
                debug!("ipv6 prefix offset {} past length {}", offset, length);
                return Err(ParserError::InvalidPrefixOffset { offset, length });
            }
            let mut buffer = [0u8; 16];
            let n_bytes = ((length - offset) as usize).div_ceil(8);
            input.read_exact(&mut buffer[..n_bytes])?;
            let pattern = u128::from_be_bytes(buffer);
            let addr = pattern.checked_shr(offset as u32).unwrap_or(0);
            let prefix = Ipv6Net::new(Ipv6Addr::from(addr), length)?;
            Ok(FlowspecPrefix::with_offset(prefix, offset))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_parse_ipv4_prefix() {
        let mut data: &[u8] = &[0x20, 0x0a, 0x00, 0x01, 0x00];
        let prefix = parse_prefix(&mut data, FlowspecFamily::IPV4).unwrap();
        assert_eq!(prefix.prefix, IpNet::from_str("10.0.1.0/32").unwrap());
        assert!(data.is_empty());

        // only ceil(len / 8) bytes are present on the wire
        let mut data: &[u8] = &[0x08, 0xc0, 0x03];
        let prefix = parse_prefix(&mut data, FlowspecFamily::IPV4).unwrap();
        assert_eq!(prefix.prefix, IpNet::from_str("192.0.0.0/8").unwrap());
        assert_eq!(data, &[0x03]);
    }

    #[test]
    fn test_parse_ipv6_prefix() {
        let mut data: &[u8] = &[0x28, 0x00, 0x01, 0x02, 0x03, 0x04, 0x05];
        let prefix = parse_prefix(&mut data, FlowspecFamily::IPV6).unwrap();
        assert_eq!(prefix.prefix, IpNet::from_str("102:304:500::/40").unwrap());
        assert_eq!(prefix.offset, 0);
        assert!(data.is_empty());
    }

    #[test]
    fn test_parse_ipv6_prefix_with_offset() {
        // bits 96..112 of the address: ::1234:0/112
        let mut data: &[u8] = &[0x70, 0x60, 0x12, 0x34];
        let prefix = parse_prefix(&mut data, FlowspecFamily::IPV6).unwrap();
        assert_eq!(prefix.prefix, IpNet::from_str("::1234:0/112").unwrap());
        assert_eq!(prefix.offset, 96);

        let mut data: &[u8] = &[0x10, 0x20];
        assert!(matches!(
            parse_prefix(&mut data, FlowspecFamily::IPV6),
            Err(ParserError::InvalidPrefixOffset {
                offset: 32,
                length: 16
            })
        ));
    }

    #[test]
    fn test_parse_prefix_errors() {
        let mut data: &[u8] = &[0x21, 0x0a, 0x00, 0x01, 0x00, 0x00];
        assert!(matches!(
            parse_prefix(&mut data, FlowspecFamily::IPV4),
            Err(ParserError::InvalidPrefixLength(_))
        ));

        let mut data: &[u8] = &[0x20, 0x0a, 0x00];
        assert!(matches!(
            parse_prefix(&mut data, FlowspecFamily::IPV4),
            Err(ParserError::TruncatedInput)
        ));
    }

    #[test]
    fn test_parse_component_dispatch() {
        let mut data: &[u8] = &[0x81, 0x06];
        let component = parse_component(&mut data, 3, FlowspecFamily::IPV6).unwrap();
        assert_eq!(
            component,
            FlowspecComponent::NextHeader(vec![NumericOperand::equal_to(6)])
        );

        let mut data: &[u8] = &[0x81, 0x06];
        let component = parse_component(&mut data, 3, FlowspecFamily::IPV4).unwrap();
        assert_eq!(
            component,
            FlowspecComponent::IpProtocol(vec![NumericOperand::equal_to(6)])
        );

        let mut data: &[u8] = &[0x81, 0x06];
        assert!(matches!(
            parse_component(&mut data, 14, FlowspecFamily::IPV6),
            Err(ParserError::UnsupportedComponentType(14))
        ));
        let mut data: &[u8] = &[0x81, 0x06];
        assert!(matches!(
            parse_component(&mut data, 13, FlowspecFamily::IPV4),
            Err(ParserError::UnsupportedComponentType(13))
        ));
    }
}
