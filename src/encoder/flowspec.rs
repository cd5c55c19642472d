use crate::error::ParserError;
use crate::models::*;
use crate::parser::flowspec::MAX_NLRI_LENGTH;
use bytes::{BufMut, Bytes, BytesMut};
use ipnet::IpNet;

/// Write the NLRI length prefix: one byte below 240, otherwise `0xF000 | length` in two bytes.
pub fn encode_nlri_length(length: usize, bytes: &mut BytesMut) -> Result<(), ParserError> {
    if length > MAX_NLRI_LENGTH {
        return Err(ParserError::NlriTooLong(length));
    }
    if length < 240 {
        bytes.put_u8(length as u8);
    } else {
        bytes.put_u16(0xF000 | length as u16);
    }
    Ok(())
}

/// Prefix component body. IPv6 carries the RFC 8956 offset byte and only the pattern bits
/// `offset..length`.
fn encode_prefix(prefix: &FlowspecPrefix, bytes: &mut BytesMut) {
    let bit_len = prefix.prefix.prefix_len();
    bytes.put_u8(bit_len);

    match prefix.prefix {
        IpNet::V4(net) => {
            let byte_len = bit_len.div_ceil(8) as usize;
            bytes.put_slice(&net.addr().octets()[0..byte_len]);
        }
        IpNet::V6(net) => {
            bytes.put_u8(prefix.offset);
            let byte_len = (bit_len - prefix.offset).div_ceil(8) as usize;
            let pattern = u128::from(net.addr())
                .checked_shl(prefix.offset as u32)
                .unwrap_or(0);
            bytes.put_slice(&pattern.to_be_bytes()[0..byte_len]);
        }
    }
}

fn encode_operands<C: Comparator>(operands: &[Operand<C>], bytes: &mut BytesMut) {
    for op in operands {
        bytes.put_u8(op.to_byte());
        bytes.put_uint(op.value, op.value_length as usize);
    }
}

fn encode_component(component: &FlowspecComponent, bytes: &mut BytesMut) {
    bytes.put_u8(component.type_code());

    match component {
        FlowspecComponent::DestinationPrefix(prefix) | FlowspecComponent::SourcePrefix(prefix) => {
            encode_prefix(prefix, bytes)
        }
        FlowspecComponent::TcpFlags(ops) | FlowspecComponent::Fragment(ops) => {
            encode_operands(ops, bytes)
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
        | FlowspecComponent::FlowLabel(ops) => encode_operands(ops, bytes),
    }
}

impl FlowspecRule {
    /// Encode the rule as one NLRI: path id when present, length prefix, route distinguisher for
    /// VPN families, then the components in order.
    pub fn encode(&self) -> Result<Bytes, ParserError> {
        let mut body = BytesMut::new();
        if let Some(rd) = self.route_distinguisher() {
            body.put_slice(rd.as_bytes());
        }
        for component in self.components() {
            encode_component(component, &mut body);
        }

        let mut bytes = BytesMut::with_capacity(body.len() + 6);
        if let Some(path_id) = self.path_id() {
            bytes.put_u32(path_id);
        }
        encode_nlri_length(body.len(), &mut bytes)?;
        bytes.put_slice(&body);
        Ok(bytes.freeze())
    }
}

pub fn encode_flowspec_nlri(rule: &FlowspecRule) -> Result<Bytes, ParserError> {
    rule.encode()
}

/// Concatenate the NLRIs of several rules, as carried in one MP_REACH_NLRI attribute.
pub fn encode_flowspec_nlri_list(rules: &[FlowspecRule]) -> Result<Bytes, ParserError> {
    let mut bytes = BytesMut::new();
    for rule in rules {
        bytes.put_slice(&rule.encode()?);
    }
    Ok(bytes.freeze())
}
