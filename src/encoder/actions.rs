use crate::error::ParserError;
use crate::models::*;
use bytes::{BufMut, Bytes, BytesMut};

impl FlowspecAction {
    /// Encode as an 8-byte extended community. Reserved bits are written as zero.
    ///
    /// A traffic-marking DSCP above 63 has no wire form and fails with
    /// [ParserError::InvalidDscp].
    pub fn encode(&self) -> Result<[u8; 8], ParserError> {
        let mut bytes = [0u8; 8];
        bytes[0] = FLOWSPEC_EXTENDED_COMMUNITY_TYPE;
        bytes[1] = self.subtype().into();

        match self {
            FlowspecAction::TrafficRate { asn, rate_bps } => {
                bytes[2..4].copy_from_slice(&asn.to_be_bytes());
                bytes[4..8].copy_from_slice(&rate_bps.to_bits().to_be_bytes());
            }
            FlowspecAction::TrafficAction {
                sample,
                terminal_action,
            } => {
                bytes[7] = ((*sample as u8) << 1) | *terminal_action as u8;
            }
            FlowspecAction::Redirect { asn, local_admin } => {
                bytes[2..4].copy_from_slice(&asn.to_be_bytes());
                bytes[4..8].copy_from_slice(local_admin);
            }
            FlowspecAction::TrafficMarking { dscp } => {
                if *dscp > MAX_DSCP {
                    return Err(ParserError::InvalidDscp(*dscp));
                }
                bytes[7] = *dscp;
            }
        }
        Ok(bytes)
    }
}

/// Encode actions as the value of an extended communities attribute. Any action that cannot be
/// encoded fails the whole attribute.
pub fn encode_flowspec_actions(actions: &[FlowspecAction]) -> Result<Bytes, ParserError> {
    let mut bytes = BytesMut::with_capacity(actions.len() * 8);
    for action in actions {
        bytes.put_slice(&action.encode()?);
    }
    Ok(bytes.freeze())
}
