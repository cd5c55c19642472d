//! Flowspec traffic-filtering actions in the BGP Extended Communities attribute
//!
//! RFC4360: <https://datatracker.ietf.org/doc/html/rfc4360#section-4.5>
//! RFC8955: <https://datatracker.ietf.org/doc/html/rfc8955#section-7>

use crate::models::*;
use crate::parser::ReadUtils;
use crate::ParserError;
use log::debug;

/// Parse an extended communities attribute value holding flowspec actions.
///
/// Each community is 8 bytes. A community that is not one of the four flowspec actions fails the
/// whole attribute.
pub fn parse_flowspec_actions(mut input: &[u8]) -> Result<Vec<FlowspecAction>, ParserError> {
    if input.len() % 8 != 0 {
        debug!(
            "extended communities length {} is not a multiple of 8",
            input.len()
        );
        return Err(ParserError::TruncatedInput);
    }

    let mut actions = Vec::with_capacity(input.len() / 8);
    while !input.is_empty() {
        actions.push(parse_flowspec_action(&mut input)?);
    }
    Ok(actions)
}

/// Parse one 8-byte extended community as a flowspec action.
pub fn parse_flowspec_action(input: &mut &[u8]) -> Result<FlowspecAction, ParserError> {
    input.has_n_remaining(8)?;
    let ec_type = input.read_u8()?;
    let subtype = input.read_u8()?;

    let unsupported = || {
        debug!(
            "unsupported extended community type {:#04x} subtype {:#04x}",
            ec_type, subtype
        );
        ParserError::UnsupportedExtendedCommunityType { ec_type, subtype }
    };
    if ec_type != FLOWSPEC_EXTENDED_COMMUNITY_TYPE {
        return Err(unsupported());
    }
    let subtype = FlowspecActionSubtype::try_from(subtype).map_err(|_| unsupported())?;

    let action = match subtype {
        FlowspecActionSubtype::TrafficRate => {
            let asn = input.read_u16()?;
            let rate_bps = f32::from_bits(input.read_u32()?);
            FlowspecAction::TrafficRate { asn, rate_bps }
        }
        FlowspecActionSubtype::TrafficAction => {
            let mut value = [0u8; 6];
            input.read_exact(&mut value)?;
            FlowspecAction::TrafficAction {
                sample: value[5] & 0x02 != 0,
                terminal_action: value[5] & 0x01 != 0,
            }
        }
        FlowspecActionSubtype::Redirect => {
            let asn = input.read_u16()?;
            let mut local_admin = [0u8; 4];
            input.read_exact(&mut local_admin)?;
            FlowspecAction::Redirect { asn, local_admin }
        }
        FlowspecActionSubtype::TrafficMarking => {
            let mut value = [0u8; 6];
            input.read_exact(&mut value)?;
            FlowspecAction::TrafficMarking {
                dscp: value[5] & MAX_DSCP,
            }
        }
    };

    Ok(action)
}

impl FlowspecAction {
    /// Decode a single 8-byte extended community.
    pub fn from_bytes(bytes: [u8; 8]) -> Result<Self, ParserError> {
        parse_flowspec_action(&mut &bytes[..])
    }
}
