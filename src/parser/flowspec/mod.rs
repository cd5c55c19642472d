//! Flowspec NLRI parsing (RFC 8955 Section 4, RFC 8956 Section 3)
//!
//! ```text
//! [path id (4, add-path only)] [length (1 or 2)] [route distinguisher (8, VPN only)] [components]
//! ```
//! The route distinguisher is counted in the NLRI length.

mod components;
mod operators;

use crate::error::ParserError;
use crate::models::*;
use crate::parser::ReadUtils;
use components::parse_component;
use log::debug;

/// Longest NLRI the 12-bit length field can describe.
pub const MAX_NLRI_LENGTH: usize = 0x0FFF;

/// Read the 1 or 2 byte NLRI length prefix.
///
/// A first byte below `0xF0` is the length itself (0-239). Otherwise its low nibble and the second
/// byte form a 12-bit length (up to 4095).
pub fn parse_nlri_length(input: &mut &[u8]) -> Result<usize, ParserError> {
    let first = input.read_u8()?;
    if first < 0xF0 {
        return Ok(first as usize);
    }
    let second = input.read_u8()?;
    Ok((((first & 0x0F) as usize) << 8) | second as usize)
}

/// Parse one flowspec NLRI from the front of `input`, advancing it past the NLRI.
///
/// Component type codes must be strictly increasing and the components must end exactly at the
/// declared length.
pub fn parse_flowspec_nlri(
    input: &mut &[u8],
    family: FlowspecFamily,
    add_path: bool,
) -> Result<FlowspecRule, ParserError> {
    let path_id = match add_path {
        true => Some(input.read_u32()?),
        false => None,
    };

    let declared = parse_nlri_length(input)?;
    if input.len() < declared {
        debug!(
            "flowspec NLRI declares {} bytes, only {} left",
            declared,
            input.len()
        );
        return Err(ParserError::TruncatedInput);
    }

    let start = input.len();
    let route_distinguisher = match family.vpn {
        true => Some(input.read_route_distinguisher()?),
        false => None,
    };

    let mut components = Vec::new();
    let mut last_type = 0u8;
    while start - input.len() < declared {
        let type_code = input.read_u8()?;
        if type_code <= last_type && !components.is_empty() {
            debug!(
                "flowspec component type {} after type {}",
                type_code, last_type
            );
            return Err(ParserError::OutOfOrderComponent {
                previous: last_type,
                found: type_code,
            });
        }
        last_type = type_code;

        components.push(parse_component(input, type_code, family)?);
    }

    let consumed = start - input.len();
    if consumed != declared {
        debug!(
            "flowspec NLRI declares {} bytes, components took {}",
            declared, consumed
        );
        return Err(ParserError::LengthMismatch { declared, consumed });
    }

    FlowspecRule::from_parts(family, route_distinguisher, path_id, components)
}

/// Parse a buffer holding exactly one flowspec NLRI.
///
/// Bytes left after the NLRI are reported as [ParserError::LengthMismatch] with `declared` being
/// the buffer length.
pub fn parse_rule_list(
    data: &[u8],
    family: FlowspecFamily,
    add_path: bool,
) -> Result<FlowspecRule, ParserError> {
    let mut input = data;
    let rule = parse_flowspec_nlri(&mut input, family, add_path)?;
    if !input.is_empty() {
        return Err(ParserError::LengthMismatch {
            declared: data.len(),
            consumed: data.len() - input.len(),
        });
    }
    Ok(rule)
}

/// Parse the flowspec NLRIs packed back-to-back in an MP_REACH_NLRI or MP_UNREACH_NLRI
/// attribute. Any malformed NLRI fails the whole list.
pub fn parse_flowspec_nlri_list(
    mut data: &[u8],
    family: FlowspecFamily,
    add_path: bool,
) -> Result<Vec<FlowspecRule>, ParserError> {
    let mut rules = Vec::new();
    while !data.is_empty() {
        rules.push(parse_flowspec_nlri(&mut data, family, add_path)?);
    }
    Ok(rules)
}
