use crate::error::ParserError;
use crate::models::ToHexString;
use num_enum::{IntoPrimitive, TryFromPrimitive};
use std::fmt::{Display, Formatter};

/// High-order type byte shared by the flowspec traffic-filtering extended communities
/// (generic transitive experimental use).
pub const FLOWSPEC_EXTENDED_COMMUNITY_TYPE: u8 = 0x80;

/// Largest DSCP value, the field is 6 bits wide.
pub const MAX_DSCP: u8 = 0x3F;

/// Subtypes of the flowspec traffic-filtering extended communities (RFC 8955 Section 7)
#[derive(Debug, PartialEq, TryFromPrimitive, IntoPrimitive, Clone, Copy, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum FlowspecActionSubtype {
    TrafficRate = 0x06,
    TrafficAction = 0x07,
    Redirect = 0x08,
    TrafficMarking = 0x09,
}

/// Traffic-filtering action carried as an 8-byte extended community.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FlowspecAction {
    /// Rate limit in bits per second, 0 discards. `asn` is informational.
    TrafficRate { asn: u16, rate_bps: f32 },
    TrafficAction { sample: bool, terminal_action: bool },
    /// Redirect to the VRF identified by the route target `asn:local_admin`.
    Redirect { asn: u16, local_admin: [u8; 4] },
    /// Rewrite DSCP. Values above [MAX_DSCP] are rejected when encoding.
    TrafficMarking { dscp: u8 },
}

impl FlowspecAction {
    /// Traffic-marking action with a DSCP checked against the 6-bit field.
    pub fn traffic_marking(dscp: u8) -> Result<Self, ParserError> {
        match dscp <= MAX_DSCP {
            true => Ok(FlowspecAction::TrafficMarking { dscp }),
            false => Err(ParserError::InvalidDscp(dscp)),
        }
    }

    pub fn subtype(&self) -> FlowspecActionSubtype {
        match self {
            FlowspecAction::TrafficRate { .. } => FlowspecActionSubtype::TrafficRate,
            FlowspecAction::TrafficAction { .. } => FlowspecActionSubtype::TrafficAction,
            FlowspecAction::Redirect { .. } => FlowspecActionSubtype::Redirect,
            FlowspecAction::TrafficMarking { .. } => FlowspecActionSubtype::TrafficMarking,
        }
    }
}

impl Display for FlowspecAction {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            FlowspecAction::TrafficRate { asn, rate_bps } => {
                write!(f, "traffic-rate:{}:{}", asn, rate_bps)
            }
            FlowspecAction::TrafficAction {
                sample,
                terminal_action,
            } => write!(
                f,
                "traffic-action:sample={}:terminal={}",
                sample, terminal_action
            ),
            FlowspecAction::Redirect { asn, local_admin } => {
                write!(f, "redirect:{}:{}", asn, ToHexString(local_admin))
            }
            FlowspecAction::TrafficMarking { dscp } => write!(f, "traffic-marking:{}", dscp),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subtype_codes() {
        let action = FlowspecAction::TrafficMarking { dscp: 63 };
        assert_eq!(u8::from(action.subtype()), 0x09);
        assert_eq!(
            FlowspecActionSubtype::try_from(0x08u8).unwrap(),
            FlowspecActionSubtype::Redirect
        );
        assert!(FlowspecActionSubtype::try_from(0x0au8).is_err());
    }

    #[test]
    fn test_traffic_marking_constructor() {
        assert_eq!(
            FlowspecAction::traffic_marking(46).unwrap(),
            FlowspecAction::TrafficMarking { dscp: 46 }
        );
        assert!(FlowspecAction::traffic_marking(MAX_DSCP).is_ok());
        assert!(matches!(
            FlowspecAction::traffic_marking(64),
            Err(ParserError::InvalidDscp(64))
        ));
    }

    #[test]
    fn test_display() {
        let action = FlowspecAction::TrafficRate {
            asn: 72,
            rate_bps: 1250.0,
        };
        assert_eq!(action.to_string(), "traffic-rate:72:1250");

        let action = FlowspecAction::TrafficAction {
            sample: true,
            terminal_action: false,
        };
        assert_eq!(
            action.to_string(),
            "traffic-action:sample=true:terminal=false"
        );

        let action = FlowspecAction::Redirect {
            asn: 35,
            local_admin: [4, 2, 8, 7],
        };
        assert_eq!(action.to_string(), "redirect:35:04020807");
    }
}
