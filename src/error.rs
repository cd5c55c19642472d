/*!
error module defines the error types used in bgp-flowspec.
*/
use crate::models::FlowspecFamily;
use num_enum::{TryFromPrimitive, TryFromPrimitiveError};
use thiserror::Error;

/// Every variant is fatal for the NLRI or attribute being processed. A malformed component
/// rejects the whole rule and a malformed community rejects the whole action list.
#[derive(Debug, Error)]
pub enum ParserError {
    /// This error represents a [num_enum::TryFromPrimitiveError] error for any of a number of
    /// different types.
    ///
    /// ## Occurs during:
    ///  - Resolving raw AFI/SAFI codes with [FlowspecFamily::from_codes]
    #[error("unrecognized value {value} for {type_name}")]
    UnrecognizedEnumVariant { type_name: &'static str, value: u64 },
    /// The buffer is shorter than a declared length, or ends in the middle of a field.
    #[error("input truncated")]
    TruncatedInput,
    /// The components of a rule did not end exactly at the declared NLRI length.
    #[error("declared NLRI length {declared} does not match {consumed} bytes consumed")]
    LengthMismatch { declared: usize, consumed: usize },
    /// Component type codes must be strictly increasing within a rule.
    #[error("component type {found} follows component type {previous}")]
    OutOfOrderComponent { previous: u8, found: u8 },
    #[error("unsupported flowspec component type {0}")]
    UnsupportedComponentType(u8),
    #[error("unsupported extended community type {ec_type:#04x} subtype {subtype:#04x}")]
    UnsupportedExtendedCommunityType { ec_type: u8, subtype: u8 },
    /// The operand chain is malformed. Carries the offending operator byte.
    ///
    /// ## Occurs during:
    ///  - Parsing an operand whose value width runs past the buffer
    ///  - Building a rule whose chain is empty, unterminated or has a value wider than its width
    #[error("invalid operand with operator byte {0:#04x}")]
    InvalidOperand(u8),
    /// A numeric or bitmask component carried no operand at all.
    #[error("component type {0} has an empty operand list")]
    EmptyOperandChain(u8),
    /// This error represents a [ipnet::PrefixLenError] error. It occurs if an address mask is
    /// larger than the length of the address it is being applied to.
    #[error("invalid network prefix mask")]
    InvalidPrefixLength(#[from] ipnet::PrefixLenError),
    /// An IPv6 prefix offset beyond the prefix length (RFC 8956 Section 3.1), or any offset on an
    /// IPv4 prefix.
    #[error("invalid prefix offset {offset} for prefix length {length}")]
    InvalidPrefixOffset { offset: u8, length: u8 },
    #[error("component type {component} is not valid for {family}")]
    ComponentFamilyMismatch {
        component: u8,
        family: FlowspecFamily,
    },
    #[error("route distinguisher required for {0}")]
    MissingRouteDistinguisher(FlowspecFamily),
    #[error("route distinguisher not allowed for {0}")]
    UnexpectedRouteDistinguisher(FlowspecFamily),
    /// A traffic-marking action whose DSCP does not fit in 6 bits.
    #[error("DSCP value {0} exceeds 63")]
    InvalidDscp(u8),
    /// The encoded rule does not fit the 12-bit NLRI length field.
    #[error("NLRI length {0} exceeds 4095 bytes")]
    NlriTooLong(usize),
}

impl<T> From<TryFromPrimitiveError<T>> for ParserError
where
    T: TryFromPrimitive,
    T::Primitive: Into<u64>,
{
    #[inline]
    fn from(value: TryFromPrimitiveError<T>) -> Self {
        ParserError::UnrecognizedEnumVariant {
            type_name: T::NAME,
            value: value.number.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Afi, Safi};

    #[test]
    fn test_enum_variant_error() {
        let err: ParserError = Afi::try_from(7u16).unwrap_err().into();
        assert!(matches!(
            err,
            ParserError::UnrecognizedEnumVariant {
                type_name: "Afi",
                value: 7
            }
        ));

        let err: ParserError = Safi::try_from(200u8).unwrap_err().into();
        assert_eq!(err.to_string(), "unrecognized value 200 for Safi");
    }

    #[test]
    fn test_error_display() {
        let err = ParserError::UnsupportedExtendedCommunityType {
            ec_type: 0x0b,
            subtype: 0x0b,
        };
        assert_eq!(
            err.to_string(),
            "unsupported extended community type 0x0b subtype 0x0b"
        );

        let err = ParserError::LengthMismatch {
            declared: 4,
            consumed: 6,
        };
        assert_eq!(
            err.to_string(),
            "declared NLRI length 4 does not match 6 bytes consumed"
        );

        let err = ParserError::ComponentFamilyMismatch {
            component: 13,
            family: FlowspecFamily::IPV4,
        };
        assert_eq!(
            err.to_string(),
            "component type 13 is not valid for ipv4 flowspec"
        );
    }
}
