//! Human-readable rendering of flowspec rules.
//!
//! The rendered sentence is the route key of a flowspec route, so it must stay byte-for-byte stable
//! for a given rule.
use super::component::{FlowspecComponent, FlowspecPrefix, FragmentFlags};
use super::operators::{Comparator, Operand};
use super::rule::FlowspecRule;
use itertools::Itertools;
use std::fmt::{Display, Formatter};

/// Render order of the fragment bits.
const FRAGMENT_NAMES: [(FragmentFlags, &str); 4] = [
    (FragmentFlags::DONT_FRAGMENT, "'DO NOT'"),
    (FragmentFlags::FIRST_FRAGMENT, "'IS FIRST'"),
    (FragmentFlags::LAST_FRAGMENT, "'IS LAST'"),
    (FragmentFlags::IS_FRAGMENT, "'IS A'"),
];

struct FragmentValue(u64);

impl Display for FragmentValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let flags = FragmentFlags::from_bits_truncate((self.0 & 0xff) as u8);
        let mut parts: Vec<String> = FRAGMENT_NAMES
            .iter()
            .filter(|(flag, _)| flags.contains(*flag))
            .map(|(_, name)| name.to_string())
            .collect();

        let unknown = self.0 & !(FragmentFlags::all().bits() as u64);
        if unknown != 0 {
            parts.push(format!("{:#x}", unknown));
        }

        match parts.is_empty() {
            true => write!(f, "0"),
            false => write!(f, "{}", parts.join(" ")),
        }
    }
}

/// Writes `<phrase> <value>` per entry, entries after the first prefixed with `and`/`or` taken
/// from their own AND bit.
fn write_chain<C: Comparator>(
    f: &mut Formatter<'_>,
    ops: &[Operand<C>],
    fragment: bool,
) -> std::fmt::Result {
    for (i, op) in ops.iter().enumerate() {
        if i > 0 {
            match op.and_bit {
                true => write!(f, " and ")?,
                false => write!(f, " or ")?,
            }
        }
        if let Some(phrase) = op.comparator.phrase() {
            write!(f, "{} ", phrase)?;
        }
        match fragment {
            true => write!(f, "{}", FragmentValue(op.value))?,
            false => write!(f, "{}", op.value)?,
        }
    }
    Ok(())
}

impl Display for FlowspecPrefix {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.prefix)?;
        if self.offset != 0 {
            write!(f, " offset {}", self.offset)?;
        }
        Ok(())
    }
}

impl Display for FlowspecComponent {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            FlowspecComponent::DestinationPrefix(p) => write!(f, "to {}", p),
            FlowspecComponent::SourcePrefix(p) => write!(f, "from {}", p),
            FlowspecComponent::TcpFlags(ops) => {
                write!(f, "where {} ", self.field_name())?;
                write_chain(f, ops, false)
            }
            FlowspecComponent::Fragment(ops) => {
                write!(f, "where {} ", self.field_name())?;
                write_chain(f, ops, true)
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
            | FlowspecComponent::FlowLabel(ops) => {
                write!(f, "where {} ", self.field_name())?;
                write_chain(f, ops, false)
            }
        }
    }
}

impl Display for FlowspecRule {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if let Some(rd) = self.route_distinguisher() {
            write!(f, "[l3vpn with route-distinguisher {}] ", rd)?;
        }
        match self.components().is_empty() {
            true => write!(f, "all packets"),
            false => write!(
                f,
                "all packets {}",
                self.components().iter().join(" AND ")
            ),
        }
    }
}
