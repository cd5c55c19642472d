use crate::error::ParserError;
use bitflags::bitflags;
use std::fmt::Debug;
use std::hash::Hash;

bitflags! {
    /// Numeric comparison bits of an operator byte (RFC 8955 Section 4.2.1.1)
    ///
    /// Any subset is legal: `GREATER_THAN | EQUALS` is ">=", the empty set never matches.
    #[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct NumericComparator: u8 {
        const LESS_THAN = 0x04;
        const GREATER_THAN = 0x02;
        const EQUALS = 0x01;
    }
}

bitflags! {
    /// Bitmask comparison bits of an operator byte (RFC 8955 Section 4.2.1.2)
    ///
    /// `MATCH` selects a partial match (`data & value == value`), without it the match is exact.
    #[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct BitmaskComparator: u8 {
        const NOT = 0x02;
        const MATCH = 0x01;
    }
}

/// The comparator half of an operator byte.
///
/// Implemented by [NumericComparator] and [BitmaskComparator] so that one operand type and one
/// chain codec serve every match field.
pub trait Comparator: Copy + Eq + Hash + Debug {
    /// Operator byte bits owned by the comparator. Remaining low bits are reserved.
    const MASK: u8;

    fn from_operator_byte(byte: u8) -> Self;

    fn to_operator_bits(&self) -> u8;

    /// Text used by the rule renderer, `None` when no comparison bit is set.
    fn phrase(&self) -> Option<&'static str>;
}

impl Comparator for NumericComparator {
    const MASK: u8 = 0x07;

    fn from_operator_byte(byte: u8) -> Self {
        NumericComparator::from_bits_truncate(byte & Self::MASK)
    }

    fn to_operator_bits(&self) -> u8 {
        self.bits()
    }

    fn phrase(&self) -> Option<&'static str> {
        let lt = self.contains(NumericComparator::LESS_THAN);
        let gt = self.contains(NumericComparator::GREATER_THAN);
        let eq = self.contains(NumericComparator::EQUALS);
        match (lt, gt, eq) {
            (false, false, false) => None,
            (false, false, true) => Some("equals to"),
            (true, false, false) => Some("is less than"),
            (false, true, false) => Some("is greater than"),
            (true, false, true) => Some("is less than or equals to"),
            (false, true, true) => Some("is greater than or equals to"),
            (true, true, false) => Some("is not equal to"),
            (true, true, true) => Some("is less than or greater than or equals to"),
        }
    }
}

impl Comparator for BitmaskComparator {
    const MASK: u8 = 0x03;

    fn from_operator_byte(byte: u8) -> Self {
        BitmaskComparator::from_bits_truncate(byte & Self::MASK)
    }

    fn to_operator_bits(&self) -> u8 {
        self.bits()
    }

    fn phrase(&self) -> Option<&'static str> {
        let not = self.contains(BitmaskComparator::NOT);
        let matching = self.contains(BitmaskComparator::MATCH);
        match (not, matching) {
            (true, true) => Some("does not match"),
            (false, true) => Some("does match"),
            (true, false) => Some("is not"),
            (false, false) => None,
        }
    }
}

/// One entry of an operand chain: `[e][a][len len][reserved][comparator]` followed by a big-endian
/// value of `value_length` bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Operand<C> {
    /// End-of-list flag (bit 7), set on the last entry of a chain only
    pub end_of_list: bool,
    /// AND flag (bit 6): this entry is ANDed with the previous one, otherwise ORed
    pub and_bit: bool,
    /// Value length in octets (bits 5-4): 00=1, 01=2, 10=4, 11=8
    pub value_length: u8,
    pub comparator: C,
    pub value: u64,
}

pub type NumericOperand = Operand<NumericComparator>;
pub type BitmaskOperand = Operand<BitmaskComparator>;

/// Value width in bytes selected by bits 5-4 of an operator byte.
#[inline]
pub fn value_length_from_operator(operator_byte: u8) -> u8 {
    1 << ((operator_byte >> 4) & 0x03)
}

/// Smallest of the 1/2/4/8 byte widths able to hold `value`.
#[inline]
pub fn shortest_value_length(value: u64) -> u8 {
    if value <= 0xFF {
        1
    } else if value <= 0xFFFF {
        2
    } else if value <= 0xFFFF_FFFF {
        4
    } else {
        8
    }
}

impl<C: Comparator> Operand<C> {
    /// Single-entry chain with the shortest width that fits `value`.
    pub fn new(comparator: C, value: u64) -> Self {
        Operand {
            end_of_list: true,
            and_bit: false,
            value_length: shortest_value_length(value),
            comparator,
            value,
        }
    }

    /// Decode an operator byte and its already-read value. Reserved bits are ignored.
    pub fn from_byte_and_value(operator_byte: u8, value: u64) -> Self {
        Operand {
            end_of_list: (operator_byte & 0x80) != 0,
            and_bit: (operator_byte & 0x40) != 0,
            value_length: value_length_from_operator(operator_byte),
            comparator: C::from_operator_byte(operator_byte),
            value,
        }
    }

    pub fn to_byte(&self) -> u8 {
        let mut byte = 0u8;

        if self.end_of_list {
            byte |= 0x80;
        }
        if self.and_bit {
            byte |= 0x40;
        }

        byte |= match self.value_length {
            2 => 0x10,
            4 => 0x20,
            8 => 0x30,
            _ => 0x00,
        };

        byte | (self.comparator.to_operator_bits() & C::MASK)
    }

    /// Join this entry to the previous one with AND instead of OR.
    pub fn and(mut self) -> Self {
        self.and_bit = true;
        self
    }

    /// Force a wider value encoding. Narrower than the value requires is rejected when the
    /// enclosing rule is built.
    pub fn with_value_length(mut self, value_length: u8) -> Self {
        self.value_length = value_length;
        self
    }

    /// Width must be one of 1/2/4/8 and hold the value.
    pub(crate) fn validate(&self) -> Result<(), ParserError> {
        let fits = match self.value_length {
            1 | 2 | 4 => self.value >> (self.value_length as u32 * 8) == 0,
            8 => true,
            _ => false,
        };
        match fits {
            true => Ok(()),
            false => Err(ParserError::InvalidOperand(self.to_byte())),
        }
    }
}

impl NumericOperand {
    pub fn equal_to(value: u64) -> Self {
        Operand::new(NumericComparator::EQUALS, value)
    }

    pub fn less_than(value: u64) -> Self {
        Operand::new(NumericComparator::LESS_THAN, value)
    }

    pub fn greater_than(value: u64) -> Self {
        Operand::new(NumericComparator::GREATER_THAN, value)
    }

    pub fn less_than_or_equal(value: u64) -> Self {
        Operand::new(NumericComparator::LESS_THAN | NumericComparator::EQUALS, value)
    }

    pub fn greater_than_or_equal(value: u64) -> Self {
        Operand::new(
            NumericComparator::GREATER_THAN | NumericComparator::EQUALS,
            value,
        )
    }

    pub fn not_equal_to(value: u64) -> Self {
        Operand::new(
            NumericComparator::LESS_THAN | NumericComparator::GREATER_THAN,
            value,
        )
    }
}

impl BitmaskOperand {
    /// All bits of `bitmask` set, others clear.
    pub fn exact_match(bitmask: u64) -> Self {
        Operand::new(BitmaskComparator::empty(), bitmask)
    }

    /// All bits of `bitmask` set, others ignored.
    pub fn partial_match(bitmask: u64) -> Self {
        Operand::new(BitmaskComparator::MATCH, bitmask)
    }

    pub fn negate(mut self) -> Self {
        self.comparator.toggle(BitmaskComparator::NOT);
        self
    }
}

/// Fix up the control bits of a programmatically built chain: end-of-list on the last entry only.
pub fn operand_chain<C: Comparator>(
    operands: impl IntoIterator<Item = Operand<C>>,
) -> Vec<Operand<C>> {
    let mut chain: Vec<Operand<C>> = operands.into_iter().collect();
    let last = chain.len().saturating_sub(1);
    for (i, op) in chain.iter_mut().enumerate() {
        op.end_of_list = i == last;
    }
    chain
}

/// End-of-list set exactly on the last entry, every width valid. An empty chain is rejected.
pub(crate) fn validate_chain<C: Comparator>(
    component: u8,
    chain: &[Operand<C>],
) -> Result<(), ParserError> {
    if chain.is_empty() {
        return Err(ParserError::EmptyOperandChain(component));
    }
    let last = chain.len() - 1;
    for (i, op) in chain.iter().enumerate() {
        if op.end_of_list != (i == last) {
            return Err(ParserError::InvalidOperand(op.to_byte()));
        }
        op.validate()?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_length_from_operator() {
        assert_eq!(value_length_from_operator(0x00), 1);
        assert_eq!(value_length_from_operator(0x10), 2);
        assert_eq!(value_length_from_operator(0x20), 4);
        assert_eq!(value_length_from_operator(0x30), 8);
        // independent of end/and/comparator bits
        assert_eq!(value_length_from_operator(0xD7), 2);
        assert_eq!(value_length_from_operator(0xB1), 8);
    }

    #[test]
    fn test_numeric_operand_byte_conversion() {
        let op = NumericOperand::equal_to(25);
        assert_eq!(op.value_length, 1);
        assert_eq!(op.to_byte(), 0x81); // 10000001: end_of_list=1, len=00, eq=1

        let parsed = NumericOperand::from_byte_and_value(0x45, 139);
        assert!(!parsed.end_of_list);
        assert!(parsed.and_bit);
        assert_eq!(
            parsed.comparator,
            NumericComparator::LESS_THAN | NumericComparator::EQUALS
        );
        assert_eq!(parsed.to_byte(), 0x45);

        let op = NumericOperand::greater_than_or_equal(4089);
        assert_eq!(op.value_length, 2);
        assert_eq!(op.to_byte(), 0x93);
    }

    #[test]
    fn test_reserved_bits_ignored() {
        // bit 3 set on a numeric operator
        let op = NumericOperand::from_byte_and_value(0x89, 6);
        assert_eq!(op.comparator, NumericComparator::EQUALS);
        assert_eq!(op.to_byte(), 0x81);

        // bits 3 and 2 set on a bitmask operator
        let op = BitmaskOperand::from_byte_and_value(0x8D, 6);
        assert_eq!(op.comparator, BitmaskComparator::MATCH);
        assert_eq!(op.to_byte(), 0x81);
    }

    #[test]
    fn test_bitmask_operand_creation() {
        let op = BitmaskOperand::exact_match(0x06); // TCP SYN+RST
        assert!(op.comparator.is_empty());
        assert_eq!(op.to_byte(), 0x80);

        let op = BitmaskOperand::partial_match(0x0401).negate();
        assert_eq!(
            op.comparator,
            BitmaskComparator::NOT | BitmaskComparator::MATCH
        );
        assert_eq!(op.value_length, 2);
        assert_eq!(op.to_byte(), 0x93);
    }

    #[test]
    fn test_phrases() {
        assert_eq!(NumericComparator::empty().phrase(), None);
        assert_eq!(
            NumericOperand::less_than_or_equal(1).comparator.phrase(),
            Some("is less than or equals to")
        );
        assert_eq!(
            NumericOperand::not_equal_to(1).comparator.phrase(),
            Some("is not equal to")
        );
        assert_eq!(BitmaskComparator::NOT.phrase(), Some("is not"));
        assert_eq!(BitmaskComparator::all().phrase(), Some("does not match"));
    }

    #[test]
    fn test_operand_chain() {
        let chain = operand_chain([
            NumericOperand::greater_than_or_equal(137),
            NumericOperand::less_than_or_equal(139).and(),
            NumericOperand::equal_to(8080),
        ]);
        let bytes: Vec<u8> = chain.iter().map(Operand::to_byte).collect();
        assert_eq!(bytes, vec![0x03, 0x45, 0x91]);
        assert!(validate_chain(4, &chain).is_ok());
    }

    #[test]
    fn test_validate_chain() {
        let empty: Vec<NumericOperand> = vec![];
        assert!(matches!(
            validate_chain(5, &empty),
            Err(ParserError::EmptyOperandChain(5))
        ));

        // end-of-list missing on the last entry
        let mut chain = vec![NumericOperand::equal_to(1).and()];
        chain[0].end_of_list = false;
        assert!(matches!(
            validate_chain(3, &chain),
            Err(ParserError::InvalidOperand(0x41))
        ));

        // value does not fit the forced width
        let chain = vec![NumericOperand::equal_to(0x1234).with_value_length(1)];
        assert!(matches!(
            validate_chain(3, &chain),
            Err(ParserError::InvalidOperand(0x81))
        ));

        let chain = vec![NumericOperand::equal_to(1).with_value_length(3)];
        assert!(validate_chain(3, &chain).is_err());

        let chain = vec![NumericOperand::equal_to(u64::MAX)];
        assert_eq!(chain[0].value_length, 8);
        assert!(validate_chain(3, &chain).is_ok());
    }
}
