use crate::error::ParserError;
use crate::models::{value_length_from_operator, Comparator, Operand};
use crate::parser::ReadUtils;
use log::debug;

/// Read operand entries until one carries the end-of-list bit. The value width of each entry comes
/// from its own operator byte.
pub(crate) fn parse_operands<C: Comparator>(
    input: &mut &[u8],
) -> Result<Vec<Operand<C>>, ParserError> {
    let mut operands = Vec::new();

    loop {
        let operator_byte = input.read_u8()?;
        let value_length = value_length_from_operator(operator_byte) as usize;
        if input.len() < value_length {
            debug!(
                "operand {:#04x} needs {} value bytes, {} left",
                operator_byte,
                value_length,
                input.len()
            );
            return Err(ParserError::InvalidOperand(operator_byte));
        }
        let value = input.read_uint(value_length)?;

        let operand = Operand::<C>::from_byte_and_value(operator_byte, value);
        let end_of_list = operand.end_of_list;
        operands.push(operand);

        if end_of_list {
            break;
        }
    }

    Ok(operands)
}
