/*!
models module defines the flowspec rule, operand and action structs along with the network
primitives (AFI/SAFI, route distinguisher) they are keyed by.
*/
pub mod flowspec;
pub mod network;

pub use flowspec::*;
pub use network::*;

use std::fmt::{Display, Formatter};

pub(crate) struct ToHexString<'a>(pub &'a [u8]);

impl Display for ToHexString<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for byte in self.0 {
            write!(f, "{:02X}", byte)?;
        }
        Ok(())
    }
}
