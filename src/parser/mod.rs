/*!
parser module maintains the flowspec NLRI and extended community decoders.
*/
pub mod attributes;
pub mod flowspec;
pub mod utils;

pub use attributes::*;
pub use flowspec::*;
pub use utils::*;
