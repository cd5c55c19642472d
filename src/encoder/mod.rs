//! Flowspec NLRI and extended community encoders.

mod actions;
mod flowspec;

pub use actions::*;
pub use flowspec::*;
