//! BGP path attributes carrying flowspec data.

mod attr_16_extended_communities;

pub use attr_16_extended_communities::*;
