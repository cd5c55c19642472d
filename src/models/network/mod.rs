//! Common network-related structs.

mod afi;
mod route_distinguisher;

pub use afi::*;
pub use route_distinguisher::*;
