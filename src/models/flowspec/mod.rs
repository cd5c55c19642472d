//! BGP Flow Specification models (RFC 8955, RFC 8956)
//!
//! A flowspec NLRI is a [FlowspecRule]: an ordered list of [FlowspecComponent]s, each either a
//! prefix or a chain of [Operand]s. The actions to apply to matching traffic travel separately as
//! extended communities and are modeled by [FlowspecAction].

mod action;
mod component;
mod display;
mod operators;
mod rule;

pub use action::*;
pub use component::*;
pub use operators::*;
pub use rule::*;
