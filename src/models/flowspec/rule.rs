use super::component::FlowspecComponent;
use crate::error::ParserError;
use crate::models::{FlowspecFamily, RouteDistinguisher};

/// A complete flowspec NLRI: the ordered match components, the route distinguisher of L3VPN
/// families and the add-path identifier when one was negotiated.
///
/// Fields are private. Every constructor checks the whole rule at once, so a value of this type
/// always has strictly increasing component codes, well formed operand chains and components that
/// belong to its family. Prefix bits that the wire format cannot carry are cleared, so a built rule
/// and the same rule parsed back from its encoding are equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct FlowspecRule {
    family: FlowspecFamily,
    route_distinguisher: Option<RouteDistinguisher>,
    path_id: Option<u32>,
    components: Vec<FlowspecComponent>,
}

impl FlowspecRule {
    /// Build a rule for a non-VPN family.
    pub fn new(
        family: FlowspecFamily,
        components: Vec<FlowspecComponent>,
    ) -> Result<Self, ParserError> {
        FlowspecRule::from_parts(family, None, None, components)
    }

    /// Build a rule for an L3VPN family.
    pub fn new_vpn(
        family: FlowspecFamily,
        route_distinguisher: RouteDistinguisher,
        components: Vec<FlowspecComponent>,
    ) -> Result<Self, ParserError> {
        FlowspecRule::from_parts(family, Some(route_distinguisher), None, components)
    }

    pub(crate) fn from_parts(
        family: FlowspecFamily,
        route_distinguisher: Option<RouteDistinguisher>,
        path_id: Option<u32>,
        components: Vec<FlowspecComponent>,
    ) -> Result<Self, ParserError> {
        match (family.vpn, route_distinguisher.is_some()) {
            (true, false) => return Err(ParserError::MissingRouteDistinguisher(family)),
            (false, true) => return Err(ParserError::UnexpectedRouteDistinguisher(family)),
            _ => {}
        }

        let mut previous: Option<u8> = None;
        let mut canonical = Vec::with_capacity(components.len());
        for component in components {
            let code = component.type_code();
            if let Some(previous) = previous {
                if code <= previous {
                    return Err(ParserError::OutOfOrderComponent {
                        previous,
                        found: code,
                    });
                }
            }
            previous = Some(code);
            component.validate(family)?;
            canonical.push(component.canonical()?);
        }

        Ok(FlowspecRule {
            family,
            route_distinguisher,
            path_id,
            components: canonical,
        })
    }

    /// Attach an add-path identifier (RFC 7911).
    pub fn with_path_id(mut self, path_id: u32) -> Self {
        self.path_id = Some(path_id);
        self
    }

    pub fn family(&self) -> FlowspecFamily {
        self.family
    }

    pub fn components(&self) -> &[FlowspecComponent] {
        &self.components
    }

    pub fn route_distinguisher(&self) -> Option<&RouteDistinguisher> {
        self.route_distinguisher.as_ref()
    }

    pub fn path_id(&self) -> Option<u32> {
        self.path_id
    }

    pub fn into_components(self) -> Vec<FlowspecComponent> {
        self.components
    }

    /// Canonical text of the rule, used as the identity of a flowspec route. Depends only on the
    /// components and the route distinguisher.
    pub fn route_key(&self) -> String {
        self.to_string()
    }
}
