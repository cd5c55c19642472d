/*!
bgp-flowspec is a codec for BGP Flow Specification rules ([RFC 8955], [RFC 8956]).

It parses and serializes the flowspec NLRI carried in MP_REACH_NLRI/MP_UNREACH_NLRI attributes,
for IPv4 and IPv6, with or without the L3VPN route distinguisher and the add-path identifier, and
the four traffic-filtering actions carried as extended communities. Each parsed rule renders to a
canonical sentence that serves as its route key.

# Parsing a rule

```
use bgp_flowspec::models::FlowspecFamily;
use bgp_flowspec::parse_rule_list;

let bytes = [
    0x0d, // NLRI length
    0x01, 0x20, 0x0a, 0x00, 0x01, 0x00, // destination 10.0.1.0/32
    0x03, 0x81, 0x06, // protocol == 6
    0x06, 0x91, 0x1f, 0x90, // source port == 8080
];
let rule = parse_rule_list(&bytes, FlowspecFamily::IPV4, false).unwrap();
assert_eq!(
    rule.route_key(),
    "all packets to 10.0.1.0/32 AND where IP protocol equals to 6 AND where source port equals to 8080"
);
assert_eq!(rule.encode().unwrap().as_ref(), &bytes);
```

# Building a rule

```
use bgp_flowspec::models::*;

let rule = FlowspecRule::new(
    FlowspecFamily::IPV4,
    vec![
        FlowspecComponent::IpProtocol(vec![NumericOperand::equal_to(17)]),
        FlowspecComponent::DestinationPort(operand_chain([
            NumericOperand::greater_than_or_equal(5000),
            NumericOperand::less_than_or_equal(5100).and(),
        ])),
    ],
)
.unwrap();
assert_eq!(
    rule.to_string(),
    "all packets where IP protocol equals to 17 AND where destination port is greater than or equals to 5000 and is less than or equals to 5100"
);
```

# Actions

```
use bgp_flowspec::models::FlowspecAction;
use bgp_flowspec::{encode_flowspec_actions, parse_flowspec_actions};

let bytes = [0x80, 0x09, 0, 0, 0, 0, 0, 0x2e];
let actions = parse_flowspec_actions(&bytes).unwrap();
assert_eq!(actions, vec![FlowspecAction::TrafficMarking { dscp: 46 }]);
assert_eq!(encode_flowspec_actions(&actions).unwrap().as_ref(), &bytes);
```

Every function is pure and works on caller-owned buffers. Malformed input fails with a
[ParserError], never with a panic or an out-of-bounds read.

[RFC 8955]: https://datatracker.ietf.org/doc/html/rfc8955
[RFC 8956]: https://datatracker.ietf.org/doc/html/rfc8956
*/

pub mod encoder;
pub mod error;
pub mod models;
pub mod parser;

pub use encoder::{
    encode_flowspec_actions, encode_flowspec_nlri, encode_flowspec_nlri_list, encode_nlri_length,
};
pub use error::ParserError;
pub use parser::{
    parse_flowspec_action, parse_flowspec_actions, parse_flowspec_nlri, parse_flowspec_nlri_list,
    parse_nlri_length, parse_rule_list,
};
