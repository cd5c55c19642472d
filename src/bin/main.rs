use serde_json::json;

use bgp_flowspec::models::{Afi, FlowspecFamily};
use bgp_flowspec::{parse_flowspec_actions, parse_flowspec_nlri_list};
use clap::Parser;

/// flowspec is a small cli tool that decodes BGP flowspec NLRI or flowspec extended communities
/// given as hex strings.
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Opts {
    /// Hex-encoded bytes. Whitespace and ':' separators are ignored.
    #[clap(name = "HEX")]
    input: String,

    /// Decode as IPv6 flowspec (default IPv4)
    #[clap(short = '6', long)]
    ipv6: bool,

    /// Decode as L3VPN flowspec, with a route distinguisher
    #[clap(long)]
    vpn: bool,

    /// Each NLRI starts with a 4-byte add-path identifier
    #[clap(short = 'p', long)]
    add_path: bool,

    /// Decode the input as flowspec extended communities instead of NLRI
    #[clap(short = 'a', long)]
    actions: bool,

    /// Output as JSON objects
    #[clap(long)]
    json: bool,

    /// Pretty-print JSON output
    #[clap(long)]
    pretty: bool,
}

fn print_json(val: serde_json::Value, pretty: bool) {
    let output_str = match pretty {
        true => serde_json::to_string_pretty(&val).unwrap_or_else(|_| val.to_string()),
        false => val.to_string(),
    };
    println!("{}", output_str);
}

fn main() {
    let opts: Opts = Opts::parse();

    env_logger::init();

    let cleaned: String = opts
        .input
        .chars()
        .filter(|c| !c.is_whitespace() && *c != ':')
        .collect();
    let bytes = match hex::decode(cleaned.trim_start_matches("0x")) {
        Ok(b) => b,
        Err(err) => {
            eprintln!("invalid hex input: {}", err);
            std::process::exit(1);
        }
    };

    if opts.actions {
        let actions = match parse_flowspec_actions(&bytes) {
            Ok(a) => a,
            Err(err) => {
                eprintln!("{}", err);
                std::process::exit(1);
            }
        };
        for action in actions {
            match opts.json {
                true => print_json(json!(action), opts.pretty),
                false => println!("{}", action),
            }
        }
        return;
    }

    let afi = match opts.ipv6 {
        true => Afi::Ipv6,
        false => Afi::Ipv4,
    };
    let family = FlowspecFamily::new(afi, opts.vpn);

    let rules = match parse_flowspec_nlri_list(&bytes, family, opts.add_path) {
        Ok(r) => r,
        Err(err) => {
            eprintln!("{}", err);
            std::process::exit(1);
        }
    };
    for rule in rules {
        match opts.json {
            true => print_json(
                json!({
                    "route_key": rule.route_key(),
                    "rule": rule,
                }),
                opts.pretty,
            ),
            false => match rule.path_id() {
                Some(path_id) => println!("[path-id {}] {}", path_id, rule),
                None => println!("{}", rule),
            },
        }
    }
}
