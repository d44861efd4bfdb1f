//! ipf translation for illumos and Solaris hosts

use super::{FirewallRule, Step, SystemCommand};
use std::path::Path;

pub const IPF: &str = "/usr/sbin/ipf";
pub const IPF_CONF: &str = "/etc/ipf/ipf.conf";

/// Complete ruleset for `ipf.conf`
pub fn ipf_ruleset(rules: &[FirewallRule]) -> String {
    let mut lines = vec![
        "pass in quick on lo0 all".to_string(),
        "pass out quick all keep state".to_string(),
    ];
    lines.extend(rules.iter().map(pass_rule));
    lines.push("block in all".to_string());

    let mut ruleset = lines.join("\n");
    ruleset.push('\n');
    ruleset
}

fn pass_rule(rule: &FirewallRule) -> String {
    let source = if rule.matches_any_source() {
        "any"
    } else {
        rule.cidr.as_str()
    };

    let mut line = format!("pass in quick proto {} from {} to any", rule.protocol(), source);
    if rule.has_ports() {
        line.push_str(" port ");
        line.push_str(&port_match(rule));
    }
    line
}

/// `= n` for a single port, otherwise an exclusive range
fn port_match(rule: &FirewallRule) -> String {
    if rule.min_port == rule.max_port {
        format!("= {}", rule.min_port)
    } else {
        format!(
            "{} >< {}",
            i32::from(rule.min_port) - 1,
            i32::from(rule.max_port) + 1
        )
    }
}

/// Enable ipf and reload the ruleset from `conf_path`
pub fn ipf_commands(conf_path: &Path) -> Vec<Step> {
    vec![
        Step::Run(SystemCommand::new(IPF, ["-E"])),
        Step::Run(SystemCommand::new(
            IPF,
            ["-Fa".to_string(), "-f".to_string(), conf_path.display().to_string()],
        )),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(cidr: &str, protocol: &str, min: u16, max: u16) -> FirewallRule {
        FirewallRule {
            name: "test".to_string(),
            cidr: cidr.to_string(),
            min_port: min,
            max_port: max,
            ip_protocol: protocol.to_string(),
        }
    }

    #[test]
    fn test_ruleset() {
        let rules = vec![
            rule("0.0.0.0/0", "tcp", 22, 22),
            rule("10.0.0.0/8", "tcp", 8000, 8080),
            rule("0.0.0.0/0", "icmp", 0, 0),
        ];
        assert_eq!(
            ipf_ruleset(&rules),
            "pass in quick on lo0 all\n\
             pass out quick all keep state\n\
             pass in quick proto tcp from any to any port = 22\n\
             pass in quick proto tcp from 10.0.0.0/8 to any port 7999 >< 8081\n\
             pass in quick proto icmp from any to any\n\
             block in all\n"
        );
    }

    #[test]
    fn test_range_starting_at_zero() {
        assert_eq!(
            pass_rule(&rule("0.0.0.0/0", "udp", 0, 65535)),
            "pass in quick proto udp from any to any port -1 >< 65536"
        );
    }

    #[test]
    fn test_commands() {
        let steps = ipf_commands(Path::new("/tmp/ipf.conf"));
        assert_eq!(
            steps,
            vec![
                Step::Run(SystemCommand::new(IPF, ["-E"])),
                Step::Run(SystemCommand::new(IPF, ["-Fa", "-f", "/tmp/ipf.conf"])),
            ]
        );
    }
}
