//! iptables translation

use super::{FirewallRule, Step, SystemCommand};

pub const IPTABLES: &str = "/sbin/iptables";

/// Chain holding every managed rule
pub const CHAIN: &str = "CONCERTO";

fn iptables(args: &[&str]) -> SystemCommand {
    // -w waits for the xtables lock instead of failing
    let mut full = vec!["-w"];
    full.extend_from_slice(args);
    SystemCommand::new(IPTABLES, full)
}

/// Steps that rebuild the managed chain from `rules`
pub fn iptables_commands(rules: &[FirewallRule]) -> Vec<Step> {
    let mut steps = vec![
        Step::Try(iptables(&["-N", CHAIN])),
        Step::Run(iptables(&["-F", CHAIN])),
        Step::Unless {
            check: iptables(&["-C", "INPUT", "-j", CHAIN]),
            then: iptables(&["-I", "INPUT", "1", "-j", CHAIN]),
        },
        Step::Run(iptables(&["-A", CHAIN, "-i", "lo", "-j", "ACCEPT"])),
        Step::Run(iptables(&[
            "-A",
            CHAIN,
            "-m",
            "state",
            "--state",
            "ESTABLISHED,RELATED",
            "-j",
            "ACCEPT",
        ])),
    ];

    steps.extend(rules.iter().map(|rule| Step::Run(accept_rule(rule))));
    steps.push(Step::Run(iptables(&["-A", CHAIN, "-j", "DROP"])));
    steps
}

fn accept_rule(rule: &FirewallRule) -> SystemCommand {
    let mut args = vec![
        "-w".to_string(),
        "-A".to_string(),
        CHAIN.to_string(),
        "-p".to_string(),
        rule.protocol(),
    ];

    if !rule.matches_any_source() {
        args.push("-s".to_string());
        args.push(rule.cidr.clone());
    }

    if rule.has_ports() {
        args.push("--dport".to_string());
        args.push(port_range(rule));
    }

    args.push("-j".to_string());
    args.push("ACCEPT".to_string());
    SystemCommand::new(IPTABLES, args)
}

fn port_range(rule: &FirewallRule) -> String {
    if rule.min_port == rule.max_port {
        rule.min_port.to_string()
    } else {
        format!("{}:{}", rule.min_port, rule.max_port)
    }
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

    fn lines(steps: &[Step]) -> Vec<String> {
        steps
            .iter()
            .map(|step| match step {
                Step::Run(c) => c.to_string(),
                Step::Try(c) => format!("try {}", c),
                Step::Unless { check, then } => format!("unless {} then {}", check, then),
            })
            .collect()
    }

    #[test]
    fn test_full_translation() {
        let rules = vec![
            rule("0.0.0.0/0", "tcp", 22, 22),
            rule("10.0.0.0/8", "udp", 8000, 8100),
            rule("192.168.1.0/24", "icmp", 0, 0),
        ];
        assert_eq!(
            lines(&iptables_commands(&rules)),
            vec![
                "try /sbin/iptables -w -N CONCERTO",
                "/sbin/iptables -w -F CONCERTO",
                "unless /sbin/iptables -w -C INPUT -j CONCERTO then /sbin/iptables -w -I INPUT 1 -j CONCERTO",
                "/sbin/iptables -w -A CONCERTO -i lo -j ACCEPT",
                "/sbin/iptables -w -A CONCERTO -m state --state ESTABLISHED,RELATED -j ACCEPT",
                "/sbin/iptables -w -A CONCERTO -p tcp --dport 22 -j ACCEPT",
                "/sbin/iptables -w -A CONCERTO -p udp -s 10.0.0.0/8 --dport 8000:8100 -j ACCEPT",
                "/sbin/iptables -w -A CONCERTO -p icmp -s 192.168.1.0/24 -j ACCEPT",
                "/sbin/iptables -w -A CONCERTO -j DROP",
            ]
        );
    }

    #[test]
    fn test_empty_policy_still_drops() {
        let steps = iptables_commands(&[]);
        assert_eq!(steps.len(), 6);
        assert_eq!(
            steps.last(),
            Some(&Step::Run(SystemCommand::new(
                IPTABLES,
                ["-w", "-A", "CONCERTO", "-j", "DROP"]
            )))
        );
    }

    #[test]
    fn test_protocol_is_lowercased() {
        let command = accept_rule(&rule("0.0.0.0/0", "TCP", 443, 443));
        assert_eq!(command.to_string(), "/sbin/iptables -w -A CONCERTO -p tcp --dport 443 -j ACCEPT");
    }
}
