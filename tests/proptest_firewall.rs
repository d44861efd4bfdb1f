//! Property-based tests using proptest
//!
//! These tests check the firewall translation and policy bookkeeping
//! against randomized rule sets.

use cio::firewall::ipf::ipf_ruleset;
use cio::firewall::iptables::{iptables_commands, CHAIN};
use cio::firewall::{FirewallRule, Policy, Step};
use proptest::prelude::*;

/// Generate a valid accept rule
fn arb_rule() -> impl Strategy<Value = FirewallRule> {
    (
        "[a-z][a-z0-9-]{0,20}",
        prop_oneof![
            Just("0.0.0.0/0".to_string()),
            (any::<[u8; 4]>(), 0u8..=32)
                .prop_map(|(o, p)| format!("{}.{}.{}.{}/{}", o[0], o[1], o[2], o[3], p)),
        ],
        prop_oneof!["tcp", "udp", "icmp", "TCP"],
        any::<u16>(),
        any::<u16>(),
    )
        .prop_map(|(name, cidr, protocol, a, b)| FirewallRule {
            name,
            cidr,
            min_port: a.min(b),
            max_port: a.max(b),
            ip_protocol: protocol,
        })
}

fn arb_rules() -> impl Strategy<Value = Vec<FirewallRule>> {
    prop::collection::vec(arb_rule(), 0..30)
}

fn accept_steps(steps: &[Step]) -> Vec<&Vec<String>> {
    steps
        .iter()
        .filter_map(|step| match step {
            Step::Run(command) if command.args.last().map(String::as_str) == Some("ACCEPT") => {
                Some(&command.args)
            }
            _ => None,
        })
        .filter(|args| args.iter().any(|a| a == "-p"))
        .collect()
}

proptest! {
    #[test]
    fn generated_rules_are_valid(rule in arb_rule()) {
        prop_assert!(rule.validate().is_ok());
    }

    #[test]
    fn iptables_has_one_accept_per_rule(rules in arb_rules()) {
        let steps = iptables_commands(&rules);
        prop_assert_eq!(accept_steps(&steps).len(), rules.len());
    }

    #[test]
    fn iptables_ends_with_drop(rules in arb_rules()) {
        let steps = iptables_commands(&rules);
        match steps.last() {
            Some(Step::Run(command)) => {
                prop_assert_eq!(
                    command.args.clone(),
                    vec!["-w", "-A", CHAIN, "-j", "DROP"]
                        .into_iter()
                        .map(String::from)
                        .collect::<Vec<_>>()
                );
            }
            other => prop_assert!(false, "unexpected last step {:?}", other),
        }
    }

    #[test]
    fn iptables_preserves_ports(rules in arb_rules()) {
        let steps = iptables_commands(&rules);
        for (rule, args) in rules.iter().zip(accept_steps(&steps)) {
            let dport = args
                .iter()
                .position(|a| a == "--dport")
                .map(|i| args[i + 1].clone());

            if rule.has_ports() {
                let expected = if rule.min_port == rule.max_port {
                    rule.min_port.to_string()
                } else {
                    format!("{}:{}", rule.min_port, rule.max_port)
                };
                prop_assert_eq!(dport, Some(expected));
            } else {
                prop_assert_eq!(dport, None);
            }

            let source = args.iter().position(|a| a == "-s").map(|i| args[i + 1].clone());
            if rule.matches_any_source() {
                prop_assert_eq!(source, None);
            } else {
                prop_assert_eq!(source, Some(rule.cidr.clone()));
            }
        }
    }

    #[test]
    fn ipf_ranges_are_exclusive(rules in arb_rules()) {
        let ruleset = ipf_ruleset(&rules);
        let pass_lines: Vec<&str> = ruleset
            .lines()
            .filter(|line| line.starts_with("pass in quick proto"))
            .collect();
        prop_assert_eq!(pass_lines.len(), rules.len());

        for (rule, line) in rules.iter().zip(pass_lines) {
            if !rule.has_ports() {
                prop_assert!(!line.contains(" port "));
            } else if rule.min_port == rule.max_port {
                let expected = format!(" port = {}", rule.min_port);
                prop_assert!(line.ends_with(&expected));
            } else {
                let expected = format!(
                    " port {} >< {}",
                    i32::from(rule.min_port) - 1,
                    i32::from(rule.max_port) + 1
                );
                prop_assert!(line.ends_with(&expected));
            }
        }
    }

    #[test]
    fn ipf_blocks_last(rules in arb_rules()) {
        let ruleset = ipf_ruleset(&rules);
        prop_assert!(ruleset.ends_with("block in all\n"));
        prop_assert!(ruleset.starts_with("pass in quick on lo0 all\n"));
    }

    #[test]
    fn add_rule_is_idempotent(rules in arb_rules(), extra in arb_rule()) {
        let mut policy = Policy { rules, ..Policy::default() };
        policy.add_rule(extra.clone());
        let len = policy.rules.len();

        prop_assert!(!policy.add_rule(extra.clone()));
        prop_assert_eq!(policy.rules.len(), len);
        prop_assert!(policy.check_cidr_rule_exists(
            &extra.cidr,
            &extra.ip_protocol,
            extra.min_port,
            extra.max_port
        ));
    }

    #[test]
    fn remove_rule_leaves_no_match(rules in arb_rules(), extra in arb_rule()) {
        let mut policy = Policy { rules, ..Policy::default() };
        policy.add_rule(extra.clone());
        prop_assert!(policy.remove_rule(&extra) >= 1);
        prop_assert!(!policy.check_cidr_rule_exists(
            &extra.cidr,
            &extra.ip_protocol,
            extra.min_port,
            extra.max_port
        ));
    }

    #[test]
    fn sync_ignores_order(rules in arb_rules()) {
        let mut reversed = rules.clone();
        reversed.reverse();
        let policy = Policy {
            rules,
            actual_rules: reversed,
            md5: String::new(),
        };
        prop_assert!(policy.is_synced());
    }
}
