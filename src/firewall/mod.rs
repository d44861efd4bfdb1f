//! Local firewall management
//!
//! The server-side firewall policy is a flat list of accept rules. It is
//! translated into the native packet filter of the host:
//!
//! - [`iptables`] - a dedicated `CONCERTO` chain jumped to from `INPUT`
//! - [`ipf`] - a complete `ipf.conf` ruleset reloaded with `ipf -Fa -f`
//!
//! Commands are executed one after the other through a [`CommandRunner`];
//! the first failure stops the run and nothing is rolled back.

pub mod ipf;
pub mod iptables;
pub mod runner;

use crate::api::de::nullable;
use crate::api::ApiError;
use crate::format::{Column, Columns};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::IpAddr;
use std::path::PathBuf;
use thiserror::Error;

pub use runner::{CommandOutput, CommandRunner, SystemRunner};

/// CIDR matching every IPv4 source
pub const ANY_CIDR: &str = "0.0.0.0/0";

#[derive(Debug, Error)]
pub enum FirewallError {
    #[error("`{command}` failed ({}): {stderr}", exit_code(.code))]
    CommandFailed {
        command: String,
        code: Option<i32>,
        stderr: String,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("invalid firewall rule: {0}")]
    InvalidRule(String),
}

fn exit_code(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exit status {}", code),
        None => "killed by signal".to_string(),
    }
}

pub type Result<T> = std::result::Result<T, FirewallError>;

/// Accept rule for inbound traffic
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FirewallRule {
    #[serde(deserialize_with = "nullable")]
    pub name: String,
    #[serde(deserialize_with = "nullable")]
    pub cidr: String,
    #[serde(deserialize_with = "nullable")]
    pub min_port: u16,
    #[serde(deserialize_with = "nullable")]
    pub max_port: u16,
    #[serde(deserialize_with = "nullable")]
    pub ip_protocol: String,
}

impl FirewallRule {
    /// Protocols matched on destination port; others (icmp) ignore the range
    pub fn has_ports(&self) -> bool {
        matches!(self.protocol().as_str(), "tcp" | "udp")
    }

    pub fn protocol(&self) -> String {
        self.ip_protocol.to_ascii_lowercase()
    }

    pub fn matches_any_source(&self) -> bool {
        self.cidr == ANY_CIDR
    }

    pub fn is_ipv6(&self) -> bool {
        self.cidr
            .split('/')
            .next()
            .and_then(|address| address.parse::<IpAddr>().ok())
            .is_some_and(|address| address.is_ipv6())
    }

    pub fn validate(&self) -> Result<()> {
        let protocol = self.protocol();
        if protocol.is_empty() || !protocol.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(FirewallError::InvalidRule(format!(
                "unsupported protocol '{}'",
                self.ip_protocol
            )));
        }

        validate_cidr(&self.cidr)?;

        if self.has_ports() && self.min_port > self.max_port {
            return Err(FirewallError::InvalidRule(format!(
                "min port {} is greater than max port {}",
                self.min_port, self.max_port
            )));
        }

        Ok(())
    }
}

impl Columns for FirewallRule {
    const COLUMNS: &'static [Column] = &[
        Column::new("NAME", "name"),
        Column::new("CIDR", "cidr"),
        Column::new("PROTOCOL", "ip_protocol"),
        Column::new("MIN PORT", "min_port"),
        Column::new("MAX PORT", "max_port"),
    ];
}

impl fmt::Display for FirewallRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.protocol(), self.cidr)?;
        if self.has_ports() {
            write!(f, " {}-{}", self.min_port, self.max_port)?;
        }
        Ok(())
    }
}

fn validate_cidr(cidr: &str) -> Result<()> {
    let invalid = || FirewallError::InvalidRule(format!("invalid CIDR '{}'", cidr));

    let (address, prefix) = cidr.split_once('/').ok_or_else(invalid)?;
    let address: IpAddr = address.parse().map_err(|_| invalid())?;
    let prefix: u8 = prefix.parse().map_err(|_| invalid())?;
    let max_prefix = if address.is_ipv4() { 32 } else { 128 };

    if prefix > max_prefix {
        return Err(invalid());
    }
    Ok(())
}

/// Firewall policy as served by the API
///
/// `rules` is the desired set, `actual_rules` what the server last
/// reported as applied.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Policy {
    #[serde(deserialize_with = "nullable")]
    pub rules: Vec<FirewallRule>,
    #[serde(deserialize_with = "nullable")]
    pub actual_rules: Vec<FirewallRule>,
    #[serde(deserialize_with = "nullable")]
    pub md5: String,
}

impl Policy {
    pub fn check_cidr_rule_exists(&self, cidr: &str, ip_protocol: &str, min_port: u16, max_port: u16) -> bool {
        self.rules.iter().any(|rule| {
            rule.cidr == cidr
                && rule.ip_protocol.eq_ignore_ascii_case(ip_protocol)
                && rule.min_port == min_port
                && rule.max_port == max_port
        })
    }

    /// Returns false when an equivalent rule is already present
    pub fn add_rule(&mut self, rule: FirewallRule) -> bool {
        if self.check_cidr_rule_exists(&rule.cidr, &rule.ip_protocol, rule.min_port, rule.max_port) {
            return false;
        }
        self.rules.push(rule);
        true
    }

    /// Removes every equivalent rule and returns how many were dropped
    pub fn remove_rule(&mut self, rule: &FirewallRule) -> usize {
        let before = self.rules.len();
        self.rules.retain(|r| {
            !(r.cidr == rule.cidr
                && r.ip_protocol.eq_ignore_ascii_case(&rule.ip_protocol)
                && r.min_port == rule.min_port
                && r.max_port == rule.max_port)
        });
        before - self.rules.len()
    }

    /// Desired and applied rules are the same set
    pub fn is_synced(&self) -> bool {
        let key = |r: &FirewallRule| (r.cidr.clone(), r.protocol(), r.min_port, r.max_port);
        let mut desired: Vec<_> = self.rules.iter().map(key).collect();
        let mut actual: Vec<_> = self.actual_rules.iter().map(key).collect();
        desired.sort();
        actual.sort();
        desired == actual
    }
}

/// External command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SystemCommand {
    pub program: String,
    pub args: Vec<String>,
}

impl SystemCommand {
    pub fn new<I, S>(program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }
}

impl fmt::Display for SystemCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

/// One step of a firewall update
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// Must succeed
    Run(SystemCommand),
    /// Failure is logged and ignored
    Try(SystemCommand),
    /// `then` runs only when `check` fails
    Unless {
        check: SystemCommand,
        then: SystemCommand,
    },
}

/// Packet filter of the host
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Driver {
    Iptables,
    Ipf { conf_path: PathBuf },
}

impl Driver {
    pub fn native() -> Self {
        if cfg!(any(target_os = "illumos", target_os = "solaris")) {
            Driver::Ipf {
                conf_path: PathBuf::from(ipf::IPF_CONF),
            }
        } else {
            Driver::Iptables
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Driver::Iptables => "iptables",
            Driver::Ipf { .. } => "ipf",
        }
    }

    /// Validate `rule` and make sure this filter can express it.
    ///
    /// Both rulesets are IPv4 only: `iptables` rejects IPv6 sources and
    /// `ipf.conf` is loaded without `-6`.
    pub fn check_rule(&self, rule: &FirewallRule) -> Result<()> {
        rule.validate()?;
        if rule.is_ipv6() {
            return Err(FirewallError::InvalidRule(format!(
                "{} only handles IPv4 sources, got '{}'",
                self.name(),
                rule.cidr
            )));
        }
        Ok(())
    }
}

/// Apply the desired rules of `policy` to the host
pub async fn apply(policy: &Policy, driver: &Driver, runner: &dyn CommandRunner) -> Result<()> {
    for rule in &policy.rules {
        driver.check_rule(rule)?;
    }

    tracing::info!("applying {} firewall rules with {}", policy.rules.len(), driver.name());

    let steps = match driver {
        Driver::Iptables => iptables::iptables_commands(&policy.rules),
        Driver::Ipf { conf_path } => {
            let ruleset = ipf::ipf_ruleset(&policy.rules);
            tokio::fs::write(conf_path, ruleset).await?;
            tracing::debug!("wrote {}", conf_path.display());
            ipf::ipf_commands(conf_path)
        }
    };

    for step in &steps {
        run_step(step, runner).await?;
    }
    Ok(())
}

async fn run_step(step: &Step, runner: &dyn CommandRunner) -> Result<()> {
    match step {
        Step::Run(command) => run_checked(command, runner).await,
        Step::Try(command) => {
            let output = runner.run(command).await?;
            if !output.success() {
                tracing::debug!("ignoring failure of `{}`: {}", command, output.stderr);
            }
            Ok(())
        }
        Step::Unless { check, then } => {
            if runner.run(check).await?.success() {
                return Ok(());
            }
            run_checked(then, runner).await
        }
    }
}

async fn run_checked(command: &SystemCommand, runner: &dyn CommandRunner) -> Result<()> {
    let output = runner.run(command).await?;
    if output.success() {
        return Ok(());
    }

    tracing::error!("`{}` failed: {}", command, output.stderr);
    Err(FirewallError::CommandFailed {
        command: command.to_string(),
        code: output.code,
        stderr: output.stderr,
    })
}
