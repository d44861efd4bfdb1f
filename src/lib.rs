//! cio: command-line client for the Concerto cloud-management API
//!
//! - [`api`] - transport, errors and one service per resource type
//! - [`firewall`] - local iptables/ipf management from the firewall policy
//! - [`format`] - text/JSON/YAML rendering
//! - [`config`] - persisted settings
//! - [`cli`] - clap command tree

pub mod api;
pub mod cli;
pub mod config;
pub mod firewall;
pub mod format;

/// Version injected at compile time via CIO_VERSION env var (set by CI/CD),
/// or the crate version for local builds.
pub const VERSION: &str = match option_env!("CIO_VERSION") {
    Some(v) => v,
    None => env!("CARGO_PKG_VERSION"),
};
