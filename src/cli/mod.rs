//! Command-line interface
//!
//! `cio <group> <resource> <action>`; each group lives in its own module
//! and dispatches to the matching API service.

mod admin;
mod cloud;
mod cloud_applications;
mod config;
mod firewall;
mod kubernetes;
mod labels;
mod network;
mod policy;
mod settings;
mod storage;

use crate::api::labels::{filter_by_labels, resolve_label_ids, LabelService, Labelled};
use crate::api::{ConcertoHttpClient, ConcertoService};
use crate::config::{Config, Overrides};
use crate::format::{render_item, render_list, Columns, OutputFormat};
use anyhow::{bail, Context as _, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::Serialize;
use serde_json::{Map, Value};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::Level;

/// Command-line client for the Concerto cloud-management API
#[derive(Parser, Debug)]
#[command(name = "cio", version = crate::VERSION, about, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Concerto API endpoint
    #[arg(long, global = true, env = "CONCERTO_ENDPOINT")]
    pub endpoint: Option<String>,

    /// Client certificate (PEM)
    #[arg(long, global = true, env = "CONCERTO_CERT")]
    pub cert: Option<PathBuf>,

    /// Client private key (PEM)
    #[arg(long, global = true, env = "CONCERTO_KEY")]
    pub key: Option<PathBuf>,

    /// CA certificate used to verify the endpoint (PEM)
    #[arg(long, global = true, env = "CONCERTO_CA_CERT")]
    pub ca_cert: Option<PathBuf>,

    /// Output format
    #[arg(short, long, global = true, value_enum)]
    pub output: Option<OutputFormat>,

    /// Log level for debugging
    #[arg(long, global = true, value_enum, default_value = "off")]
    pub log_level: LogLevel,

    /// Run in read-only mode (block all write operations)
    #[arg(long, global = true)]
    pub readonly: bool,
}

impl GlobalArgs {
    fn overrides(&self) -> Overrides {
        Overrides {
            endpoint: self.endpoint.clone(),
            cert: self.cert.clone(),
            key: self.key.clone(),
            ca_cert: self.ca_cert.clone(),
            output: self.output,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn to_tracing_level(self) -> Option<Level> {
        match self {
            LogLevel::Off => None,
            LogLevel::Error => Some(Level::ERROR),
            LogLevel::Warn => Some(Level::WARN),
            LogLevel::Info => Some(Level::INFO),
            LogLevel::Debug => Some(Level::DEBUG),
            LogLevel::Trace => Some(Level::TRACE),
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Servers, server arrays, plans, providers, realms and SSH profiles
    #[command(subcommand)]
    Cloud(cloud::CloudCommand),
    /// Account settings
    #[command(subcommand)]
    Settings(settings::SettingsCommand),
    /// Firewall profiles, floating IPs and load balancers
    #[command(subcommand)]
    Network(network::NetworkCommand),
    /// Volumes and storage plans
    #[command(subcommand)]
    Storage(storage::StorageCommand),
    /// Kubernetes clusters and node pools
    #[command(subcommand)]
    Kubernetes(kubernetes::KubernetesCommand),
    /// Policy definitions and assignments
    #[command(subcommand)]
    Policy(policy::PolicyCommand),
    /// Cloud application templates and deployments
    #[command(subcommand)]
    CloudApplications(cloud_applications::CloudApplicationsCommand),
    /// Labels
    #[command(subcommand)]
    Labels(labels::LabelsCommand),
    /// Administration reports
    #[command(subcommand)]
    Admin(admin::AdminCommand),
    /// Firewall of this host
    #[command(subcommand)]
    Firewall(firewall::FirewallCommand),
    /// Local configuration
    #[command(subcommand)]
    Config(config::ConfigCommand),
}

/// Attributes of a new resource
#[derive(Args, Debug, Clone)]
pub struct CreateArgs {
    #[command(flatten)]
    pub payload: PayloadArgs,
}

/// Resource id plus the attributes to change
#[derive(Args, Debug, Clone)]
pub struct UpdateArgs {
    /// Resource id
    #[arg(long)]
    pub id: String,

    #[command(flatten)]
    pub payload: PayloadArgs,
}

/// `--id` of the resource acted upon
#[derive(Args, Debug, Clone)]
pub struct IdArgs {
    /// Resource id
    #[arg(long)]
    pub id: String,
}

/// Filters shared by list commands
#[derive(Args, Debug, Clone, Default)]
pub struct ListArgs {
    /// Only show resources carrying every one of these labels
    #[arg(long, value_delimiter = ',')]
    pub labels: Vec<String>,
}

/// Attributes of a create or update request
#[derive(Args, Debug, Clone, Default)]
pub struct PayloadArgs {
    /// Attribute as KEY=VALUE (repeatable); VALUE is read as JSON when it parses
    #[arg(long = "set", value_name = "KEY=VALUE", value_parser = parse_key_value)]
    pub set: Vec<(String, Value)>,

    /// Attributes as a JSON object
    #[arg(long, value_name = "JSON")]
    pub json: Option<String>,
}

impl PayloadArgs {
    /// Build `{"<root>": {...}}` from `--json` overlaid with `--set`
    pub fn wrapped(&self, root: &str) -> Result<Value> {
        let mut attributes = match &self.json {
            Some(json) => match serde_json::from_str::<Value>(json).context("invalid --json")? {
                Value::Object(map) => map,
                _ => bail!("--json must be a JSON object"),
            },
            None => Map::new(),
        };

        for (key, value) in &self.set {
            attributes.insert(key.clone(), value.clone());
        }

        if attributes.is_empty() {
            bail!("no attributes given; use --set KEY=VALUE or --json");
        }

        let mut payload = Map::new();
        payload.insert(root.to_string(), Value::Object(attributes));
        Ok(Value::Object(payload))
    }

    /// Like [`wrapped`](Self::wrapped) but an empty body is allowed
    pub fn wrapped_or_empty(&self, root: &str) -> Result<Value> {
        if self.set.is_empty() && self.json.is_none() {
            return Ok(Value::Object(Map::new()));
        }
        self.wrapped(root)
    }
}

fn parse_key_value(s: &str) -> std::result::Result<(String, Value), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{}'", s))?;
    if key.is_empty() {
        return Err(format!("empty key in '{}'", s));
    }
    let value = serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_string()));
    Ok((key.to_string(), value))
}

/// Transport and output settings shared by every handler
pub struct Context {
    concerto: Arc<dyn ConcertoService>,
    output: OutputFormat,
}

impl Context {
    pub fn new(concerto: Arc<dyn ConcertoService>, output: OutputFormat) -> Self {
        Self { concerto, output }
    }

    pub fn concerto(&self) -> &dyn ConcertoService {
        self.concerto.as_ref()
    }

    pub fn print_list<T: Serialize + Columns>(&self, items: &[T]) -> Result<()> {
        println!("{}", render_list(items, self.output)?.trim_end());
        Ok(())
    }

    pub fn print_item<T: Serialize + Columns>(&self, item: &T) -> Result<()> {
        println!("{}", render_item(item, self.output)?.trim_end());
        Ok(())
    }

    /// Print the resource a delete answered with, or `message` when it answered nothing
    pub fn print_deleted<T: Serialize + Columns>(&self, item: Option<T>, message: &str) -> Result<()> {
        match item {
            Some(item) => self.print_item(&item),
            None => {
                self.print_done(message);
                Ok(())
            }
        }
    }

    pub fn print_done(&self, message: &str) {
        if self.output == OutputFormat::Text {
            println!("{}", message);
        }
    }

    /// Apply `--labels` to a listing
    pub async fn filter_labels<T: Labelled>(&self, items: Vec<T>, args: &ListArgs) -> Result<Vec<T>> {
        if args.labels.is_empty() {
            return Ok(items);
        }

        let labels = LabelService::new(self.concerto())
            .list_labels()
            .await
            .context("failed to resolve labels")?;

        match resolve_label_ids(&labels, &args.labels) {
            Some(ids) => Ok(filter_by_labels(items, &ids)),
            None => {
                tracing::debug!("unknown label in {:?}", args.labels);
                Ok(Vec::new())
            }
        }
    }
}

/// Run a parsed command line
pub async fn run(cli: Cli) -> Result<()> {
    let config = Config::load().with_overrides(cli.global.overrides());

    let command = match cli.command {
        Command::Config(command) => return config::run(command, config),
        command => command,
    };

    let output = config.effective_output();
    let concerto = ConcertoHttpClient::new(&config)?.with_readonly(cli.global.readonly);
    tracing::info!("Using endpoint: {}", concerto.endpoint());

    let ctx = Context::new(Arc::new(concerto), output);
    dispatch(command, &ctx).await
}

async fn dispatch(command: Command, ctx: &Context) -> Result<()> {
    match command {
        Command::Cloud(command) => cloud::run(command, ctx).await,
        Command::Settings(command) => settings::run(command, ctx).await,
        Command::Network(command) => network::run(command, ctx).await,
        Command::Storage(command) => storage::run(command, ctx).await,
        Command::Kubernetes(command) => kubernetes::run(command, ctx).await,
        Command::Policy(command) => policy::run(command, ctx).await,
        Command::CloudApplications(command) => cloud_applications::run(command, ctx).await,
        Command::Labels(command) => labels::run(command, ctx).await,
        Command::Admin(command) => admin::run(command, ctx).await,
        Command::Firewall(command) => firewall::run(command, ctx).await,
        Command::Config(_) => bail!("configuration commands do not use the API"),
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use crate::api::mock::MockConcerto;

    /// Context over a stub transport
    pub fn context(mock: &Arc<MockConcerto>) -> Context {
        Context::new(mock.clone(), OutputFormat::Json)
    }

    pub fn mock_json(body: Value) -> Arc<MockConcerto> {
        Arc::new(MockConcerto::json(200, &body))
    }

    /// Verb and path of every request made so far
    pub fn requests(mock: &MockConcerto) -> Vec<(&'static str, String)> {
        mock.calls().into_iter().map(|c| (c.method, c.path)).collect()
    }

    pub fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("cio").chain(args.iter().copied()))
            .unwrap_or_else(|e| panic!("failed to parse {:?}: {}", args, e))
    }
}
