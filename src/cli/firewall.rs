use super::Context;
use crate::api::firewall::FirewallService;
use crate::firewall::{self, CommandRunner, Driver, FirewallRule, Policy, SystemRunner};
use anyhow::{Context as _, Result};
use clap::{Args, Subcommand};

#[derive(Subcommand, Debug)]
pub enum FirewallCommand {
    /// Show the firewall policy of this host
    Show,
    /// Apply the current policy to the local packet filter
    Apply,
    /// Tell whether a rule is part of the policy
    Check(RuleArgs),
    /// Add a rule, then apply the policy
    Add(NamedRuleArgs),
    /// Remove a rule, then apply the policy
    Remove(RuleArgs),
    /// Replace every rule, then apply the policy
    Update {
        /// Rules as a JSON array
        #[arg(long, value_name = "JSON")]
        rules: String,
    },
}

#[derive(Args, Debug, Clone)]
pub struct RuleArgs {
    /// Source CIDR
    #[arg(long)]
    pub cidr: String,

    #[arg(long)]
    pub min_port: u16,

    #[arg(long)]
    pub max_port: u16,

    /// tcp, udp or icmp
    #[arg(long, default_value = "tcp")]
    pub ip_protocol: String,
}

impl RuleArgs {
    fn to_rule(&self, name: &str) -> FirewallRule {
        FirewallRule {
            name: name.to_string(),
            cidr: self.cidr.clone(),
            min_port: self.min_port,
            max_port: self.max_port,
            ip_protocol: self.ip_protocol.clone(),
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct NamedRuleArgs {
    /// Rule name
    #[arg(long, default_value = "")]
    pub name: String,

    #[command(flatten)]
    pub rule: RuleArgs,
}

pub async fn run(command: FirewallCommand, ctx: &Context) -> Result<()> {
    run_with(command, ctx, &Driver::native(), &SystemRunner).await
}

async fn run_with(
    command: FirewallCommand,
    ctx: &Context,
    driver: &Driver,
    runner: &dyn CommandRunner,
) -> Result<()> {
    let service = FirewallService::new(ctx.concerto());
    match command {
        FirewallCommand::Show => {
            let policy = service.get_policy().await?;
            ctx.print_list(&policy.rules)?;
            if !policy.is_synced() {
                ctx.print_done("Policy not yet applied on this host");
            }
            Ok(())
        }
        FirewallCommand::Apply => {
            let policy = service.get_policy().await?;
            apply(&policy, driver, runner, ctx).await
        }
        FirewallCommand::Check(args) => {
            let policy = service.get_policy().await?;
            let exists =
                policy.check_cidr_rule_exists(&args.cidr, &args.ip_protocol, args.min_port, args.max_port);
            println!("{}", exists);
            Ok(())
        }
        FirewallCommand::Add(args) => {
            let rule = args.rule.to_rule(&args.name);
            driver.check_rule(&rule)?;
            let mut policy = service.get_policy().await?;
            if !policy.add_rule(rule) {
                ctx.print_done("Rule already present");
                return Ok(());
            }
            update_and_apply(&service, policy, driver, runner, ctx).await
        }
        FirewallCommand::Remove(args) => {
            let mut policy = service.get_policy().await?;
            if policy.remove_rule(&args.to_rule("")) == 0 {
                ctx.print_done("Rule not present");
                return Ok(());
            }
            update_and_apply(&service, policy, driver, runner, ctx).await
        }
        FirewallCommand::Update { rules } => {
            let rules: Vec<FirewallRule> = serde_json::from_str(&rules).context("invalid --rules")?;
            for rule in &rules {
                driver.check_rule(rule)?;
            }
            let policy = Policy {
                rules,
                ..Policy::default()
            };
            update_and_apply(&service, policy, driver, runner, ctx).await
        }
    }
}

async fn update_and_apply(
    service: &FirewallService<'_>,
    policy: Policy,
    driver: &Driver,
    runner: &dyn CommandRunner,
    ctx: &Context,
) -> Result<()> {
    let updated = service
        .update_rules(&policy.rules)
        .await
        .context("failed to update firewall policy")?;
    apply(&updated, driver, runner, ctx).await
}

async fn apply(policy: &Policy, driver: &Driver, runner: &dyn CommandRunner, ctx: &Context) -> Result<()> {
    firewall::apply(policy, driver, runner).await?;
    ctx.print_done(&format!(
        "Applied {} firewall rules with {}",
        policy.rules.len(),
        driver.name()
    ));
    Ok(())
}
