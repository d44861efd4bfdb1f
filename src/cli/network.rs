use super::{Context, CreateArgs, IdArgs, ListArgs, UpdateArgs};
use crate::api::firewall_profiles::FirewallProfileService;
use crate::api::floating_ips::FloatingIpService;
use crate::api::load_balancers::LoadBalancerService;
use anyhow::Result;
use clap::Subcommand;

#[derive(Subcommand, Debug)]
pub enum NetworkCommand {
    /// Firewall profiles
    #[command(subcommand)]
    FirewallProfiles(FirewallProfilesCommand),
    /// Floating IPs
    #[command(subcommand)]
    FloatingIps(FloatingIpsCommand),
    /// Load balancers
    #[command(subcommand)]
    LoadBalancers(LoadBalancersCommand),
    /// Load balancer target groups
    #[command(subcommand)]
    TargetGroups(TargetGroupsCommand),
}

#[derive(Subcommand, Debug)]
pub enum FirewallProfilesCommand {
    /// List firewall profiles
    List(ListArgs),
    /// Show a firewall profile
    Show(IdArgs),
    /// Create a firewall profile
    Create(CreateArgs),
    /// Update a firewall profile
    Update(UpdateArgs),
    /// Delete a firewall profile
    Delete(IdArgs),
}

#[derive(Subcommand, Debug)]
pub enum FloatingIpsCommand {
    /// List floating IPs
    List(ListArgs),
    /// Show a floating IP
    Show(IdArgs),
    /// Create a floating IP
    Create(CreateArgs),
    /// Update a floating IP
    Update(UpdateArgs),
    /// Attach a floating IP to a server (--set attached_server_id=...)
    Attach(UpdateArgs),
    /// Detach a floating IP from its server
    Detach(IdArgs),
    /// Delete a floating IP
    Delete(IdArgs),
    /// Delete a floating IP from Concerto only, leaving the cloud resource
    Discard(IdArgs),
}

#[derive(Subcommand, Debug)]
pub enum LoadBalancersCommand {
    /// List load balancers
    List(ListArgs),
    /// Show a load balancer
    Show(IdArgs),
    /// Create a load balancer
    Create(CreateArgs),
    /// Update a load balancer
    Update(UpdateArgs),
    /// Delete a load balancer
    Delete(IdArgs),
    /// Retry a failed load balancer operation
    Retry(IdArgs),
    /// List target groups of a load balancer
    TargetGroups(IdArgs),
    /// Create a target group in a load balancer
    CreateTargetGroup(UpdateArgs),
}

#[derive(Subcommand, Debug)]
pub enum TargetGroupsCommand {
    /// Show a target group
    Show(IdArgs),
    /// Update a target group
    Update(UpdateArgs),
    /// Delete a target group
    Delete(IdArgs),
    /// Retry a failed target group operation
    Retry(IdArgs),
}

pub async fn run(command: NetworkCommand, ctx: &Context) -> Result<()> {
    match command {
        NetworkCommand::FirewallProfiles(command) => firewall_profiles(command, ctx).await,
        NetworkCommand::FloatingIps(command) => floating_ips(command, ctx).await,
        NetworkCommand::LoadBalancers(command) => load_balancers(command, ctx).await,
        NetworkCommand::TargetGroups(command) => target_groups(command, ctx).await,
    }
}

async fn firewall_profiles(command: FirewallProfilesCommand, ctx: &Context) -> Result<()> {
    let service = FirewallProfileService::new(ctx.concerto());
    match command {
        FirewallProfilesCommand::List(args) => {
            let profiles = service.list_firewall_profiles().await?;
            ctx.print_list(&ctx.filter_labels(profiles, &args).await?)
        }
        FirewallProfilesCommand::Show(args) => {
            ctx.print_item(&service.get_firewall_profile(&args.id).await?)
        }
        FirewallProfilesCommand::Create(args) => {
            let payload = args.payload.wrapped("firewall_profile")?;
            ctx.print_item(&service.create_firewall_profile(&payload).await?)
        }
        FirewallProfilesCommand::Update(args) => {
            let payload = args.payload.wrapped("firewall_profile")?;
            ctx.print_item(&service.update_firewall_profile(&args.id, &payload).await?)
        }
        FirewallProfilesCommand::Delete(args) => {
            service.delete_firewall_profile(&args.id).await?;
            ctx.print_done(&format!("Firewall profile {} deleted", args.id));
            Ok(())
        }
    }
}

async fn floating_ips(command: FloatingIpsCommand, ctx: &Context) -> Result<()> {
    let service = FloatingIpService::new(ctx.concerto());
    match command {
        FloatingIpsCommand::List(args) => {
            let ips = service.list_floating_ips().await?;
            ctx.print_list(&ctx.filter_labels(ips, &args).await?)
        }
        FloatingIpsCommand::Show(args) => ctx.print_item(&service.get_floating_ip(&args.id).await?),
        FloatingIpsCommand::Create(args) => {
            let payload = args.payload.wrapped("floating_ip")?;
            ctx.print_item(&service.create_floating_ip(&payload).await?)
        }
        FloatingIpsCommand::Update(args) => {
            let payload = args.payload.wrapped("floating_ip")?;
            ctx.print_item(&service.update_floating_ip(&args.id, &payload).await?)
        }
        FloatingIpsCommand::Attach(args) => {
            let payload = args.payload.wrapped("floating_ip")?;
            ctx.print_item(&service.attach_floating_ip(&args.id, &payload).await?)
        }
        FloatingIpsCommand::Detach(args) => {
            service.detach_floating_ip(&args.id).await?;
            ctx.print_done(&format!("Floating IP {} detached", args.id));
            Ok(())
        }
        FloatingIpsCommand::Delete(args) => {
            service.delete_floating_ip(&args.id).await?;
            ctx.print_done(&format!("Floating IP {} deleted", args.id));
            Ok(())
        }
        FloatingIpsCommand::Discard(args) => {
            service.discard_floating_ip(&args.id).await?;
            ctx.print_done(&format!("Floating IP {} discarded", args.id));
            Ok(())
        }
    }
}

async fn load_balancers(command: LoadBalancersCommand, ctx: &Context) -> Result<()> {
    let service = LoadBalancerService::new(ctx.concerto());
    match command {
        LoadBalancersCommand::List(args) => {
            let load_balancers = service.list_load_balancers().await?;
            ctx.print_list(&ctx.filter_labels(load_balancers, &args).await?)
        }
        LoadBalancersCommand::Show(args) => ctx.print_item(&service.get_load_balancer(&args.id).await?),
        LoadBalancersCommand::Create(args) => {
            let payload = args.payload.wrapped("load_balancer")?;
            ctx.print_item(&service.create_load_balancer(&payload).await?)
        }
        LoadBalancersCommand::Update(args) => {
            let payload = args.payload.wrapped("load_balancer")?;
            ctx.print_item(&service.update_load_balancer(&args.id, &payload).await?)
        }
        LoadBalancersCommand::Delete(args) => {
            let deleted = service.delete_load_balancer(&args.id).await?;
            ctx.print_deleted(deleted, &format!("Load balancer {} deleted", args.id))
        }
        LoadBalancersCommand::Retry(args) => {
            ctx.print_item(&service.retry_load_balancer(&args.id, &serde_json::json!({})).await?)
        }
        LoadBalancersCommand::TargetGroups(args) => {
            ctx.print_list(&service.list_target_groups(&args.id).await?)
        }
        LoadBalancersCommand::CreateTargetGroup(args) => {
            let payload = args.payload.wrapped("target_group")?;
            ctx.print_item(&service.create_target_group(&args.id, &payload).await?)
        }
    }
}

async fn target_groups(command: TargetGroupsCommand, ctx: &Context) -> Result<()> {
    let service = LoadBalancerService::new(ctx.concerto());
    match command {
        TargetGroupsCommand::Show(args) => ctx.print_item(&service.get_target_group(&args.id).await?),
        TargetGroupsCommand::Update(args) => {
            let payload = args.payload.wrapped("target_group")?;
            ctx.print_item(&service.update_target_group(&args.id, &payload).await?)
        }
        TargetGroupsCommand::Delete(args) => {
            let deleted = service.delete_target_group(&args.id).await?;
            ctx.print_deleted(deleted, &format!("Target group {} deleted", args.id))
        }
        TargetGroupsCommand::Retry(args) => {
            ctx.print_item(&service.retry_target_group(&args.id, &serde_json::json!({})).await?)
        }
    }
}
