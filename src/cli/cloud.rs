use super::{Context, CreateArgs, IdArgs, ListArgs, UpdateArgs};
use crate::api::cloud_providers::CloudProviderService;
use crate::api::realms::RealmService;
use crate::api::server_arrays::ServerArrayService;
use crate::api::server_plans::ServerPlanService;
use crate::api::servers::ServerService;
use crate::api::ssh_profiles::SshProfileService;
use anyhow::Result;
use clap::{Args, Subcommand};
use serde_json::json;

#[derive(Subcommand, Debug)]
pub enum CloudCommand {
    /// Servers
    #[command(subcommand)]
    Servers(ServersCommand),
    /// Server arrays
    #[command(subcommand)]
    ServerArrays(ServerArraysCommand),
    /// Server plans
    #[command(subcommand)]
    ServerPlans(ServerPlansCommand),
    /// Cloud providers and their plans
    #[command(subcommand)]
    CloudProviders(CloudProvidersCommand),
    /// Realms
    #[command(subcommand)]
    Realms(RealmsCommand),
    /// SSH profiles
    #[command(subcommand)]
    SshProfiles(SshProfilesCommand),
}

#[derive(Subcommand, Debug)]
pub enum ServersCommand {
    /// List servers
    List(ListArgs),
    /// Show a server
    Show(IdArgs),
    /// Create a server
    Create(CreateArgs),
    /// Update a server
    Update(UpdateArgs),
    /// Boot a server
    Boot(IdArgs),
    /// Reboot a server
    Reboot(IdArgs),
    /// Shut a server down
    Shutdown(IdArgs),
    /// Override a server's state
    Override(IdArgs),
    /// Delete a server
    Delete(IdArgs),
    /// List events of a server
    Events(IdArgs),
    /// List floating IPs attached to a server
    FloatingIps(IdArgs),
    /// List volumes attached to a server
    Volumes(IdArgs),
}

#[derive(Subcommand, Debug)]
pub enum ServerArraysCommand {
    /// List server arrays
    List(ListArgs),
    /// Show a server array
    Show(IdArgs),
    /// Create a server array
    Create(CreateArgs),
    /// Update a server array
    Update(UpdateArgs),
    /// Boot every server of an array
    Boot(IdArgs),
    /// Shut every server of an array down
    Shutdown(IdArgs),
    /// Remove every server of an array
    Empty(IdArgs),
    /// Add servers to an array
    Enlarge(UpdateArgs),
    /// List the servers of an array
    Servers(IdArgs),
    /// Delete a server array
    Delete(IdArgs),
}

/// Plans are scoped to a cloud provider
#[derive(Args, Debug, Clone)]
pub struct ProviderArgs {
    /// Cloud provider id
    #[arg(long)]
    pub cloud_provider_id: String,
}

#[derive(Subcommand, Debug)]
pub enum ServerPlansCommand {
    /// List the server plans of a cloud provider
    List(ProviderArgs),
    /// Show a server plan
    Show(IdArgs),
}

#[derive(Subcommand, Debug)]
pub enum CloudProvidersCommand {
    /// List cloud providers
    List,
    /// List storage plans of a cloud provider
    StoragePlans(IdArgs),
    /// List load balancer plans of a cloud provider
    LoadBalancerPlans(IdArgs),
    /// List cluster plans of a cloud provider
    ClusterPlans(IdArgs),
}

#[derive(Subcommand, Debug)]
pub enum RealmsCommand {
    /// List the realms of a cloud provider
    List(ProviderArgs),
    /// Show a realm
    Show(IdArgs),
    /// List node pool plans available in a realm
    NodePoolPlans(IdArgs),
}

#[derive(Subcommand, Debug)]
pub enum SshProfilesCommand {
    /// List SSH profiles
    List(ListArgs),
    /// Show an SSH profile
    Show(IdArgs),
    /// Create an SSH profile
    Create(CreateArgs),
    /// Update an SSH profile
    Update(UpdateArgs),
    /// Delete an SSH profile
    Delete(IdArgs),
}

pub async fn run(command: CloudCommand, ctx: &Context) -> Result<()> {
    match command {
        CloudCommand::Servers(command) => servers(command, ctx).await,
        CloudCommand::ServerArrays(command) => server_arrays(command, ctx).await,
        CloudCommand::ServerPlans(command) => server_plans(command, ctx).await,
        CloudCommand::CloudProviders(command) => cloud_providers(command, ctx).await,
        CloudCommand::Realms(command) => realms(command, ctx).await,
        CloudCommand::SshProfiles(command) => ssh_profiles(command, ctx).await,
    }
}

async fn servers(command: ServersCommand, ctx: &Context) -> Result<()> {
    let service = ServerService::new(ctx.concerto());
    match command {
        ServersCommand::List(args) => {
            let servers = service.list_servers().await?;
            ctx.print_list(&ctx.filter_labels(servers, &args).await?)
        }
        ServersCommand::Show(args) => ctx.print_item(&service.get_server(&args.id).await?),
        ServersCommand::Create(args) => {
            let payload = args.payload.wrapped("server")?;
            ctx.print_item(&service.create_server(&payload).await?)
        }
        ServersCommand::Update(args) => {
            let payload = args.payload.wrapped("server")?;
            ctx.print_item(&service.update_server(&args.id, &payload).await?)
        }
        ServersCommand::Boot(args) => ctx.print_item(&service.boot_server(&args.id, &json!({})).await?),
        ServersCommand::Reboot(args) => ctx.print_item(&service.reboot_server(&args.id, &json!({})).await?),
        ServersCommand::Shutdown(args) => {
            ctx.print_item(&service.shutdown_server(&args.id, &json!({})).await?)
        }
        ServersCommand::Override(args) => {
            ctx.print_item(&service.override_server(&args.id, &json!({})).await?)
        }
        ServersCommand::Delete(args) => {
            service.delete_server(&args.id).await?;
            ctx.print_done(&format!("Server {} deleted", args.id));
            Ok(())
        }
        ServersCommand::Events(args) => ctx.print_list(&service.list_events(&args.id).await?),
        ServersCommand::FloatingIps(args) => ctx.print_list(&service.list_floating_ips(&args.id).await?),
        ServersCommand::Volumes(args) => ctx.print_list(&service.list_volumes(&args.id).await?),
    }
}

async fn server_arrays(command: ServerArraysCommand, ctx: &Context) -> Result<()> {
    let service = ServerArrayService::new(ctx.concerto());
    match command {
        ServerArraysCommand::List(args) => {
            let arrays = service.list_server_arrays().await?;
            ctx.print_list(&ctx.filter_labels(arrays, &args).await?)
        }
        ServerArraysCommand::Show(args) => ctx.print_item(&service.get_server_array(&args.id).await?),
        ServerArraysCommand::Create(args) => {
            let payload = args.payload.wrapped("server_array")?;
            ctx.print_item(&service.create_server_array(&payload).await?)
        }
        ServerArraysCommand::Update(args) => {
            let payload = args.payload.wrapped("server_array")?;
            ctx.print_item(&service.update_server_array(&args.id, &payload).await?)
        }
        ServerArraysCommand::Boot(args) => {
            ctx.print_item(&service.boot_server_array(&args.id, &json!({})).await?)
        }
        ServerArraysCommand::Shutdown(args) => {
            ctx.print_item(&service.shutdown_server_array(&args.id, &json!({})).await?)
        }
        ServerArraysCommand::Empty(args) => {
            ctx.print_item(&service.empty_server_array(&args.id, &json!({})).await?)
        }
        ServerArraysCommand::Enlarge(args) => {
            let payload = args.payload.wrapped_or_empty("server_array")?;
            ctx.print_item(&service.enlarge_server_array(&args.id, &payload).await?)
        }
        ServerArraysCommand::Servers(args) => {
            ctx.print_list(&service.list_server_array_servers(&args.id).await?)
        }
        ServerArraysCommand::Delete(args) => {
            service.delete_server_array(&args.id).await?;
            ctx.print_done(&format!("Server array {} deleted", args.id));
            Ok(())
        }
    }
}

async fn server_plans(command: ServerPlansCommand, ctx: &Context) -> Result<()> {
    let service = ServerPlanService::new(ctx.concerto());
    match command {
        ServerPlansCommand::List(args) => {
            ctx.print_list(&service.list_server_plans(&args.cloud_provider_id).await?)
        }
        ServerPlansCommand::Show(args) => ctx.print_item(&service.get_server_plan(&args.id).await?),
    }
}

async fn cloud_providers(command: CloudProvidersCommand, ctx: &Context) -> Result<()> {
    let service = CloudProviderService::new(ctx.concerto());
    match command {
        CloudProvidersCommand::List => ctx.print_list(&service.list_cloud_providers().await?),
        CloudProvidersCommand::StoragePlans(args) => {
            ctx.print_list(&service.list_storage_plans(&args.id).await?)
        }
        CloudProvidersCommand::LoadBalancerPlans(args) => {
            ctx.print_list(&service.list_load_balancer_plans(&args.id).await?)
        }
        CloudProvidersCommand::ClusterPlans(args) => {
            ctx.print_list(&service.list_cluster_plans(&args.id).await?)
        }
    }
}

async fn realms(command: RealmsCommand, ctx: &Context) -> Result<()> {
    let service = RealmService::new(ctx.concerto());
    match command {
        RealmsCommand::List(args) => ctx.print_list(&service.list_realms(&args.cloud_provider_id).await?),
        RealmsCommand::Show(args) => ctx.print_item(&service.get_realm(&args.id).await?),
        RealmsCommand::NodePoolPlans(args) => {
            ctx.print_list(&service.list_node_pool_plans(&args.id).await?)
        }
    }
}

async fn ssh_profiles(command: SshProfilesCommand, ctx: &Context) -> Result<()> {
    let service = SshProfileService::new(ctx.concerto());
    match command {
        SshProfilesCommand::List(args) => {
            let profiles = service.list_ssh_profiles().await?;
            ctx.print_list(&ctx.filter_labels(profiles, &args).await?)
        }
        SshProfilesCommand::Show(args) => ctx.print_item(&service.get_ssh_profile(&args.id).await?),
        SshProfilesCommand::Create(args) => {
            let payload = args.payload.wrapped("ssh_profile")?;
            ctx.print_item(&service.create_ssh_profile(&payload).await?)
        }
        SshProfilesCommand::Update(args) => {
            let payload = args.payload.wrapped("ssh_profile")?;
            ctx.print_item(&service.update_ssh_profile(&args.id, &payload).await?)
        }
        SshProfilesCommand::Delete(args) => {
            service.delete_ssh_profile(&args.id).await?;
            ctx.print_done(&format!("SSH profile {} deleted", args.id));
            Ok(())
        }
    }
}
