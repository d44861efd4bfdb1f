use super::{Context, CreateArgs, IdArgs, ListArgs, PayloadArgs, UpdateArgs};
use crate::api::clusters::ClusterService;
use crate::api::node_pools::NodePoolService;
use anyhow::Result;
use clap::{Args, Subcommand};
use serde_json::json;

#[derive(Subcommand, Debug)]
pub enum KubernetesCommand {
    /// Clusters
    #[command(subcommand)]
    Clusters(ClustersCommand),
    /// Node pools
    #[command(subcommand)]
    NodePools(NodePoolsCommand),
}

#[derive(Subcommand, Debug)]
pub enum ClustersCommand {
    /// List clusters
    List(ListArgs),
    /// Show a cluster
    Show(IdArgs),
    /// Create a cluster
    Create(CreateArgs),
    /// Update a cluster
    Update(UpdateArgs),
    /// Delete a cluster
    Delete(IdArgs),
    /// Retry a failed cluster operation
    Retry(IdArgs),
    /// Delete a cluster from Concerto only, leaving the cloud resource
    Discard(IdArgs),
    /// Show a cluster plan
    Plan(IdArgs),
}

#[derive(Args, Debug, Clone)]
pub struct ClusterArgs {
    /// Cluster id
    #[arg(long)]
    pub cluster_id: String,
}

#[derive(Args, Debug, Clone)]
pub struct CreateNodePoolArgs {
    /// Cluster id
    #[arg(long)]
    pub cluster_id: String,

    #[command(flatten)]
    pub payload: PayloadArgs,
}

#[derive(Subcommand, Debug)]
pub enum NodePoolsCommand {
    /// List node pools of a cluster
    List(ClusterArgs),
    /// Show a node pool
    Show(IdArgs),
    /// Create a node pool in a cluster
    Create(CreateNodePoolArgs),
    /// Update a node pool
    Update(UpdateArgs),
    /// Delete a node pool
    Delete(IdArgs),
    /// Retry a failed node pool operation
    Retry(IdArgs),
    /// Show a node pool plan
    Plan(IdArgs),
}

pub async fn run(command: KubernetesCommand, ctx: &Context) -> Result<()> {
    match command {
        KubernetesCommand::Clusters(command) => clusters(command, ctx).await,
        KubernetesCommand::NodePools(command) => node_pools(command, ctx).await,
    }
}

async fn clusters(command: ClustersCommand, ctx: &Context) -> Result<()> {
    let service = ClusterService::new(ctx.concerto());
    match command {
        ClustersCommand::List(args) => {
            let clusters = service.list_clusters().await?;
            ctx.print_list(&ctx.filter_labels(clusters, &args).await?)
        }
        ClustersCommand::Show(args) => ctx.print_item(&service.get_cluster(&args.id).await?),
        ClustersCommand::Create(args) => {
            let payload = args.payload.wrapped("cluster")?;
            ctx.print_item(&service.create_cluster(&payload).await?)
        }
        ClustersCommand::Update(args) => {
            let payload = args.payload.wrapped("cluster")?;
            ctx.print_item(&service.update_cluster(&args.id, &payload).await?)
        }
        ClustersCommand::Delete(args) => {
            let deleted = service.delete_cluster(&args.id).await?;
            ctx.print_deleted(deleted, &format!("Cluster {} deleted", args.id))
        }
        ClustersCommand::Retry(args) => ctx.print_item(&service.retry_cluster(&args.id, &json!({})).await?),
        ClustersCommand::Discard(args) => {
            service.discard_cluster(&args.id).await?;
            ctx.print_done(&format!("Cluster {} discarded", args.id));
            Ok(())
        }
        ClustersCommand::Plan(args) => ctx.print_item(&service.get_cluster_plan(&args.id).await?),
    }
}

async fn node_pools(command: NodePoolsCommand, ctx: &Context) -> Result<()> {
    let service = NodePoolService::new(ctx.concerto());
    match command {
        NodePoolsCommand::List(args) => ctx.print_list(&service.list_node_pools(&args.cluster_id).await?),
        NodePoolsCommand::Show(args) => ctx.print_item(&service.get_node_pool(&args.id).await?),
        NodePoolsCommand::Create(args) => {
            let payload = args.payload.wrapped("node_pool")?;
            ctx.print_item(&service.create_node_pool(&args.cluster_id, &payload).await?)
        }
        NodePoolsCommand::Update(args) => {
            let payload = args.payload.wrapped("node_pool")?;
            ctx.print_item(&service.update_node_pool(&args.id, &payload).await?)
        }
        NodePoolsCommand::Delete(args) => {
            let deleted = service.delete_node_pool(&args.id).await?;
            ctx.print_deleted(deleted, &format!("Node pool {} deleted", args.id))
        }
        NodePoolsCommand::Retry(args) => ctx.print_item(&service.retry_node_pool(&args.id, &json!({})).await?),
        NodePoolsCommand::Plan(args) => ctx.print_item(&service.get_node_pool_plan(&args.id).await?),
    }
}
