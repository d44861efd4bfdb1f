//! Kubernetes node pools and node pool plans

use super::de::nullable;
use super::{request, ConcertoService, Result};
use crate::format::{Column, Columns};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use urlencoding::encode;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NodePool {
    #[serde(deserialize_with = "nullable")]
    pub id: String,
    #[serde(deserialize_with = "nullable")]
    pub name: String,
    #[serde(deserialize_with = "nullable")]
    pub cluster_id: String,
    #[serde(deserialize_with = "nullable")]
    pub subnet_id: String,
    #[serde(deserialize_with = "nullable")]
    pub node_pool_plan_id: String,
    #[serde(deserialize_with = "nullable")]
    pub cpu_type: String,
    #[serde(deserialize_with = "nullable")]
    pub disk_size: i64,
    #[serde(deserialize_with = "nullable")]
    pub min_nodes: i64,
    #[serde(deserialize_with = "nullable")]
    pub max_nodes: i64,
    #[serde(deserialize_with = "nullable")]
    pub desired_nodes: i64,
    #[serde(deserialize_with = "nullable")]
    pub pods_per_node: i64,
    #[serde(deserialize_with = "nullable")]
    pub autoscaling_enabled: bool,
    #[serde(deserialize_with = "nullable")]
    pub state: String,
}

impl Columns for NodePool {
    const COLUMNS: &'static [Column] = &[
        Column::new("ID", "id"),
        Column::new("NAME", "name"),
        Column::new("CLUSTER ID", "cluster_id"),
        Column::new("SUBNET ID", "subnet_id"),
        Column::new("NODE POOL PLAN ID", "node_pool_plan_id"),
        Column::new("CPU TYPE", "cpu_type"),
        Column::new("DISK SIZE", "disk_size"),
        Column::new("MIN NODES", "min_nodes"),
        Column::new("MAX NODES", "max_nodes"),
        Column::new("DESIRED NODES", "desired_nodes"),
        Column::new("PODS PER NODE", "pods_per_node"),
        Column::new("AUTOSCALING", "autoscaling_enabled"),
        Column::new("STATE", "state"),
    ];
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NodePoolPlan {
    #[serde(deserialize_with = "nullable")]
    pub id: String,
    #[serde(deserialize_with = "nullable")]
    pub name: String,
    #[serde(deserialize_with = "nullable")]
    pub cpu_types: Vec<String>,
    #[serde(deserialize_with = "nullable")]
    pub cpus: i64,
    #[serde(deserialize_with = "nullable")]
    pub memory: i64,
    #[serde(deserialize_with = "nullable")]
    pub cloud_provider_id: String,
    #[serde(deserialize_with = "nullable")]
    pub realm_id: String,
    #[serde(deserialize_with = "nullable")]
    pub flavour_provider_name: String,
}

impl Columns for NodePoolPlan {
    const COLUMNS: &'static [Column] = &[
        Column::new("ID", "id"),
        Column::new("NAME", "name"),
        Column::new("CPU TYPES", "cpu_types"),
        Column::new("CPUS", "cpus"),
        Column::new("MEMORY", "memory"),
        Column::new("CLOUD PROVIDER ID", "cloud_provider_id"),
        Column::new("REALM ID", "realm_id"),
        Column::new("FLAVOUR", "flavour_provider_name"),
    ];
}

pub struct NodePoolService<'a> {
    concerto: &'a dyn ConcertoService,
}

impl<'a> NodePoolService<'a> {
    pub fn new(concerto: &'a dyn ConcertoService) -> Self {
        Self { concerto }
    }

    /// List the node pools of a cluster
    pub async fn list_node_pools(&self, cluster_id: &str) -> Result<Vec<NodePool>> {
        request::get(self.concerto, &cluster_node_pools_path(cluster_id)).await
    }

    /// Create a node pool in a cluster
    pub async fn create_node_pool(&self, cluster_id: &str, payload: &Value) -> Result<NodePool> {
        request::post(self.concerto, &cluster_node_pools_path(cluster_id), payload).await
    }

    pub async fn get_node_pool(&self, node_pool_id: &str) -> Result<NodePool> {
        request::get(self.concerto, &node_pool_path(node_pool_id)).await
    }

    pub async fn update_node_pool(&self, node_pool_id: &str, payload: &Value) -> Result<NodePool> {
        request::put(self.concerto, &node_pool_path(node_pool_id), payload).await
    }

    pub async fn delete_node_pool(&self, node_pool_id: &str) -> Result<Option<NodePool>> {
        request::delete_json(self.concerto, &node_pool_path(node_pool_id)).await
    }

    /// Retry a failed node pool operation
    pub async fn retry_node_pool(&self, node_pool_id: &str, payload: &Value) -> Result<NodePool> {
        tracing::info!("retry node pool {}", node_pool_id);
        request::put(
            self.concerto,
            &format!("{}/retry", node_pool_path(node_pool_id)),
            payload,
        )
        .await
    }

    pub async fn get_node_pool_plan(&self, plan_id: &str) -> Result<NodePoolPlan> {
        request::get(
            self.concerto,
            &format!("/kubernetes/node_pool_plans/{}", encode(plan_id)),
        )
        .await
    }
}

fn cluster_node_pools_path(cluster_id: &str) -> String {
    format!("/kubernetes/clusters/{}/node_pools", encode(cluster_id))
}

fn node_pool_path(node_pool_id: &str) -> String {
    format!("/kubernetes/node_pools/{}", encode(node_pool_id))
}
