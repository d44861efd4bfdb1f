//! Kubernetes clusters and cluster plans

use super::de::nullable;
use super::labels::Labelled;
use super::{request, ConcertoService, Result};
use crate::format::{Column, Columns};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use urlencoding::encode;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Cluster {
    #[serde(deserialize_with = "nullable")]
    pub id: String,
    #[serde(deserialize_with = "nullable")]
    pub name: String,
    #[serde(deserialize_with = "nullable")]
    pub state: String,
    #[serde(deserialize_with = "nullable")]
    pub master_count: i64,
    #[serde(deserialize_with = "nullable")]
    pub master_ready: bool,
    #[serde(deserialize_with = "nullable")]
    pub version: String,
    #[serde(deserialize_with = "nullable")]
    pub node_pool_ids: Vec<String>,
    #[serde(deserialize_with = "nullable")]
    pub cloud_account_id: String,
    #[serde(deserialize_with = "nullable")]
    pub realm_id: String,
    #[serde(deserialize_with = "nullable")]
    pub cluster_plan_id: String,
    #[serde(deserialize_with = "nullable")]
    pub public_access_ip_addresses: Vec<String>,
    #[serde(deserialize_with = "nullable")]
    pub label_ids: Vec<String>,
    #[serde(deserialize_with = "nullable")]
    pub resource_type: String,
}

impl Columns for Cluster {
    const COLUMNS: &'static [Column] = &[
        Column::new("ID", "id"),
        Column::new("NAME", "name"),
        Column::new("STATE", "state"),
        Column::new("MASTER COUNT", "master_count"),
        Column::new("MASTER READY", "master_ready"),
        Column::new("VERSION", "version"),
        Column::new("NODE POOL IDS", "node_pool_ids"),
        Column::new("CLOUD ACCOUNT ID", "cloud_account_id"),
        Column::new("REALM ID", "realm_id"),
        Column::new("CLUSTER PLAN ID", "cluster_plan_id"),
        Column::new("PUBLIC ACCESS IPS", "public_access_ip_addresses"),
        Column::new("LABELS", "label_ids"),
    ];
}

impl Labelled for Cluster {
    fn label_ids(&self) -> &[String] {
        &self.label_ids
    }
}

/// Control-plane plan offered by a cloud provider
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusterPlan {
    #[serde(deserialize_with = "nullable")]
    pub id: String,
    #[serde(deserialize_with = "nullable")]
    pub name: String,
    #[serde(deserialize_with = "nullable")]
    pub available_versions: Vec<String>,
    #[serde(deserialize_with = "nullable")]
    pub default_version: String,
    #[serde(deserialize_with = "nullable")]
    pub max_pods_per_node: i64,
    #[serde(deserialize_with = "nullable")]
    pub max_nodes_per_node_pool: i64,
    #[serde(deserialize_with = "nullable")]
    pub cloud_provider_id: String,
    #[serde(deserialize_with = "nullable")]
    pub realm_id: String,
    #[serde(deserialize_with = "nullable")]
    pub flavour_provider_name: String,
}

impl Columns for ClusterPlan {
    const COLUMNS: &'static [Column] = &[
        Column::new("ID", "id"),
        Column::new("NAME", "name"),
        Column::new("AVAILABLE VERSIONS", "available_versions"),
        Column::new("DEFAULT VERSION", "default_version"),
        Column::new("MAX PODS PER NODE", "max_pods_per_node"),
        Column::new("MAX NODES PER POOL", "max_nodes_per_node_pool"),
        Column::new("CLOUD PROVIDER ID", "cloud_provider_id"),
        Column::new("REALM ID", "realm_id"),
    ];
}

pub struct ClusterService<'a> {
    concerto: &'a dyn ConcertoService,
}

impl<'a> ClusterService<'a> {
    pub fn new(concerto: &'a dyn ConcertoService) -> Self {
        Self { concerto }
    }

    pub async fn list_clusters(&self) -> Result<Vec<Cluster>> {
        request::get(self.concerto, "/kubernetes/clusters").await
    }

    pub async fn get_cluster(&self, cluster_id: &str) -> Result<Cluster> {
        request::get(self.concerto, &cluster_path(cluster_id)).await
    }

    pub async fn create_cluster(&self, payload: &Value) -> Result<Cluster> {
        request::post(self.concerto, "/kubernetes/clusters", payload).await
    }

    pub async fn update_cluster(&self, cluster_id: &str, payload: &Value) -> Result<Cluster> {
        request::put(self.concerto, &cluster_path(cluster_id), payload).await
    }

    /// Retry a failed provisioning or update
    pub async fn retry_cluster(&self, cluster_id: &str, payload: &Value) -> Result<Cluster> {
        tracing::info!("retry cluster {}", cluster_id);
        request::put(self.concerto, &format!("{}/retry", cluster_path(cluster_id)), payload).await
    }

    pub async fn delete_cluster(&self, cluster_id: &str) -> Result<Option<Cluster>> {
        request::delete_json(self.concerto, &cluster_path(cluster_id)).await
    }

    /// Forget the cluster without decommissioning it at the provider
    pub async fn discard_cluster(&self, cluster_id: &str) -> Result<()> {
        request::delete(self.concerto, &format!("{}/discard", cluster_path(cluster_id))).await
    }

    pub async fn get_cluster_plan(&self, plan_id: &str) -> Result<ClusterPlan> {
        request::get(
            self.concerto,
            &format!("/kubernetes/cluster_plans/{}", encode(plan_id)),
        )
        .await
    }
}

fn cluster_path(cluster_id: &str) -> String {
    format!("/kubernetes/clusters/{}", encode(cluster_id))
}
