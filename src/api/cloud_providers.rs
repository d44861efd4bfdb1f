//! Cloud providers and the plans they offer

use super::de::nullable;
use super::load_balancers::LoadBalancerPlan;
use super::volumes::StoragePlan;
use super::clusters::ClusterPlan;
use super::{request, ConcertoService, Result};
use crate::format::{Column, Columns};
use serde::{Deserialize, Serialize};
use urlencoding::encode;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CloudProvider {
    #[serde(deserialize_with = "nullable")]
    pub id: String,
    #[serde(deserialize_with = "nullable")]
    pub name: String,
    #[serde(deserialize_with = "nullable")]
    pub required_credentials: Vec<String>,
    #[serde(deserialize_with = "nullable")]
    pub provided_services: Vec<String>,
}

impl Columns for CloudProvider {
    const COLUMNS: &'static [Column] = &[
        Column::new("ID", "id"),
        Column::new("NAME", "name"),
        Column::new("REQUIRED CREDENTIALS", "required_credentials"),
        Column::new("PROVIDED SERVICES", "provided_services"),
    ];
}

pub struct CloudProviderService<'a> {
    concerto: &'a dyn ConcertoService,
}

impl<'a> CloudProviderService<'a> {
    pub fn new(concerto: &'a dyn ConcertoService) -> Self {
        Self { concerto }
    }

    pub async fn list_cloud_providers(&self) -> Result<Vec<CloudProvider>> {
        request::get(self.concerto, "/cloud/cloud_providers").await
    }

    pub async fn list_storage_plans(&self, cloud_provider_id: &str) -> Result<Vec<StoragePlan>> {
        request::get(self.concerto, &plans_path(cloud_provider_id, "storage_plans")).await
    }

    pub async fn list_load_balancer_plans(&self, cloud_provider_id: &str) -> Result<Vec<LoadBalancerPlan>> {
        request::get(
            self.concerto,
            &plans_path(cloud_provider_id, "load_balancer_plans"),
        )
        .await
    }

    pub async fn list_cluster_plans(&self, cloud_provider_id: &str) -> Result<Vec<ClusterPlan>> {
        request::get(self.concerto, &plans_path(cloud_provider_id, "cluster_plans")).await
    }
}

fn plans_path(cloud_provider_id: &str, plans: &str) -> String {
    format!("/cloud/cloud_providers/{}/{}", encode(cloud_provider_id), plans)
}
