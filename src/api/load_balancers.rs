//! Load balancers, their target groups and load balancer plans

use super::de::nullable;
use super::labels::Labelled;
use super::{request, ConcertoService, Result};
use crate::format::{Column, Columns};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use urlencoding::encode;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoadBalancer {
    #[serde(deserialize_with = "nullable")]
    pub id: String,
    #[serde(deserialize_with = "nullable")]
    pub name: String,
    #[serde(deserialize_with = "nullable")]
    pub state: String,
    #[serde(deserialize_with = "nullable")]
    pub dns_name: String,
    #[serde(deserialize_with = "nullable")]
    pub global_state: String,
    #[serde(deserialize_with = "nullable")]
    pub cloud_account_id: String,
    #[serde(deserialize_with = "nullable")]
    pub realm_id: String,
    #[serde(deserialize_with = "nullable")]
    pub vpc_id: String,
    #[serde(deserialize_with = "nullable")]
    pub load_balancer_plan_id: String,
    #[serde(deserialize_with = "nullable")]
    pub label_ids: Vec<String>,
    #[serde(deserialize_with = "nullable")]
    pub resource_type: String,
}

impl Columns for LoadBalancer {
    const COLUMNS: &'static [Column] = &[
        Column::new("ID", "id"),
        Column::new("NAME", "name"),
        Column::new("STATE", "state"),
        Column::new("DNS NAME", "dns_name"),
        Column::new("GLOBAL STATE", "global_state"),
        Column::new("CLOUD ACCOUNT ID", "cloud_account_id"),
        Column::new("REALM ID", "realm_id"),
        Column::new("VPC ID", "vpc_id"),
        Column::new("PLAN ID", "load_balancer_plan_id"),
        Column::new("LABELS", "label_ids"),
    ];
}

impl Labelled for LoadBalancer {
    fn label_ids(&self) -> &[String] {
        &self.label_ids
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TargetGroup {
    #[serde(deserialize_with = "nullable")]
    pub id: String,
    #[serde(deserialize_with = "nullable")]
    pub name: String,
    #[serde(deserialize_with = "nullable")]
    pub state: String,
    #[serde(deserialize_with = "nullable")]
    pub protocol: String,
    #[serde(deserialize_with = "nullable")]
    pub port: i64,
    #[serde(deserialize_with = "nullable")]
    pub stickiness: bool,
    #[serde(deserialize_with = "nullable")]
    pub health_check_protocol: String,
    #[serde(deserialize_with = "nullable")]
    pub health_check_port: i64,
    #[serde(deserialize_with = "nullable")]
    pub health_check_interval: i64,
    #[serde(deserialize_with = "nullable")]
    pub health_check_threshold_count: i64,
    #[serde(deserialize_with = "nullable")]
    pub health_check_path: String,
    #[serde(deserialize_with = "nullable")]
    pub load_balancer_id: String,
    #[serde(deserialize_with = "nullable")]
    pub label_ids: Vec<String>,
    #[serde(deserialize_with = "nullable")]
    pub resource_type: String,
}

impl Columns for TargetGroup {
    const COLUMNS: &'static [Column] = &[
        Column::new("ID", "id"),
        Column::new("NAME", "name"),
        Column::new("STATE", "state"),
        Column::new("PROTOCOL", "protocol"),
        Column::new("PORT", "port"),
        Column::new("STICKINESS", "stickiness"),
        Column::new("HEALTH CHECK PROTOCOL", "health_check_protocol"),
        Column::new("HEALTH CHECK PORT", "health_check_port"),
        Column::new("LOAD BALANCER ID", "load_balancer_id"),
        Column::new("LABELS", "label_ids"),
    ];
}

impl Labelled for TargetGroup {
    fn label_ids(&self) -> &[String] {
        &self.label_ids
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoadBalancerPlan {
    #[serde(deserialize_with = "nullable")]
    pub id: String,
    #[serde(deserialize_with = "nullable")]
    pub name: String,
    #[serde(deserialize_with = "nullable")]
    pub cloud_provider_id: String,
    #[serde(deserialize_with = "nullable")]
    pub cloud_provider_name: String,
    #[serde(deserialize_with = "nullable")]
    pub realm_id: String,
    #[serde(deserialize_with = "nullable")]
    pub flavour_provider_name: String,
    #[serde(deserialize_with = "nullable")]
    pub deprecated: bool,
}

impl Columns for LoadBalancerPlan {
    const COLUMNS: &'static [Column] = &[
        Column::new("ID", "id"),
        Column::new("NAME", "name"),
        Column::new("CLOUD PROVIDER ID", "cloud_provider_id"),
        Column::new("CLOUD PROVIDER NAME", "cloud_provider_name"),
        Column::new("REALM ID", "realm_id"),
        Column::new("FLAVOUR", "flavour_provider_name"),
        Column::new("DEPRECATED", "deprecated"),
    ];
}

pub struct LoadBalancerService<'a> {
    concerto: &'a dyn ConcertoService,
}

impl<'a> LoadBalancerService<'a> {
    pub fn new(concerto: &'a dyn ConcertoService) -> Self {
        Self { concerto }
    }

    pub async fn list_load_balancers(&self) -> Result<Vec<LoadBalancer>> {
        request::get(self.concerto, "/network/load_balancers").await
    }

    pub async fn get_load_balancer(&self, load_balancer_id: &str) -> Result<LoadBalancer> {
        request::get(self.concerto, &load_balancer_path(load_balancer_id)).await
    }

    pub async fn create_load_balancer(&self, payload: &Value) -> Result<LoadBalancer> {
        request::post(self.concerto, "/network/load_balancers", payload).await
    }

    pub async fn update_load_balancer(&self, load_balancer_id: &str, payload: &Value) -> Result<LoadBalancer> {
        request::put(self.concerto, &load_balancer_path(load_balancer_id), payload).await
    }

    pub async fn delete_load_balancer(&self, load_balancer_id: &str) -> Result<Option<LoadBalancer>> {
        request::delete_json(self.concerto, &load_balancer_path(load_balancer_id)).await
    }

    pub async fn retry_load_balancer(&self, load_balancer_id: &str, payload: &Value) -> Result<LoadBalancer> {
        tracing::info!("retry load balancer {}", load_balancer_id);
        request::put(
            self.concerto,
            &format!("{}/retry", load_balancer_path(load_balancer_id)),
            payload,
        )
        .await
    }

    pub async fn list_target_groups(&self, load_balancer_id: &str) -> Result<Vec<TargetGroup>> {
        request::get(
            self.concerto,
            &format!("{}/target_groups", load_balancer_path(load_balancer_id)),
        )
        .await
    }

    pub async fn create_target_group(&self, load_balancer_id: &str, payload: &Value) -> Result<TargetGroup> {
        request::post(
            self.concerto,
            &format!("{}/target_groups", load_balancer_path(load_balancer_id)),
            payload,
        )
        .await
    }

    pub async fn get_target_group(&self, target_group_id: &str) -> Result<TargetGroup> {
        request::get(self.concerto, &target_group_path(target_group_id)).await
    }

    pub async fn update_target_group(&self, target_group_id: &str, payload: &Value) -> Result<TargetGroup> {
        request::put(self.concerto, &target_group_path(target_group_id), payload).await
    }

    pub async fn delete_target_group(&self, target_group_id: &str) -> Result<Option<TargetGroup>> {
        request::delete_json(self.concerto, &target_group_path(target_group_id)).await
    }

    pub async fn retry_target_group(&self, target_group_id: &str, payload: &Value) -> Result<TargetGroup> {
        tracing::info!("retry target group {}", target_group_id);
        request::put(
            self.concerto,
            &format!("{}/retry", target_group_path(target_group_id)),
            payload,
        )
        .await
    }
}

fn load_balancer_path(load_balancer_id: &str) -> String {
    format!("/network/load_balancers/{}", encode(load_balancer_id))
}

fn target_group_path(target_group_id: &str) -> String {
    format!("/network/target_groups/{}", encode(target_group_id))
}
