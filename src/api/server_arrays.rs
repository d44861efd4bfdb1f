//! Server arrays
//!
//! Groups of identical servers managed as one unit.

use super::de::nullable;
use super::labels::Labelled;
use super::servers::Server;
use super::{request, ConcertoService, Result};
use crate::format::{Column, Columns};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use urlencoding::encode;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerArray {
    #[serde(deserialize_with = "nullable")]
    pub id: String,
    #[serde(deserialize_with = "nullable")]
    pub name: String,
    #[serde(deserialize_with = "nullable")]
    pub state: String,
    #[serde(deserialize_with = "nullable")]
    pub size: i64,
    #[serde(deserialize_with = "nullable")]
    pub template_id: String,
    #[serde(deserialize_with = "nullable")]
    pub server_plan_id: String,
    #[serde(deserialize_with = "nullable")]
    pub cloud_account_id: String,
    #[serde(deserialize_with = "nullable")]
    pub ssh_profile_id: String,
    #[serde(deserialize_with = "nullable")]
    pub firewall_profile_id: String,
    #[serde(deserialize_with = "nullable")]
    pub label_ids: Vec<String>,
    #[serde(deserialize_with = "nullable")]
    pub resource_type: String,
}

impl Columns for ServerArray {
    const COLUMNS: &'static [Column] = &[
        Column::new("ID", "id"),
        Column::new("NAME", "name"),
        Column::new("STATE", "state"),
        Column::new("SIZE", "size"),
        Column::new("TEMPLATE ID", "template_id"),
        Column::new("SERVER PLAN ID", "server_plan_id"),
        Column::new("CLOUD ACCOUNT ID", "cloud_account_id"),
        Column::new("SSH PROFILE ID", "ssh_profile_id"),
        Column::new("FIREWALL PROFILE ID", "firewall_profile_id"),
        Column::new("LABELS", "label_ids"),
    ];
}

impl Labelled for ServerArray {
    fn label_ids(&self) -> &[String] {
        &self.label_ids
    }
}

pub struct ServerArrayService<'a> {
    concerto: &'a dyn ConcertoService,
}

impl<'a> ServerArrayService<'a> {
    pub fn new(concerto: &'a dyn ConcertoService) -> Self {
        Self { concerto }
    }

    pub async fn list_server_arrays(&self) -> Result<Vec<ServerArray>> {
        request::get(self.concerto, "/cloud/server_arrays").await
    }

    pub async fn get_server_array(&self, server_array_id: &str) -> Result<ServerArray> {
        request::get(self.concerto, &server_array_path(server_array_id)).await
    }

    pub async fn create_server_array(&self, payload: &Value) -> Result<ServerArray> {
        request::post(self.concerto, "/cloud/server_arrays", payload).await
    }

    pub async fn update_server_array(&self, server_array_id: &str, payload: &Value) -> Result<ServerArray> {
        request::put(self.concerto, &server_array_path(server_array_id), payload).await
    }

    /// Boot every server in the array
    pub async fn boot_server_array(&self, server_array_id: &str, payload: &Value) -> Result<ServerArray> {
        self.action(server_array_id, "boot", payload).await
    }

    /// Shut down every server in the array
    pub async fn shutdown_server_array(&self, server_array_id: &str, payload: &Value) -> Result<ServerArray> {
        self.action(server_array_id, "shutdown", payload).await
    }

    /// Remove every server from the array
    pub async fn empty_server_array(&self, server_array_id: &str, payload: &Value) -> Result<ServerArray> {
        self.action(server_array_id, "empty", payload).await
    }

    /// Add servers to the array
    pub async fn enlarge_server_array(&self, server_array_id: &str, payload: &Value) -> Result<ServerArray> {
        tracing::info!("enlarge server array {}", server_array_id);
        request::post(
            self.concerto,
            &format!("{}/servers", server_array_path(server_array_id)),
            payload,
        )
        .await
    }

    pub async fn list_server_array_servers(&self, server_array_id: &str) -> Result<Vec<Server>> {
        request::get(
            self.concerto,
            &format!("{}/servers", server_array_path(server_array_id)),
        )
        .await
    }

    pub async fn delete_server_array(&self, server_array_id: &str) -> Result<()> {
        request::delete(self.concerto, &server_array_path(server_array_id)).await
    }

    async fn action(&self, server_array_id: &str, action: &str, payload: &Value) -> Result<ServerArray> {
        tracing::info!("{} server array {}", action, server_array_id);
        request::put(
            self.concerto,
            &format!("{}/{}", server_array_path(server_array_id), action),
            payload,
        )
        .await
    }
}

fn server_array_path(server_array_id: &str) -> String {
    format!("/cloud/server_arrays/{}", encode(server_array_id))
}
