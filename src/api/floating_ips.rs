//! Floating IPs

use super::de::nullable;
use super::labels::Labelled;
use super::{request, ConcertoService, Result};
use crate::format::{Column, Columns};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use urlencoding::encode;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FloatingIp {
    #[serde(deserialize_with = "nullable")]
    pub id: String,
    #[serde(deserialize_with = "nullable")]
    pub name: String,
    #[serde(deserialize_with = "nullable")]
    pub address: String,
    #[serde(deserialize_with = "nullable")]
    pub state: String,
    #[serde(deserialize_with = "nullable")]
    pub cloud_account_id: String,
    #[serde(deserialize_with = "nullable")]
    pub realm_id: String,
    #[serde(deserialize_with = "nullable")]
    pub realm_provider_name: String,
    #[serde(deserialize_with = "nullable")]
    pub attached_server_id: String,
    #[serde(deserialize_with = "nullable")]
    pub label_ids: Vec<String>,
    #[serde(deserialize_with = "nullable")]
    pub resource_type: String,
}

impl Columns for FloatingIp {
    const COLUMNS: &'static [Column] = &[
        Column::new("ID", "id"),
        Column::new("NAME", "name"),
        Column::new("ADDRESS", "address"),
        Column::new("STATE", "state"),
        Column::new("CLOUD ACCOUNT ID", "cloud_account_id"),
        Column::new("REALM ID", "realm_id"),
        Column::new("ATTACHED SERVER ID", "attached_server_id"),
        Column::new("LABELS", "label_ids"),
    ];
}

impl Labelled for FloatingIp {
    fn label_ids(&self) -> &[String] {
        &self.label_ids
    }
}

pub struct FloatingIpService<'a> {
    concerto: &'a dyn ConcertoService,
}

impl<'a> FloatingIpService<'a> {
    pub fn new(concerto: &'a dyn ConcertoService) -> Self {
        Self { concerto }
    }

    pub async fn list_floating_ips(&self) -> Result<Vec<FloatingIp>> {
        request::get(self.concerto, "/network/floating_ips").await
    }

    pub async fn get_floating_ip(&self, floating_ip_id: &str) -> Result<FloatingIp> {
        request::get(self.concerto, &floating_ip_path(floating_ip_id)).await
    }

    pub async fn create_floating_ip(&self, payload: &Value) -> Result<FloatingIp> {
        request::post(self.concerto, "/network/floating_ips", payload).await
    }

    pub async fn update_floating_ip(&self, floating_ip_id: &str, payload: &Value) -> Result<FloatingIp> {
        request::put(self.concerto, &floating_ip_path(floating_ip_id), payload).await
    }

    /// Attach to the server named in the payload
    pub async fn attach_floating_ip(&self, floating_ip_id: &str, payload: &Value) -> Result<FloatingIp> {
        request::post(
            self.concerto,
            &format!("{}/attached_server", floating_ip_path(floating_ip_id)),
            payload,
        )
        .await
    }

    pub async fn detach_floating_ip(&self, floating_ip_id: &str) -> Result<()> {
        request::delete(
            self.concerto,
            &format!("{}/attached_server", floating_ip_path(floating_ip_id)),
        )
        .await
    }

    pub async fn delete_floating_ip(&self, floating_ip_id: &str) -> Result<()> {
        request::delete(self.concerto, &floating_ip_path(floating_ip_id)).await
    }

    /// Forget the floating IP without releasing it at the cloud provider
    pub async fn discard_floating_ip(&self, floating_ip_id: &str) -> Result<()> {
        request::delete(
            self.concerto,
            &format!("{}/discard", floating_ip_path(floating_ip_id)),
        )
        .await
    }
}

fn floating_ip_path(floating_ip_id: &str) -> String {
    format!("/network/floating_ips/{}", encode(floating_ip_id))
}
