//! Storage volumes and storage plans

use super::de::nullable;
use super::labels::Labelled;
use super::{request, ConcertoService, Result};
use crate::format::{Column, Columns};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use urlencoding::encode;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Volume {
    #[serde(deserialize_with = "nullable")]
    pub id: String,
    #[serde(deserialize_with = "nullable")]
    pub name: String,
    #[serde(deserialize_with = "nullable")]
    pub size: i64,
    #[serde(deserialize_with = "nullable")]
    pub state: String,
    #[serde(deserialize_with = "nullable")]
    pub device: String,
    #[serde(deserialize_with = "nullable")]
    pub storage_plan_id: String,
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

impl Columns for Volume {
    const COLUMNS: &'static [Column] = &[
        Column::new("ID", "id"),
        Column::new("NAME", "name"),
        Column::new("SIZE", "size"),
        Column::new("STATE", "state"),
        Column::new("DEVICE", "device"),
        Column::new("STORAGE PLAN ID", "storage_plan_id"),
        Column::new("CLOUD ACCOUNT ID", "cloud_account_id"),
        Column::new("REALM ID", "realm_id"),
        Column::new("ATTACHED SERVER ID", "attached_server_id"),
        Column::new("LABELS", "label_ids"),
    ];
}

impl Labelled for Volume {
    fn label_ids(&self) -> &[String] {
        &self.label_ids
    }
}

/// Storage plan offered by a cloud provider
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoragePlan {
    #[serde(deserialize_with = "nullable")]
    pub id: String,
    #[serde(deserialize_with = "nullable")]
    pub name: String,
    #[serde(deserialize_with = "nullable")]
    pub min_size: i64,
    #[serde(deserialize_with = "nullable")]
    pub max_size: i64,
    #[serde(deserialize_with = "nullable")]
    pub cloud_provider_id: String,
    #[serde(deserialize_with = "nullable")]
    pub location_id: String,
    #[serde(deserialize_with = "nullable")]
    pub realm_id: String,
    #[serde(deserialize_with = "nullable")]
    pub flavour_provider_name: String,
}

impl Columns for StoragePlan {
    const COLUMNS: &'static [Column] = &[
        Column::new("ID", "id"),
        Column::new("NAME", "name"),
        Column::new("MIN SIZE", "min_size"),
        Column::new("MAX SIZE", "max_size"),
        Column::new("CLOUD PROVIDER ID", "cloud_provider_id"),
        Column::new("REALM ID", "realm_id"),
        Column::new("FLAVOUR", "flavour_provider_name"),
    ];
}

pub struct VolumeService<'a> {
    concerto: &'a dyn ConcertoService,
}

impl<'a> VolumeService<'a> {
    pub fn new(concerto: &'a dyn ConcertoService) -> Self {
        Self { concerto }
    }

    pub async fn list_volumes(&self) -> Result<Vec<Volume>> {
        request::get(self.concerto, "/storage/volumes").await
    }

    pub async fn get_volume(&self, volume_id: &str) -> Result<Volume> {
        request::get(self.concerto, &volume_path(volume_id)).await
    }

    pub async fn create_volume(&self, payload: &Value) -> Result<Volume> {
        request::post(self.concerto, "/storage/volumes", payload).await
    }

    pub async fn update_volume(&self, volume_id: &str, payload: &Value) -> Result<Volume> {
        request::put(self.concerto, &volume_path(volume_id), payload).await
    }

    /// Attach to the server named in the payload
    pub async fn attach_volume(&self, volume_id: &str, payload: &Value) -> Result<Volume> {
        request::post(
            self.concerto,
            &format!("{}/attached_server", volume_path(volume_id)),
            payload,
        )
        .await
    }

    pub async fn detach_volume(&self, volume_id: &str) -> Result<()> {
        request::delete(
            self.concerto,
            &format!("{}/attached_server", volume_path(volume_id)),
        )
        .await
    }

    pub async fn delete_volume(&self, volume_id: &str) -> Result<()> {
        request::delete(self.concerto, &volume_path(volume_id)).await
    }

    /// Forget the volume without destroying it at the cloud provider
    pub async fn discard_volume(&self, volume_id: &str) -> Result<()> {
        request::delete(self.concerto, &format!("{}/discard", volume_path(volume_id))).await
    }

    pub async fn get_storage_plan(&self, plan_id: &str) -> Result<StoragePlan> {
        request::get(self.concerto, &format!("/storage/plans/{}", encode(plan_id))).await
    }
}

fn volume_path(volume_id: &str) -> String {
    format!("/storage/volumes/{}", encode(volume_id))
}
