//! Realms (provider regions/locations)

use super::de::nullable;
use super::node_pools::NodePoolPlan;
use super::{request, ConcertoService, Result};
use crate::format::{Column, Columns};
use serde::{Deserialize, Serialize};
use urlencoding::encode;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Realm {
    #[serde(deserialize_with = "nullable")]
    pub id: String,
    #[serde(deserialize_with = "nullable")]
    pub name: String,
    #[serde(deserialize_with = "nullable")]
    pub location_id: String,
    #[serde(deserialize_with = "nullable")]
    pub cloud_provider_id: String,
    #[serde(deserialize_with = "nullable")]
    pub provider_name: String,
    #[serde(deserialize_with = "nullable")]
    pub deprecated: bool,
}

impl Columns for Realm {
    const COLUMNS: &'static [Column] = &[
        Column::new("ID", "id"),
        Column::new("NAME", "name"),
        Column::new("LOCATION ID", "location_id"),
        Column::new("CLOUD PROVIDER ID", "cloud_provider_id"),
        Column::new("PROVIDER NAME", "provider_name"),
        Column::new("DEPRECATED", "deprecated"),
    ];
}

pub struct RealmService<'a> {
    concerto: &'a dyn ConcertoService,
}

impl<'a> RealmService<'a> {
    pub fn new(concerto: &'a dyn ConcertoService) -> Self {
        Self { concerto }
    }

    /// List the realms of a cloud provider
    pub async fn list_realms(&self, cloud_provider_id: &str) -> Result<Vec<Realm>> {
        request::get(
            self.concerto,
            &format!("/cloud/cloud_providers/{}/realms", encode(cloud_provider_id)),
        )
        .await
    }

    pub async fn get_realm(&self, realm_id: &str) -> Result<Realm> {
        request::get(self.concerto, &realm_path(realm_id)).await
    }

    /// List node pool plans available in a realm
    pub async fn list_node_pool_plans(&self, realm_id: &str) -> Result<Vec<NodePoolPlan>> {
        request::get(self.concerto, &format!("{}/node_pool_plans", realm_path(realm_id))).await
    }
}

fn realm_path(realm_id: &str) -> String {
    format!("/cloud/realms/{}", encode(realm_id))
}
