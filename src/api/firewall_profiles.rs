//! Firewall profiles (server-side rule sets assigned to servers)

use super::de::nullable;
use super::labels::Labelled;
use super::{request, ConcertoService, Result};
use crate::firewall::FirewallRule;
use crate::format::{Column, Columns};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use urlencoding::encode;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FirewallProfile {
    #[serde(deserialize_with = "nullable")]
    pub id: String,
    #[serde(deserialize_with = "nullable")]
    pub name: String,
    #[serde(deserialize_with = "nullable")]
    pub description: String,
    #[serde(deserialize_with = "nullable")]
    pub default: bool,
    #[serde(deserialize_with = "nullable")]
    pub rules: Vec<FirewallRule>,
    #[serde(deserialize_with = "nullable")]
    pub label_ids: Vec<String>,
    #[serde(deserialize_with = "nullable")]
    pub resource_type: String,
}

impl Columns for FirewallProfile {
    const COLUMNS: &'static [Column] = &[
        Column::new("ID", "id"),
        Column::new("NAME", "name"),
        Column::new("DESCRIPTION", "description"),
        Column::new("DEFAULT", "default"),
        Column::new("RULES", "rules"),
        Column::new("LABELS", "label_ids"),
    ];
}

impl Labelled for FirewallProfile {
    fn label_ids(&self) -> &[String] {
        &self.label_ids
    }
}

pub struct FirewallProfileService<'a> {
    concerto: &'a dyn ConcertoService,
}

impl<'a> FirewallProfileService<'a> {
    pub fn new(concerto: &'a dyn ConcertoService) -> Self {
        Self { concerto }
    }

    pub async fn list_firewall_profiles(&self) -> Result<Vec<FirewallProfile>> {
        request::get(self.concerto, "/network/firewall_profiles").await
    }

    pub async fn get_firewall_profile(&self, profile_id: &str) -> Result<FirewallProfile> {
        request::get(self.concerto, &firewall_profile_path(profile_id)).await
    }

    pub async fn create_firewall_profile(&self, payload: &Value) -> Result<FirewallProfile> {
        request::post(self.concerto, "/network/firewall_profiles", payload).await
    }

    pub async fn update_firewall_profile(&self, profile_id: &str, payload: &Value) -> Result<FirewallProfile> {
        request::put(self.concerto, &firewall_profile_path(profile_id), payload).await
    }

    pub async fn delete_firewall_profile(&self, profile_id: &str) -> Result<()> {
        request::delete(self.concerto, &firewall_profile_path(profile_id)).await
    }
}

fn firewall_profile_path(profile_id: &str) -> String {
    format!("/network/firewall_profiles/{}", encode(profile_id))
}
