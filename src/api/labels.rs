//! Labels
//!
//! Labels tag resources; list commands can filter on them client-side.

use super::de::nullable;
use super::{request, ConcertoService, Result};
use crate::format::{Column, Columns};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use urlencoding::encode;

/// Label definition
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Label {
    #[serde(deserialize_with = "nullable")]
    pub id: String,
    #[serde(deserialize_with = "nullable")]
    pub name: String,
    #[serde(deserialize_with = "nullable")]
    pub namespace: String,
    #[serde(deserialize_with = "nullable")]
    pub value: String,
    #[serde(deserialize_with = "nullable")]
    pub resource_type: String,
}

impl Columns for Label {
    const COLUMNS: &'static [Column] = &[
        Column::new("ID", "id"),
        Column::new("NAME", "name"),
        Column::new("NAMESPACE", "namespace"),
        Column::new("VALUE", "value"),
    ];
}

/// Resource attached to a label
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabeledResource {
    #[serde(deserialize_with = "nullable")]
    pub id: String,
    #[serde(deserialize_with = "nullable")]
    pub resource_type: String,
}

impl Columns for LabeledResource {
    const COLUMNS: &'static [Column] = &[
        Column::new("ID", "id"),
        Column::new("RESOURCE TYPE", "resource_type"),
    ];
}

/// Resources that can carry labels
pub trait Labelled {
    fn label_ids(&self) -> &[String];
}

/// Resolve label names to ids.
///
/// Returns `None` when any name is unknown: no resource can carry it.
pub fn resolve_label_ids(labels: &[Label], names: &[String]) -> Option<Vec<String>> {
    names
        .iter()
        .map(|name| {
            labels
                .iter()
                .find(|l| l.namespace.is_empty() && &l.name == name)
                .map(|l| l.id.clone())
        })
        .collect()
}

/// Keep the items carrying every label in `label_ids`
pub fn filter_by_labels<T: Labelled>(items: Vec<T>, label_ids: &[String]) -> Vec<T> {
    items
        .into_iter()
        .filter(|item| label_ids.iter().all(|id| item.label_ids().contains(id)))
        .collect()
}

pub struct LabelService<'a> {
    concerto: &'a dyn ConcertoService,
}

impl<'a> LabelService<'a> {
    pub fn new(concerto: &'a dyn ConcertoService) -> Self {
        Self { concerto }
    }

    /// List all labels
    pub async fn list_labels(&self) -> Result<Vec<Label>> {
        request::get(self.concerto, "/labels").await
    }

    /// Create a label
    pub async fn create_label(&self, payload: &Value) -> Result<Label> {
        request::post(self.concerto, "/labels", payload).await
    }

    /// Tag resources with a label, returning every resource now tagged
    pub async fn add_label(&self, label_id: &str, payload: &Value) -> Result<Vec<LabeledResource>> {
        request::post(
            self.concerto,
            &format!("/labels/{}/resources", encode(label_id)),
            payload,
        )
        .await
    }

    /// Remove a label from one resource
    pub async fn remove_label(
        &self,
        label_id: &str,
        resource_type: &str,
        resource_id: &str,
    ) -> Result<()> {
        request::delete(
            self.concerto,
            &format!(
                "/labels/{}/resources/{}/{}",
                encode(label_id),
                encode(resource_type),
                encode(resource_id)
            ),
        )
        .await
    }
}
