//! Policy definitions and assignments

use super::de::nullable;
use super::labels::Labelled;
use super::{request, ConcertoService, Result};
use crate::format::{Column, Columns};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use urlencoding::encode;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PolicyDefinition {
    #[serde(deserialize_with = "nullable")]
    pub id: String,
    #[serde(deserialize_with = "nullable")]
    pub name: String,
    #[serde(deserialize_with = "nullable")]
    pub description: String,
    #[serde(deserialize_with = "nullable")]
    pub definition: Value,
    #[serde(deserialize_with = "nullable")]
    pub attachable_resource_types: Vec<String>,
    #[serde(deserialize_with = "nullable")]
    pub builtin: bool,
    #[serde(deserialize_with = "nullable")]
    pub label_ids: Vec<String>,
    #[serde(deserialize_with = "nullable")]
    pub resource_type: String,
}

impl Columns for PolicyDefinition {
    const COLUMNS: &'static [Column] = &[
        Column::new("ID", "id"),
        Column::new("NAME", "name"),
        Column::new("DESCRIPTION", "description"),
        Column::new("ATTACHABLE RESOURCE TYPES", "attachable_resource_types"),
        Column::new("BUILTIN", "builtin"),
        Column::new("LABELS", "label_ids"),
    ];
}

impl Labelled for PolicyDefinition {
    fn label_ids(&self) -> &[String] {
        &self.label_ids
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PolicyAssignment {
    #[serde(deserialize_with = "nullable")]
    pub id: String,
    #[serde(deserialize_with = "nullable")]
    pub name: String,
    #[serde(deserialize_with = "nullable")]
    pub description: String,
    #[serde(deserialize_with = "nullable")]
    pub definition_id: String,
    #[serde(deserialize_with = "nullable")]
    pub cloud_account_id: String,
    #[serde(deserialize_with = "nullable")]
    pub parameters: Value,
    #[serde(deserialize_with = "nullable")]
    pub state: String,
    #[serde(deserialize_with = "nullable")]
    pub resource_type: String,
}

impl Columns for PolicyAssignment {
    const COLUMNS: &'static [Column] = &[
        Column::new("ID", "id"),
        Column::new("NAME", "name"),
        Column::new("DESCRIPTION", "description"),
        Column::new("DEFINITION ID", "definition_id"),
        Column::new("CLOUD ACCOUNT ID", "cloud_account_id"),
        Column::new("STATE", "state"),
    ];
}

pub struct PolicyDefinitionService<'a> {
    concerto: &'a dyn ConcertoService,
}

impl<'a> PolicyDefinitionService<'a> {
    pub fn new(concerto: &'a dyn ConcertoService) -> Self {
        Self { concerto }
    }

    pub async fn list_definitions(&self) -> Result<Vec<PolicyDefinition>> {
        request::get(self.concerto, "/policy/definitions").await
    }

    pub async fn get_definition(&self, definition_id: &str) -> Result<PolicyDefinition> {
        request::get(self.concerto, &definition_path(definition_id)).await
    }

    pub async fn create_definition(&self, payload: &Value) -> Result<PolicyDefinition> {
        request::post(self.concerto, "/policy/definitions", payload).await
    }

    pub async fn update_definition(&self, definition_id: &str, payload: &Value) -> Result<PolicyDefinition> {
        request::put(self.concerto, &definition_path(definition_id), payload).await
    }

    pub async fn delete_definition(&self, definition_id: &str) -> Result<()> {
        request::delete(self.concerto, &definition_path(definition_id)).await
    }

    /// List assignments made from a definition
    pub async fn list_assignments(&self, definition_id: &str) -> Result<Vec<PolicyAssignment>> {
        request::get(
            self.concerto,
            &format!("{}/assignments", definition_path(definition_id)),
        )
        .await
    }

    /// Assign a definition to a cloud account
    pub async fn create_assignment(&self, definition_id: &str, payload: &Value) -> Result<PolicyAssignment> {
        request::post(
            self.concerto,
            &format!("{}/assignments", definition_path(definition_id)),
            payload,
        )
        .await
    }
}

pub struct PolicyAssignmentService<'a> {
    concerto: &'a dyn ConcertoService,
}

impl<'a> PolicyAssignmentService<'a> {
    pub fn new(concerto: &'a dyn ConcertoService) -> Self {
        Self { concerto }
    }

    pub async fn get_assignment(&self, assignment_id: &str) -> Result<PolicyAssignment> {
        request::get(self.concerto, &assignment_path(assignment_id)).await
    }

    pub async fn update_assignment(&self, assignment_id: &str, payload: &Value) -> Result<PolicyAssignment> {
        request::put(self.concerto, &assignment_path(assignment_id), payload).await
    }

    pub async fn delete_assignment(&self, assignment_id: &str) -> Result<Option<PolicyAssignment>> {
        request::delete_json(self.concerto, &assignment_path(assignment_id)).await
    }
}

fn definition_path(definition_id: &str) -> String {
    format!("/policy/definitions/{}", encode(definition_id))
}

fn assignment_path(assignment_id: &str) -> String {
    format!("/policy/assignments/{}", encode(assignment_id))
}
