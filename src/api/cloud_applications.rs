//! Cloud application templates (CATs) and deployments
//!
//! Deploying or deleting a deployment is asynchronous on the server side:
//! both return a deployment task whose state can be polled.

use super::de::nullable;
use super::labels::Labelled;
use super::{request, ConcertoService, Result};
use crate::format::{Column, Columns};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use urlencoding::encode;

/// Input declared by a template
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplateInput {
    #[serde(deserialize_with = "nullable")]
    pub name: String,
    #[serde(rename = "type")]
    #[serde(deserialize_with = "nullable")]
    pub kind: String,
    #[serde(deserialize_with = "nullable")]
    pub description: String,
    #[serde(deserialize_with = "nullable")]
    pub required: bool,
    #[serde(deserialize_with = "nullable")]
    pub default: Value,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CloudApplicationTemplate {
    #[serde(deserialize_with = "nullable")]
    pub id: String,
    #[serde(deserialize_with = "nullable")]
    pub name: String,
    #[serde(deserialize_with = "nullable")]
    pub version: String,
    #[serde(deserialize_with = "nullable")]
    pub is_mock: bool,
    #[serde(deserialize_with = "nullable")]
    pub inputs: Vec<TemplateInput>,
    #[serde(deserialize_with = "nullable")]
    pub label_ids: Vec<String>,
    #[serde(deserialize_with = "nullable")]
    pub resource_type: String,
}

impl Columns for CloudApplicationTemplate {
    const COLUMNS: &'static [Column] = &[
        Column::new("ID", "id"),
        Column::new("NAME", "name"),
        Column::new("VERSION", "version"),
        Column::new("MOCK", "is_mock"),
        Column::new("INPUTS", "inputs"),
        Column::new("LABELS", "label_ids"),
    ];
}

impl Labelled for CloudApplicationTemplate {
    fn label_ids(&self) -> &[String] {
        &self.label_ids
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CloudApplicationDeployment {
    #[serde(deserialize_with = "nullable")]
    pub id: String,
    #[serde(deserialize_with = "nullable")]
    pub name: String,
    #[serde(deserialize_with = "nullable")]
    pub namespace: String,
    #[serde(deserialize_with = "nullable")]
    pub value: String,
    #[serde(deserialize_with = "nullable")]
    pub template_id: String,
    #[serde(deserialize_with = "nullable")]
    pub cloud_account_id: String,
    #[serde(deserialize_with = "nullable")]
    pub label_ids: Vec<String>,
    #[serde(deserialize_with = "nullable")]
    pub resource_type: String,
}

impl Columns for CloudApplicationDeployment {
    const COLUMNS: &'static [Column] = &[
        Column::new("ID", "id"),
        Column::new("NAME", "name"),
        Column::new("NAMESPACE", "namespace"),
        Column::new("VALUE", "value"),
        Column::new("TEMPLATE ID", "template_id"),
        Column::new("CLOUD ACCOUNT ID", "cloud_account_id"),
        Column::new("LABELS", "label_ids"),
    ];
}

impl Labelled for CloudApplicationDeployment {
    fn label_ids(&self) -> &[String] {
        &self.label_ids
    }
}

/// Server-side deploy or delete job
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CloudApplicationDeploymentTask {
    #[serde(deserialize_with = "nullable")]
    pub id: String,
    #[serde(deserialize_with = "nullable")]
    pub name: String,
    #[serde(deserialize_with = "nullable")]
    pub state: String,
    #[serde(deserialize_with = "nullable")]
    pub template_id: String,
    #[serde(deserialize_with = "nullable")]
    pub deployment_id: String,
    #[serde(deserialize_with = "nullable")]
    pub inputs: Value,
    #[serde(deserialize_with = "nullable")]
    pub user_id: String,
    #[serde(deserialize_with = "nullable")]
    pub error_message: String,
}

impl CloudApplicationDeploymentTask {
    /// True once the task left the queued/running states
    pub fn is_finished(&self) -> bool {
        !matches!(self.state.as_str(), "" | "pending" | "running" | "in_progress")
    }

    pub fn is_failed(&self) -> bool {
        self.state == "failed" || self.state == "error"
    }
}

impl Columns for CloudApplicationDeploymentTask {
    const COLUMNS: &'static [Column] = &[
        Column::new("ID", "id"),
        Column::new("NAME", "name"),
        Column::new("STATE", "state"),
        Column::new("TEMPLATE ID", "template_id"),
        Column::new("DEPLOYMENT ID", "deployment_id"),
        Column::new("USER ID", "user_id"),
        Column::new("ERROR", "error_message"),
    ];
}

pub struct CloudApplicationTemplateService<'a> {
    concerto: &'a dyn ConcertoService,
}

impl<'a> CloudApplicationTemplateService<'a> {
    pub fn new(concerto: &'a dyn ConcertoService) -> Self {
        Self { concerto }
    }

    pub async fn list_templates(&self) -> Result<Vec<CloudApplicationTemplate>> {
        request::get(self.concerto, "/plugins/tosca/cats").await
    }

    pub async fn get_template(&self, template_id: &str) -> Result<CloudApplicationTemplate> {
        request::get(self.concerto, &template_path(template_id)).await
    }

    pub async fn create_template(&self, payload: &Value) -> Result<CloudApplicationTemplate> {
        request::post(self.concerto, "/plugins/tosca/cats", payload).await
    }

    /// Ask the server to (re)read the template's declared inputs
    pub async fn parse_metadata(&self, template_id: &str) -> Result<CloudApplicationTemplate> {
        request::put(
            self.concerto,
            &format!("{}/parse_metadata", template_path(template_id)),
            &Value::Object(Default::default()),
        )
        .await
    }

    pub async fn delete_template(&self, template_id: &str) -> Result<()> {
        request::delete(self.concerto, &template_path(template_id)).await
    }
}

pub struct CloudApplicationDeploymentService<'a> {
    concerto: &'a dyn ConcertoService,
}

impl<'a> CloudApplicationDeploymentService<'a> {
    pub fn new(concerto: &'a dyn ConcertoService) -> Self {
        Self { concerto }
    }

    pub async fn list_deployments(&self) -> Result<Vec<CloudApplicationDeployment>> {
        request::get(self.concerto, "/plugins/tosca/deployments").await
    }

    pub async fn get_deployment(&self, deployment_id: &str) -> Result<CloudApplicationDeployment> {
        request::get(self.concerto, &deployment_path(deployment_id)).await
    }

    /// Start deploying a template; returns the deploy task
    pub async fn deploy(&self, payload: &Value) -> Result<CloudApplicationDeploymentTask> {
        tracing::info!("creating deployment task");
        request::post(self.concerto, "/plugins/tosca/deployment_tasks", payload).await
    }

    pub async fn get_deployment_task(&self, task_id: &str) -> Result<CloudApplicationDeploymentTask> {
        request::get(
            self.concerto,
            &format!("/plugins/tosca/deployment_tasks/{}", encode(task_id)),
        )
        .await
    }

    /// Start deleting a deployment; returns the deletion task
    pub async fn delete_deployment(
        &self,
        deployment_id: &str,
    ) -> Result<Option<CloudApplicationDeploymentTask>> {
        tracing::info!("deleting deployment {}", deployment_id);
        request::delete_json(self.concerto, &deployment_path(deployment_id)).await
    }
}

fn template_path(template_id: &str) -> String {
    format!("/plugins/tosca/cats/{}", encode(template_id))
}

fn deployment_path(deployment_id: &str) -> String {
    format!("/plugins/tosca/deployments/{}", encode(deployment_id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::mock::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_template_inputs_are_decoded() {
        let body = json!([{
            "id": "cat1",
            "name": "wordpress",
            "version": "1.0",
            "inputs": [
                {"name": "admin_user", "type": "string", "required": true},
                {"name": "replicas", "type": "integer", "default": 2}
            ]
        }]);
        let mock = MockConcerto::json(200, &body);
        let templates = CloudApplicationTemplateService::new(&mock)
            .list_templates()
            .await
            .unwrap();
        assert_eq!(templates[0].inputs.len(), 2);
        assert_eq!(templates[0].inputs[0].kind, "string");
        assert!(templates[0].inputs[0].required);
        assert_eq!(templates[0].inputs[1].default, json!(2));
        assert_eq!(mock.last_call().path, "/plugins/tosca/cats");
    }

    #[tokio::test]
    async fn test_template_operations() {
        let mock = MockConcerto::json(200, &json!({"id": "cat1"}));
        let service = CloudApplicationTemplateService::new(&mock);
        service.get_template("cat1").await.unwrap();
        service.create_template(&json!({"name": "wordpress"})).await.unwrap();
        service.parse_metadata("cat1").await.unwrap();
        service.delete_template("cat1").await.unwrap();

        let calls: Vec<(&str, String)> = mock.calls().into_iter().map(|c| (c.method, c.path)).collect();
        assert_eq!(
            calls,
            vec![
                ("GET", "/plugins/tosca/cats/cat1".to_string()),
                ("POST", "/plugins/tosca/cats".to_string()),
                ("PUT", "/plugins/tosca/cats/cat1/parse_metadata".to_string()),
                ("DELETE", "/plugins/tosca/cats/cat1".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn test_deploy_returns_task() {
        let task = json!({"id": "t1", "state": "pending", "template_id": "cat1", "inputs": {"replicas": 2}});
        let mock = MockConcerto::json(201, &task);
        let payload = json!({"deployment_task": {"cat_id": "cat1", "name": "blog"}});
        let result = CloudApplicationDeploymentService::new(&mock)
            .deploy(&payload)
            .await
            .unwrap();
        assert_eq!(result.id, "t1");
        assert!(!result.is_finished());
        assert_eq!(mock.last_call().path, "/plugins/tosca/deployment_tasks");
        assert_eq!(mock.last_call().payload, Some(payload));
    }

    #[tokio::test]
    async fn test_deployment_operations() {
        let mock = MockConcerto::json(200, &json!({"id": "d1", "state": "finished"}));
        let service = CloudApplicationDeploymentService::new(&mock);
        service.get_deployment("d1").await.unwrap();
        service.get_deployment_task("t1").await.unwrap();
        let task = service.delete_deployment("d1").await.unwrap().unwrap();
        assert!(task.is_finished());

        let calls: Vec<(&str, String)> = mock.calls().into_iter().map(|c| (c.method, c.path)).collect();
        assert_eq!(
            calls,
            vec![
                ("GET", "/plugins/tosca/deployments/d1".to_string()),
                ("GET", "/plugins/tosca/deployment_tasks/t1".to_string()),
                ("DELETE", "/plugins/tosca/deployments/d1".to_string()),
            ]
        );
    }

    #[test]
    fn test_task_states() {
        let task = |state: &str| CloudApplicationDeploymentTask {
            state: state.to_string(),
            ..Default::default()
        };
        assert!(!task("running").is_finished());
        assert!(!task("").is_finished());
        assert!(task("finished").is_finished());
        assert!(task("failed").is_finished());
        assert!(task("failed").is_failed());
        assert!(!task("finished").is_failed());
    }

    #[tokio::test]
    async fn test_errors() {
        let mock = MockConcerto::failing("connection refused");
        assert_transport_error(
            CloudApplicationDeploymentService::new(&mock).list_deployments().await,
            "connection refused",
        );

        let mock = MockConcerto::raw(422, b"{\"errors\":{\"inputs\":[\"missing admin_user\"]}}");
        assert_status_error(
            CloudApplicationDeploymentService::new(&mock)
                .deploy(&json!({}))
                .await,
            422,
        );

        let mock = MockConcerto::raw(200, MALFORMED_JSON);
        assert_decode_error(CloudApplicationTemplateService::new(&mock).list_templates().await);
    }

    #[tokio::test]
    async fn test_delete_deployment_without_body() {
        for body in [&b""[..], &b"  \n"[..]] {
            let mock = MockConcerto::raw(204, body);
            assert_eq!(CloudApplicationDeploymentService::new(&mock).delete_deployment("d1").await.unwrap(), None);
            assert_eq!(mock.last_call().path, "/plugins/tosca/deployments/d1");
        }
    }

    #[tokio::test]
    async fn test_pending_task_with_null_fields() {
        let mock = MockConcerto::raw(
            200,
            br#"{"id":"t1","state":"pending","error_message":null,"inputs":null,"deployment_id":null}"#,
        );
        let task = CloudApplicationDeploymentService::new(&mock)
            .get_deployment_task("t1")
            .await
            .unwrap();
        assert!(!task.is_finished());
        assert!(task.error_message.is_empty());
        assert!(task.inputs.is_null());
    }
}
