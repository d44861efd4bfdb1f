//! Server plans (instance sizes offered by a cloud provider)

use super::de::nullable;
use super::{request, ConcertoService, Result};
use crate::format::{Column, Columns};
use serde::{Deserialize, Serialize};
use urlencoding::encode;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerPlan {
    #[serde(deserialize_with = "nullable")]
    pub id: String,
    #[serde(deserialize_with = "nullable")]
    pub name: String,
    #[serde(deserialize_with = "nullable")]
    pub memory: i64,
    #[serde(deserialize_with = "nullable")]
    pub cpus: f64,
    #[serde(deserialize_with = "nullable")]
    pub storage: i64,
    #[serde(deserialize_with = "nullable")]
    pub location_id: String,
    #[serde(deserialize_with = "nullable")]
    pub cloud_provider_id: String,
    #[serde(deserialize_with = "nullable")]
    pub realm_id: String,
    #[serde(deserialize_with = "nullable")]
    pub flavour_provider_name: String,
}

impl Columns for ServerPlan {
    const COLUMNS: &'static [Column] = &[
        Column::new("ID", "id"),
        Column::new("NAME", "name"),
        Column::new("MEMORY", "memory"),
        Column::new("CPUS", "cpus"),
        Column::new("STORAGE", "storage"),
        Column::new("LOCATION ID", "location_id"),
        Column::new("CLOUD PROVIDER ID", "cloud_provider_id"),
        Column::new("REALM ID", "realm_id"),
    ];
}

pub struct ServerPlanService<'a> {
    concerto: &'a dyn ConcertoService,
}

impl<'a> ServerPlanService<'a> {
    pub fn new(concerto: &'a dyn ConcertoService) -> Self {
        Self { concerto }
    }

    /// List the server plans of a cloud provider
    pub async fn list_server_plans(&self, cloud_provider_id: &str) -> Result<Vec<ServerPlan>> {
        request::get(
            self.concerto,
            &format!(
                "/cloud/cloud_providers/{}/server_plans",
                encode(cloud_provider_id)
            ),
        )
        .await
    }

    pub async fn get_server_plan(&self, plan_id: &str) -> Result<ServerPlan> {
        request::get(self.concerto, &format!("/cloud/server_plans/{}", encode(plan_id))).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::mock::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_list_server_plans() {
        let body = json!([
            {"id": "p1", "name": "m5.large", "memory": 8192, "cpus": 2.0, "storage": 0},
            {"id": "p2", "name": "t3.micro", "memory": 1024, "cpus": 0.5}
        ]);
        let mock = MockConcerto::json(200, &body);
        let plans = ServerPlanService::new(&mock)
            .list_server_plans("aws")
            .await
            .unwrap();
        assert_eq!(plans.len(), 2);
        assert_eq!(plans[1].cpus, 0.5);
        assert_eq!(mock.last_call().path, "/cloud/cloud_providers/aws/server_plans");
    }

    #[tokio::test]
    async fn test_get_server_plan() {
        let mock = MockConcerto::json(200, &json!({"id": "p1", "name": "m5.large"}));
        let plan = ServerPlanService::new(&mock).get_server_plan("p1").await.unwrap();
        assert_eq!(plan.name, "m5.large");
        assert_eq!(mock.last_call().path, "/cloud/server_plans/p1");
    }

    #[tokio::test]
    async fn test_errors() {
        let mock = MockConcerto::failing("no route to host");
        assert_transport_error(
            ServerPlanService::new(&mock).get_server_plan("p1").await,
            "no route to host",
        );

        let mock = MockConcerto::raw(404, b"");
        assert_status_error(ServerPlanService::new(&mock).list_server_plans("x").await, 404);

        let mock = MockConcerto::raw(200, MALFORMED_JSON);
        assert_decode_error(ServerPlanService::new(&mock).list_server_plans("x").await);
    }
}
