//! Cloud servers
//!
//! CRUD plus lifecycle actions (boot, reboot, shutdown, override) and the
//! per-server event, floating IP and volume listings.

use super::de::nullable;
use super::floating_ips::FloatingIp;
use super::labels::Labelled;
use super::volumes::Volume;
use super::{request, ConcertoService, Result};
use crate::format::{Column, Columns};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use urlencoding::encode;

/// Server instance
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Server {
    #[serde(deserialize_with = "nullable")]
    pub id: String,
    #[serde(deserialize_with = "nullable")]
    pub name: String,
    #[serde(deserialize_with = "nullable")]
    pub fqdn: String,
    #[serde(deserialize_with = "nullable")]
    pub state: String,
    #[serde(deserialize_with = "nullable")]
    pub public_ip: String,
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

impl Columns for Server {
    const COLUMNS: &'static [Column] = &[
        Column::new("ID", "id"),
        Column::new("NAME", "name"),
        Column::new("FQDN", "fqdn"),
        Column::new("STATE", "state"),
        Column::new("PUBLIC IP", "public_ip"),
        Column::new("TEMPLATE ID", "template_id"),
        Column::new("SERVER PLAN ID", "server_plan_id"),
        Column::new("CLOUD ACCOUNT ID", "cloud_account_id"),
        Column::new("SSH PROFILE ID", "ssh_profile_id"),
        Column::new("FIREWALL PROFILE ID", "firewall_profile_id"),
        Column::new("LABELS", "label_ids"),
    ];
}

impl Labelled for Server {
    fn label_ids(&self) -> &[String] {
        &self.label_ids
    }
}

/// Server lifecycle event
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Event {
    #[serde(deserialize_with = "nullable")]
    pub id: String,
    #[serde(deserialize_with = "nullable")]
    pub timestamp: String,
    #[serde(deserialize_with = "nullable")]
    pub level: String,
    #[serde(deserialize_with = "nullable")]
    pub header: String,
    #[serde(deserialize_with = "nullable")]
    pub description: String,
}

impl Columns for Event {
    const COLUMNS: &'static [Column] = &[
        Column::new("ID", "id"),
        Column::new("TIMESTAMP", "timestamp"),
        Column::new("LEVEL", "level"),
        Column::new("HEADER", "header"),
        Column::new("DESCRIPTION", "description"),
    ];
}

pub struct ServerService<'a> {
    concerto: &'a dyn ConcertoService,
}

impl<'a> ServerService<'a> {
    pub fn new(concerto: &'a dyn ConcertoService) -> Self {
        Self { concerto }
    }

    /// List all servers
    pub async fn list_servers(&self) -> Result<Vec<Server>> {
        request::get(self.concerto, "/cloud/servers").await
    }

    /// Get a server by id
    pub async fn get_server(&self, server_id: &str) -> Result<Server> {
        request::get(self.concerto, &server_path(server_id)).await
    }

    /// Create a server
    pub async fn create_server(&self, payload: &Value) -> Result<Server> {
        request::post(self.concerto, "/cloud/servers", payload).await
    }

    /// Update a server
    pub async fn update_server(&self, server_id: &str, payload: &Value) -> Result<Server> {
        request::put(self.concerto, &server_path(server_id), payload).await
    }

    /// Boot a server
    pub async fn boot_server(&self, server_id: &str, payload: &Value) -> Result<Server> {
        self.action(server_id, "boot", payload).await
    }

    /// Reboot a server
    pub async fn reboot_server(&self, server_id: &str, payload: &Value) -> Result<Server> {
        self.action(server_id, "reboot", payload).await
    }

    /// Shut a server down
    pub async fn shutdown_server(&self, server_id: &str, payload: &Value) -> Result<Server> {
        self.action(server_id, "shutdown", payload).await
    }

    /// Force a server into a stable state after a failed operation
    pub async fn override_server(&self, server_id: &str, payload: &Value) -> Result<Server> {
        self.action(server_id, "override", payload).await
    }

    /// Delete a server
    pub async fn delete_server(&self, server_id: &str) -> Result<()> {
        request::delete(self.concerto, &server_path(server_id)).await
    }

    /// List events of a server
    pub async fn list_events(&self, server_id: &str) -> Result<Vec<Event>> {
        request::get(self.concerto, &format!("{}/events", server_path(server_id))).await
    }

    /// List floating IPs attached to a server
    pub async fn list_floating_ips(&self, server_id: &str) -> Result<Vec<FloatingIp>> {
        request::get(self.concerto, &format!("{}/floating_ips", server_path(server_id))).await
    }

    /// List volumes attached to a server
    pub async fn list_volumes(&self, server_id: &str) -> Result<Vec<Volume>> {
        request::get(self.concerto, &format!("{}/volumes", server_path(server_id))).await
    }

    async fn action(&self, server_id: &str, action: &str, payload: &Value) -> Result<Server> {
        tracing::info!("{} server {}", action, server_id);
        request::put(
            self.concerto,
            &format!("{}/{}", server_path(server_id), action),
            payload,
        )
        .await
    }
}

fn server_path(server_id: &str) -> String {
    format!("/cloud/servers/{}", encode(server_id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::mock::*;
    use serde_json::json;

    fn server() -> Server {
        Server {
            id: "5b5074735f7c880ad9c6bd51".to_string(),
            name: "web-01".to_string(),
            fqdn: "web-01.example.com".to_string(),
            state: "operational".to_string(),
            public_ip: "10.0.0.12".to_string(),
            template_id: "t1".to_string(),
            server_plan_id: "sp1".to_string(),
            cloud_account_id: "ca1".to_string(),
            ssh_profile_id: "ssh1".to_string(),
            firewall_profile_id: "fw1".to_string(),
            label_ids: vec!["l1".to_string()],
            resource_type: "server".to_string(),
        }
    }

    #[tokio::test]
    async fn test_list_servers() {
        let mock = MockConcerto::json(200, &vec![server()]);
        let servers = ServerService::new(&mock).list_servers().await.unwrap();
        assert_eq!(servers, vec![server()]);
        assert_eq!(mock.last_call().method, "GET");
        assert_eq!(mock.last_call().path, "/cloud/servers");
    }

    #[tokio::test]
    async fn test_list_servers_errors() {
        let mock = MockConcerto::failing("connection refused");
        assert_transport_error(ServerService::new(&mock).list_servers().await, "connection refused");

        let mock = MockConcerto::raw(499, b"{}");
        assert_status_error(ServerService::new(&mock).list_servers().await, 499);

        let mock = MockConcerto::raw(200, MALFORMED_JSON);
        assert_decode_error(ServerService::new(&mock).list_servers().await);
    }

    #[tokio::test]
    async fn test_get_server() {
        let mock = MockConcerto::json(200, &server());
        let result = ServerService::new(&mock).get_server(&server().id).await.unwrap();
        assert_eq!(result, server());
        assert_eq!(mock.last_call().path, "/cloud/servers/5b5074735f7c880ad9c6bd51");
    }

    #[tokio::test]
    async fn test_get_server_ignores_unknown_fields() {
        let body = json!({"id": "x", "name": "n", "brand_new_field": {"nested": true}});
        let mock = MockConcerto::json(200, &body);
        let result = ServerService::new(&mock).get_server("x").await.unwrap();
        assert_eq!(result.name, "n");
        assert!(result.label_ids.is_empty());
    }

    #[tokio::test]
    async fn test_create_server() {
        let payload = json!({"server": {"name": "web-01", "template_id": "t1"}});
        let mock = MockConcerto::json(201, &server());
        let result = ServerService::new(&mock).create_server(&payload).await.unwrap();
        assert_eq!(result, server());

        let call = mock.last_call();
        assert_eq!(call.method, "POST");
        assert_eq!(call.path, "/cloud/servers");
        assert_eq!(call.payload, Some(payload));
    }

    #[tokio::test]
    async fn test_create_server_errors() {
        let payload = json!({"server": {}});
        let mock = MockConcerto::failing("timed out");
        assert_transport_error(ServerService::new(&mock).create_server(&payload).await, "timed out");

        let mock = MockConcerto::raw(422, br#"{"errors":{"name":["can't be blank"]}}"#);
        assert_status_error(ServerService::new(&mock).create_server(&payload).await, 422);

        let mock = MockConcerto::raw(201, MALFORMED_JSON);
        assert_decode_error(ServerService::new(&mock).create_server(&payload).await);
    }

    #[tokio::test]
    async fn test_update_server() {
        let payload = json!({"server": {"name": "web-02"}});
        let mock = MockConcerto::json(200, &server());
        ServerService::new(&mock)
            .update_server("abc", &payload)
            .await
            .unwrap();
        let call = mock.last_call();
        assert_eq!(call.method, "PUT");
        assert_eq!(call.path, "/cloud/servers/abc");
    }

    #[tokio::test]
    async fn test_lifecycle_actions_hit_action_paths() {
        let mock = MockConcerto::json(200, &server());
        let service = ServerService::new(&mock);
        let payload = json!({});

        service.boot_server("abc", &payload).await.unwrap();
        service.reboot_server("abc", &payload).await.unwrap();
        service.shutdown_server("abc", &payload).await.unwrap();
        service.override_server("abc", &payload).await.unwrap();

        let paths: Vec<String> = mock.calls().into_iter().map(|c| c.path).collect();
        assert_eq!(
            paths,
            vec![
                "/cloud/servers/abc/boot",
                "/cloud/servers/abc/reboot",
                "/cloud/servers/abc/shutdown",
                "/cloud/servers/abc/override",
            ]
        );
        assert!(mock.calls().iter().all(|c| c.method == "PUT"));
    }

    #[tokio::test]
    async fn test_boot_server_errors() {
        let mock = MockConcerto::raw(409, b"{}");
        assert_status_error(ServerService::new(&mock).boot_server("abc", &json!({})).await, 409);

        let mock = MockConcerto::raw(200, MALFORMED_JSON);
        assert_decode_error(ServerService::new(&mock).boot_server("abc", &json!({})).await);
    }

    #[tokio::test]
    async fn test_delete_server() {
        let mock = MockConcerto::raw(204, b"");
        ServerService::new(&mock).delete_server("abc").await.unwrap();
        assert_eq!(mock.last_call().method, "DELETE");
        assert_eq!(mock.last_call().path, "/cloud/servers/abc");

        let mock = MockConcerto::raw(404, b"");
        assert_status_error(ServerService::new(&mock).delete_server("abc").await, 404);

        let mock = MockConcerto::failing("broken pipe");
        assert_transport_error(ServerService::new(&mock).delete_server("abc").await, "broken pipe");
    }

    #[tokio::test]
    async fn test_list_events() {
        let events = vec![Event {
            id: "e1".to_string(),
            level: "info".to_string(),
            header: "Server booted".to_string(),
            ..Event::default()
        }];
        let mock = MockConcerto::json(200, &events);
        let result = ServerService::new(&mock).list_events("abc").await.unwrap();
        assert_eq!(result, events);
        assert_eq!(mock.last_call().path, "/cloud/servers/abc/events");
    }

    #[tokio::test]
    async fn test_list_attached_resources() {
        let mock = MockConcerto::json(200, &json!([]));
        let service = ServerService::new(&mock);
        assert!(service.list_floating_ips("abc").await.unwrap().is_empty());
        assert!(service.list_volumes("abc").await.unwrap().is_empty());

        let paths: Vec<String> = mock.calls().into_iter().map(|c| c.path).collect();
        assert_eq!(
            paths,
            vec!["/cloud/servers/abc/floating_ips", "/cloud/servers/abc/volumes"]
        );
    }

    #[tokio::test]
    async fn test_ids_are_url_encoded() {
        let mock = MockConcerto::json(200, &server());
        ServerService::new(&mock).get_server("a/b c").await.unwrap();
        assert_eq!(mock.last_call().path, "/cloud/servers/a%2Fb%20c");
    }

    #[tokio::test]
    async fn test_null_fields_decode_as_defaults() {
        let mock = MockConcerto::raw(
            200,
            br#"[{"id":"s1","name":"web","public_ip":null,"ssh_profile_id":null,"label_ids":null}]"#,
        );
        let servers = ServerService::new(&mock).list_servers().await.unwrap();
        assert_eq!(servers[0].name, "web");
        assert!(servers[0].public_ip.is_empty());
        assert!(servers[0].label_ids.is_empty());
    }
}
