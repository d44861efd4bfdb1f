//! SSH profiles

use super::de::nullable;
use super::labels::Labelled;
use super::{request, ConcertoService, Result};
use crate::format::{Column, Columns};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use urlencoding::encode;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SshProfile {
    #[serde(deserialize_with = "nullable")]
    pub id: String,
    #[serde(deserialize_with = "nullable")]
    pub name: String,
    #[serde(deserialize_with = "nullable")]
    pub public_key: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    #[serde(deserialize_with = "nullable")]
    pub private_key: String,
    #[serde(deserialize_with = "nullable")]
    pub label_ids: Vec<String>,
    #[serde(deserialize_with = "nullable")]
    pub resource_type: String,
}

impl Columns for SshProfile {
    const COLUMNS: &'static [Column] = &[
        Column::new("ID", "id"),
        Column::new("NAME", "name"),
        Column::new("PUBLIC KEY", "public_key"),
        Column::new("LABELS", "label_ids"),
    ];
}

impl Labelled for SshProfile {
    fn label_ids(&self) -> &[String] {
        &self.label_ids
    }
}

pub struct SshProfileService<'a> {
    concerto: &'a dyn ConcertoService,
}

impl<'a> SshProfileService<'a> {
    pub fn new(concerto: &'a dyn ConcertoService) -> Self {
        Self { concerto }
    }

    pub async fn list_ssh_profiles(&self) -> Result<Vec<SshProfile>> {
        request::get(self.concerto, "/cloud/ssh_profiles").await
    }

    pub async fn get_ssh_profile(&self, ssh_profile_id: &str) -> Result<SshProfile> {
        request::get(self.concerto, &ssh_profile_path(ssh_profile_id)).await
    }

    pub async fn create_ssh_profile(&self, payload: &Value) -> Result<SshProfile> {
        request::post(self.concerto, "/cloud/ssh_profiles", payload).await
    }

    pub async fn update_ssh_profile(&self, ssh_profile_id: &str, payload: &Value) -> Result<SshProfile> {
        request::put(self.concerto, &ssh_profile_path(ssh_profile_id), payload).await
    }

    pub async fn delete_ssh_profile(&self, ssh_profile_id: &str) -> Result<()> {
        request::delete(self.concerto, &ssh_profile_path(ssh_profile_id)).await
    }
}

fn ssh_profile_path(ssh_profile_id: &str) -> String {
    format!("/cloud/ssh_profiles/{}", encode(ssh_profile_id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::mock::*;
    use serde_json::json;

    fn profile() -> SshProfile {
        SshProfile {
            id: "ssh1".to_string(),
            name: "deploy".to_string(),
            public_key: "ssh-ed25519 AAAAC3Nza deploy@example".to_string(),
            ..SshProfile::default()
        }
    }

    #[tokio::test]
    async fn test_crud() {
        let mock = MockConcerto::json(200, &profile());
        let service = SshProfileService::new(&mock);
        let payload = json!({"ssh_profile": {"name": "deploy"}});

        assert_eq!(service.get_ssh_profile("ssh1").await.unwrap(), profile());
        service.create_ssh_profile(&payload).await.unwrap();
        service.update_ssh_profile("ssh1", &payload).await.unwrap();

        let calls: Vec<(&str, String)> = mock.calls().into_iter().map(|c| (c.method, c.path)).collect();
        assert_eq!(
            calls,
            vec![
                ("GET", "/cloud/ssh_profiles/ssh1".to_string()),
                ("POST", "/cloud/ssh_profiles".to_string()),
                ("PUT", "/cloud/ssh_profiles/ssh1".to_string()),
            ]
        );

        let mock = MockConcerto::raw(204, b"");
        SshProfileService::new(&mock).delete_ssh_profile("ssh1").await.unwrap();
        assert_eq!(mock.last_call().method, "DELETE");
    }

    #[test]
    fn test_private_key_not_rendered_when_absent() {
        let value = serde_json::to_value(profile()).unwrap();
        assert!(value.get("private_key").is_none());
    }

    #[tokio::test]
    async fn test_errors() {
        let mock = MockConcerto::failing("connection refused");
        assert_transport_error(
            SshProfileService::new(&mock).list_ssh_profiles().await,
            "connection refused",
        );

        let mock = MockConcerto::raw(422, b"{\"errors\":{\"public_key\":[\"is invalid\"]}}");
        assert_status_error(
            SshProfileService::new(&mock).create_ssh_profile(&json!({})).await,
            422,
        );

        let mock = MockConcerto::raw(200, MALFORMED_JSON);
        assert_decode_error(SshProfileService::new(&mock).list_ssh_profiles().await);
    }
}
