//! Cloud accounts (provider credentials registered in settings)

use super::de::nullable;
use super::{request, ConcertoService, Result};
use crate::format::{Column, Columns};
use serde::{Deserialize, Serialize};
use urlencoding::encode;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CloudAccount {
    #[serde(deserialize_with = "nullable")]
    pub id: String,
    #[serde(deserialize_with = "nullable")]
    pub name: String,
    #[serde(deserialize_with = "nullable")]
    pub cloud_provider_id: String,
    #[serde(deserialize_with = "nullable")]
    pub cloud_provider_name: String,
    #[serde(deserialize_with = "nullable")]
    pub state: String,
}

impl Columns for CloudAccount {
    const COLUMNS: &'static [Column] = &[
        Column::new("ID", "id"),
        Column::new("NAME", "name"),
        Column::new("CLOUD PROVIDER ID", "cloud_provider_id"),
        Column::new("CLOUD PROVIDER NAME", "cloud_provider_name"),
        Column::new("STATE", "state"),
    ];
}

pub struct CloudAccountService<'a> {
    concerto: &'a dyn ConcertoService,
}

impl<'a> CloudAccountService<'a> {
    pub fn new(concerto: &'a dyn ConcertoService) -> Self {
        Self { concerto }
    }

    pub async fn list_cloud_accounts(&self) -> Result<Vec<CloudAccount>> {
        request::get(self.concerto, "/settings/cloud_accounts").await
    }

    pub async fn get_cloud_account(&self, cloud_account_id: &str) -> Result<CloudAccount> {
        request::get(
            self.concerto,
            &format!("/settings/cloud_accounts/{}", encode(cloud_account_id)),
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::mock::*;

    fn account() -> CloudAccount {
        CloudAccount {
            id: "ca1".to_string(),
            name: "production".to_string(),
            cloud_provider_id: "cp1".to_string(),
            cloud_provider_name: "AWS".to_string(),
            state: "active".to_string(),
        }
    }

    #[tokio::test]
    async fn test_list_and_get() {
        let mock = MockConcerto::json(200, &vec![account()]);
        let accounts = CloudAccountService::new(&mock)
            .list_cloud_accounts()
            .await
            .unwrap();
        assert_eq!(accounts, vec![account()]);
        assert_eq!(mock.last_call().path, "/settings/cloud_accounts");

        let mock = MockConcerto::json(200, &account());
        let result = CloudAccountService::new(&mock)
            .get_cloud_account("ca1")
            .await
            .unwrap();
        assert_eq!(result, account());
        assert_eq!(mock.last_call().path, "/settings/cloud_accounts/ca1");
    }

    #[tokio::test]
    async fn test_errors() {
        let mock = MockConcerto::failing("connection refused");
        assert_transport_error(
            CloudAccountService::new(&mock).list_cloud_accounts().await,
            "connection refused",
        );

        let mock = MockConcerto::raw(403, b"");
        assert_status_error(CloudAccountService::new(&mock).get_cloud_account("ca1").await, 403);

        let mock = MockConcerto::raw(200, MALFORMED_JSON);
        assert_decode_error(CloudAccountService::new(&mock).get_cloud_account("ca1").await);
    }
}
