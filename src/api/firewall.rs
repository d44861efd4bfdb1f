//! Firewall policy of the server the agent runs on

use super::{request, ConcertoService, Result};
use crate::firewall::{FirewallRule, Policy};
use serde_json::{json, Value};

pub struct FirewallService<'a> {
    concerto: &'a dyn ConcertoService,
}

impl<'a> FirewallService<'a> {
    pub fn new(concerto: &'a dyn ConcertoService) -> Self {
        Self { concerto }
    }

    pub async fn get_policy(&self) -> Result<Policy> {
        request::get(self.concerto, "/cloud/firewall_profile").await
    }

    pub async fn update_policy(&self, payload: &Value) -> Result<Policy> {
        tracing::info!("updating firewall policy");
        request::put(self.concerto, "/cloud/firewall_profile", payload).await
    }

    /// Replace the whole rule set
    pub async fn update_rules(&self, rules: &[FirewallRule]) -> Result<Policy> {
        self.update_policy(&rules_payload(rules)).await
    }
}

pub fn rules_payload(rules: &[FirewallRule]) -> Value {
    json!({ "firewall_profile": { "rules": rules } })
}
