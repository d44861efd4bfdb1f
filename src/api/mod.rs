//! Concerto API interaction module
//!
//! Every resource service borrows a [`ConcertoService`] transport, builds a
//! path from a fixed URL template, checks the status code and decodes the
//! JSON body into a typed struct.
//!
//! # Module Structure
//!
//! - [`http`] - reqwest transport, TLS identity, read-only guard
//! - [`error`] - [`ApiError`] shared by all services
//! - one module per resource type (servers, clusters, volumes, ...)
//!
//! # Example
//!
//! ```ignore
//! use cio::api::{servers::ServerService, ConcertoHttpClient};
//!
//! async fn example(config: &cio::config::Config) -> anyhow::Result<()> {
//!     let concerto = ConcertoHttpClient::new(config)?;
//!     let servers = ServerService::new(&concerto).list_servers().await?;
//!     Ok(())
//! }
//! ```

pub(crate) mod de;
pub mod error;
pub mod http;
mod request;

#[cfg(test)]
pub(crate) mod mock;

pub mod admin;
pub mod cloud_accounts;
pub mod cloud_applications;
pub mod cloud_providers;
pub mod clusters;
pub mod firewall;
pub mod firewall_profiles;
pub mod floating_ips;
pub mod labels;
pub mod load_balancers;
pub mod node_pools;
pub mod policies;
pub mod realms;
pub mod server_arrays;
pub mod server_plans;
pub mod servers;
pub mod ssh_profiles;
pub mod volumes;

use async_trait::async_trait;
use serde_json::Value;

pub use error::ApiError;
pub use http::{format_api_error, ConcertoHttpClient};

pub type Result<T> = std::result::Result<T, ApiError>;

/// Status code and body of an API response, before any interpretation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

/// Transport used by every resource service
#[async_trait]
pub trait ConcertoService: Send + Sync {
    async fn get(&self, path: &str) -> Result<RawResponse>;
    async fn post(&self, path: &str, payload: &Value) -> Result<RawResponse>;
    async fn put(&self, path: &str, payload: &Value) -> Result<RawResponse>;
    async fn delete(&self, path: &str) -> Result<RawResponse>;
}
