//! HTTP transport for Concerto REST API calls

use super::{ApiError, ConcertoService, RawResponse, Result};
use crate::config::Config;
use async_trait::async_trait;
use reqwest::{Certificate, Client, Identity, Method};
use serde_json::Value;
use std::path::Path;
use std::time::Duration;
use url::Url;

/// Maximum length of response body to log (to avoid logging sensitive data)
const MAX_LOG_BODY_LENGTH: usize = 200;

/// Sanitize response body for logging
/// Truncates long responses and drops control characters
fn sanitize_for_log(body: &str) -> String {
    let truncated = if body.len() > MAX_LOG_BODY_LENGTH {
        let cut = (0..=MAX_LOG_BODY_LENGTH)
            .rev()
            .find(|i| body.is_char_boundary(*i))
            .unwrap_or(0);
        format!("{}... [truncated, {} bytes total]", &body[..cut], body.len())
    } else {
        body.to_string()
    };

    truncated.replace(|c: char| !c.is_ascii_graphic() && c != ' ', "")
}

/// reqwest-backed [`ConcertoService`]
#[derive(Clone)]
pub struct ConcertoHttpClient {
    client: Client,
    endpoint: Url,
    readonly: bool,
}

impl ConcertoHttpClient {
    /// Build a client from the effective configuration
    pub fn new(config: &Config) -> Result<Self> {
        let endpoint = parse_endpoint(&config.endpoint)?;

        let mut builder = Client::builder()
            .user_agent(concat!("cio/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(config.timeout_secs));

        match (&config.cert, &config.key) {
            (Some(cert), Some(key)) => {
                let mut pem = read_pem(cert)?;
                pem.push(b'\n');
                pem.extend(read_pem(key)?);
                let identity = Identity::from_pem(&pem).map_err(|e| {
                    ApiError::Configuration(format!("invalid client certificate or key: {}", e))
                })?;
                builder = builder.identity(identity);
            }
            (None, None) => {}
            _ => {
                return Err(ApiError::Configuration(
                    "client certificate and key must be configured together".to_string(),
                ))
            }
        }

        if let Some(ca_cert) = &config.ca_cert {
            let certificate = Certificate::from_pem(&read_pem(ca_cert)?).map_err(|e| {
                ApiError::Configuration(format!("invalid CA certificate: {}", e))
            })?;
            builder = builder.add_root_certificate(certificate);
        }

        let client = builder
            .build()
            .map_err(|e| ApiError::Configuration(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            endpoint,
            readonly: false,
        })
    }

    /// Refuse every request that is not a GET
    pub fn with_readonly(mut self, readonly: bool) -> Self {
        self.readonly = readonly;
        self
    }

    /// API endpoint requests are resolved against
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    fn url(&self, path: &str) -> Result<Url> {
        self.endpoint
            .join(path.trim_start_matches('/'))
            .map_err(|e| ApiError::Configuration(format!("invalid request path {}: {}", path, e)))
    }

    async fn send(&self, method: Method, path: &str, payload: Option<&Value>) -> Result<RawResponse> {
        if self.readonly && method != Method::GET {
            tracing::warn!("Blocked {} {} (read-only mode)", method, path);
            return Err(ApiError::ReadOnly {
                method: method_name(&method),
                path: path.to_string(),
            });
        }

        let url = self.url(path)?;
        tracing::debug!("{} {}", method, url);

        let mut request = self
            .client
            .request(method, url)
            .header(reqwest::header::ACCEPT, "application/json");

        if let Some(payload) = payload {
            request = request.json(payload);
        }

        let response = request.send().await.map_err(ApiError::transport)?;

        let status = response.status();
        let body = response.bytes().await.map_err(ApiError::transport)?;

        if !status.is_success() {
            // Only log sanitized/truncated error body to avoid leaking sensitive data
            tracing::error!(
                "API error: {} - {}",
                status,
                sanitize_for_log(&String::from_utf8_lossy(&body))
            );
        }

        Ok(RawResponse {
            status: status.as_u16(),
            body: body.to_vec(),
        })
    }
}

#[async_trait]
impl ConcertoService for ConcertoHttpClient {
    async fn get(&self, path: &str) -> Result<RawResponse> {
        self.send(Method::GET, path, None).await
    }

    async fn post(&self, path: &str, payload: &Value) -> Result<RawResponse> {
        self.send(Method::POST, path, Some(payload)).await
    }

    async fn put(&self, path: &str, payload: &Value) -> Result<RawResponse> {
        self.send(Method::PUT, path, Some(payload)).await
    }

    async fn delete(&self, path: &str) -> Result<RawResponse> {
        self.send(Method::DELETE, path, None).await
    }
}

fn method_name(method: &Method) -> &'static str {
    match *method {
        Method::POST => "POST",
        Method::PUT => "PUT",
        Method::DELETE => "DELETE",
        Method::PATCH => "PATCH",
        _ => "GET",
    }
}

/// Parse the endpoint, making sure relative joins keep its path
fn parse_endpoint(endpoint: &str) -> Result<Url> {
    if endpoint.trim().is_empty() {
        return Err(ApiError::Configuration(
            "no API endpoint configured. Use --endpoint or CONCERTO_ENDPOINT".to_string(),
        ));
    }

    let mut url = Url::parse(endpoint.trim())
        .map_err(|e| ApiError::Configuration(format!("invalid endpoint {}: {}", endpoint, e)))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(ApiError::Configuration(format!(
            "unsupported endpoint scheme: {}",
            url.scheme()
        )));
    }

    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }

    Ok(url)
}

fn read_pem(path: &Path) -> Result<Vec<u8>> {
    std::fs::read(path)
        .map_err(|e| ApiError::Configuration(format!("cannot read {}: {}", path.display(), e)))
}

/// Format a Concerto API error for display
pub fn format_api_error(error: &anyhow::Error) -> String {
    let Some(api_error) = error.chain().find_map(|e| e.downcast_ref::<ApiError>()) else {
        return format!("{:#}", error);
    };

    match api_error {
        ApiError::Status { code: 401, .. } => {
            "Authentication failed. Check your client certificate and key.".to_string()
        }
        ApiError::Status { code: 403, .. } => {
            "Permission denied. Your account cannot perform this operation.".to_string()
        }
        ApiError::Status { code: 404, .. } => "Resource not found.".to_string(),
        ApiError::Status { code: 409, .. } => {
            "Resource conflict. The resource may already exist or be in use.".to_string()
        }
        ApiError::Status {
            code: 422, message, ..
        } => format!("Invalid request: {}", message),
        ApiError::Status { code: 429, .. } => {
            "Rate limit exceeded. Please try again later.".to_string()
        }
        ApiError::Status { code, .. } if *code >= 500 => {
            format!("Concerto service unavailable ({}). Please try again.", code)
        }
        ApiError::Transport(_) => format!(
            "Request failed: {}. Check your network connection and endpoint.",
            api_error
        ),
        other => other.to_string(),
    }
}
