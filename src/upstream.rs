use crate::config::UpstreamConfig;
use crate::constants::USER_AGENT;
use crate::error::{ConfigError, UpstreamError};
use crate::types::PropertyRequest;
use axum::{
    body::{Body, Bytes},
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, info, warn};

/// A successful HubSpot response, kept as raw bytes so it can be relayed untouched.
#[derive(Debug, Clone)]
pub struct UpstreamResponse {
    pub status: StatusCode,
    pub content_type: Option<HeaderValue>,
    pub body: Bytes,
}

impl IntoResponse for UpstreamResponse {
    fn into_response(self) -> Response {
        let mut response = (self.status, Body::from(self.body)).into_response();
        if let Some(content_type) = self.content_type {
            response
                .headers_mut()
                .insert(header::CONTENT_TYPE, content_type);
        }
        response
    }
}

/// Client for the HubSpot CRM properties API.
///
/// Holds the bearer credential for the lifetime of the process. Cloning the
/// inner `reqwest::Client` shares its connection pool.
#[derive(Debug, Clone)]
pub struct PropertiesClient {
    http_client: Client,
    base_url: String,
    authorization: HeaderValue,
}

impl PropertiesClient {
    pub fn new(config: &UpstreamConfig) -> Result<Self, ConfigError> {
        let mut authorization =
            HeaderValue::from_str(&format!("Bearer {}", config.access_token))?;
        authorization.set_sensitive(true);

        let http_client = Client::builder().user_agent(USER_AGENT).build()?;

        Ok(Self {
            http_client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            authorization,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `{base}/{object_type}`, plus `/{property_name}` when one is given.
    pub fn property_url(&self, object_type: &str, property_name: Option<&str>) -> String {
        match property_name {
            Some(name) => format!("{}/{}/{}", self.base_url, object_type, name),
            None => format!("{}/{}", self.base_url, object_type),
        }
    }

    /// Issue exactly one upstream call for `request`.
    pub async fn send(&self, request: PropertyRequest) -> Result<UpstreamResponse, UpstreamError> {
        let url = self.property_url(&request.object_type, request.property_name.as_deref());
        let method = request.operation.method();

        info!(
            operation = request.operation.as_str(),
            object_type = %request.object_type,
            property_name = ?request.property_name,
            "Forwarding property request: {} {}",
            method,
            url
        );

        let mut builder = self
            .http_client
            .request(method, &url)
            .header(header::AUTHORIZATION, self.authorization.clone());

        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await?;
        let status = response.status();
        let content_type = response.headers().get(header::CONTENT_TYPE).cloned();

        if !status.is_success() {
            // The status alone is enough to relay; a broken body only loses the payload.
            let payload = match response.bytes().await {
                Ok(body) => error_payload(&body),
                Err(err) => {
                    warn!(status = %status, error = %err, "Failed to read upstream error body");
                    None
                }
            };
            return Err(UpstreamError::Status { status, payload });
        }

        let body = response.bytes().await?;
        debug!(status = %status, bytes = body.len(), "Upstream responded");

        Ok(UpstreamResponse {
            status,
            content_type,
            body,
        })
    }
}

/// HubSpot error bodies are JSON; anything else is relayed as text.
/// Empty or falsy payloads (`null`, `false`, `0`, `""`) carry nothing to relay.
fn error_payload(body: &[u8]) -> Option<Value> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return None;
    }
    let payload = match serde_json::from_slice::<Value>(body) {
        Ok(value) => value,
        Err(_) => Value::String(String::from_utf8_lossy(body).into_owned()),
    };
    (!is_falsy(&payload)).then_some(payload)
}

fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(flag) => !flag,
        Value::Number(number) => number.as_f64() == Some(0.0),
        Value::String(text) => text.is_empty(),
        Value::Array(_) | Value::Object(_) => false,
    }
}
