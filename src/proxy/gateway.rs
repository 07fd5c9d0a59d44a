//! DSP upstream gateway
//!
//! Forwards authenticated queries to the fixed internal DSP endpoint and
//! translates every upstream outcome into the gateway's error contract.

use serde_json::{Map, Value, json};
use std::time::Duration;
use tracing::{info, warn};

use crate::config::UpstreamConfig;
use crate::error::{GatewayError, Result};
use crate::proxy::types::QueryRequest;

/// Fixed upstream path; never derived from request input.
const QUERY_PATH: &str = "/dsp/query";

/// Gateway to the internal DSP service.
///
/// The endpoint is resolved once from configuration, which blocks
/// client-supplied hostnames or paths from ever steering the outbound call.
pub struct ProxyGateway {
    client: reqwest::Client,
    endpoint: String,
    timeout_seconds: u64,
}

impl ProxyGateway {
    /// Build the gateway and its shared HTTP client.
    pub fn new(config: &UpstreamConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .connect_timeout(Duration::from_secs(config.connect_timeout_seconds))
            .build()
            .map_err(|e| {
                GatewayError::internal_with_source("failed to build upstream HTTP client", e)
            })?;

        let endpoint = format!("{}{QUERY_PATH}", config.base_url.trim_end_matches('/'));

        Ok(Self {
            client,
            endpoint,
            timeout_seconds: config.timeout_seconds,
        })
    }

    /// Forward a query to the DSP and translate the outcome.
    ///
    /// One best-effort attempt: no retries, no backoff. A 2xx answer is
    /// returned as parsed JSON, or wrapped as `{"data": <text>}` when the body
    /// is not JSON. An upstream 400 is surfaced as a local 400; every other
    /// non-2xx status flattens to 502.
    pub async fn forward(&self, request: &QueryRequest, subject: &str) -> Result<Value> {
        // Allow-list: exactly `query` and, when present, `extras` go out.
        let mut body = Map::new();
        body.insert("query".to_string(), Value::String(request.query.clone()));
        if let Some(extras) = &request.extras {
            body.insert("extras".to_string(), Value::Object(extras.clone()));
        }

        info!("forwarding DSP query for {subject}");

        let response = self
            .client
            .post(&self.endpoint)
            .json(&body)
            .send()
            .await
            .map_err(|err| self.classify_transport_error(&err))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|err| self.classify_transport_error(&err))?;

        if status.is_success() {
            Ok(serde_json::from_str(&text).unwrap_or_else(|_| json!({ "data": text })))
        } else {
            warn!("upstream answered {status} for {subject}");
            let body = serde_json::from_str(&text).unwrap_or(Value::String(text));
            Err(GatewayError::UpstreamBadResponse {
                status: status.as_u16(),
                body,
            })
        }
    }

    fn classify_transport_error(&self, err: &reqwest::Error) -> GatewayError {
        if err.is_timeout() {
            warn!("upstream timed out after {}s", self.timeout_seconds);
            GatewayError::upstream_timeout(format!(
                "upstream did not answer within {}s",
                self.timeout_seconds
            ))
        } else {
            warn!("upstream request failed: {err}");
            GatewayError::upstream_error(err.to_string())
        }
    }
}
