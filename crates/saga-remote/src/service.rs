//! Generation service abstraction.
//!
//! Two call shapes: the map and script endpoints return TOON text, every other
//! endpoint takes and returns JSON. Uses blocking HTTP via `ureq`; there is no
//! async runtime, concurrency comes from `rayon`.

use serde::Serialize;
use serde_json::Value;

/// Errors from generation service calls. All of them trigger fallback.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("HTTP request failed: {0}")]
    Http(String),
    #[error("service error ({status}): {body}")]
    Status { status: u16, body: String },
    #[error("response parse error: {0}")]
    Parse(String),
    #[error("empty response from service")]
    EmptyResponse,
    #[error(transparent)]
    Encode(#[from] saga_toon::EncodeError),
}

/// Context for narrative panel generation.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScriptRequest {
    pub repo_url: String,
    /// One line per decoded module: label, files and tooltip.
    pub module_personas: String,
    pub num_panels: u32,
}

/// The remote generation service.
///
/// `Sync` so the orchestrator can issue independent calls in parallel.
pub trait GenerationService: Sync {
    /// Raw map document for `repo_url`.
    fn generate_map(&self, repo_url: &str) -> Result<String, ServiceError>;

    /// Raw panel script.
    fn generate_script(&self, request: &ScriptRequest) -> Result<String, ServiceError>;

    /// POST `body` as JSON to `endpoint` and return the JSON reply.
    fn call_json(&self, endpoint: &str, body: &Value) -> Result<Value, ServiceError>;

    /// Display name for logging.
    fn name(&self) -> &str;
}

// ---------------------------------------------------------------------------
// HTTP service
// ---------------------------------------------------------------------------

/// Service reached over HTTP at a base URL, e.g. `http://localhost:5000`.
#[cfg(feature = "http")]
pub struct HttpService {
    base_url: String,
    agent: ureq::Agent,
}

#[cfg(feature = "http")]
impl HttpService {
    pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

    pub fn new(base_url: impl Into<String>, timeout_secs: Option<u64>) -> Self {
        let timeout = timeout_secs.unwrap_or(Self::DEFAULT_TIMEOUT_SECS);
        Self {
            base_url: base_url.into(),
            agent: ureq::Agent::new_with_config(
                ureq::config::Config::builder()
                    .timeout_global(Some(std::time::Duration::from_secs(timeout)))
                    .http_status_as_error(false)
                    .build(),
            ),
        }
    }

    pub fn from_config(config: &saga_core::config::ServiceConfig) -> Self {
        Self::new(config.base_url.clone(), Some(config.timeout_secs))
    }

    fn url(&self, endpoint: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            endpoint.trim_start_matches('/')
        )
    }

    fn read_text(mut response: ureq::http::Response<ureq::Body>) -> Result<String, ServiceError> {
        let status = response.status().as_u16();
        let body = response.body_mut().read_to_string();
        judge_response(status, body)
    }

    fn post_json_for_text(
        &self,
        endpoint: &str,
        body: &impl Serialize,
    ) -> Result<String, ServiceError> {
        let response = self
            .agent
            .post(&self.url(endpoint))
            .header("content-type", "application/json")
            .send_json(body)
            .map_err(|e| ServiceError::Http(e.to_string()))?;
        Self::read_text(response)
    }
}

/// A non-2xx status wins over a body that could not be read; the body then
/// reads as empty.
#[cfg_attr(not(feature = "http"), allow(dead_code))]
fn judge_response<E: std::fmt::Display>(
    status: u16,
    body: Result<String, E>,
) -> Result<String, ServiceError> {
    if !(200..300).contains(&status) {
        return Err(ServiceError::Status {
            status,
            body: body.unwrap_or_default(),
        });
    }
    let text = body.map_err(|e| ServiceError::Parse(e.to_string()))?;
    if text.trim().is_empty() {
        return Err(ServiceError::EmptyResponse);
    }
    Ok(text)
}

#[cfg(feature = "http")]
impl GenerationService for HttpService {
    fn generate_map(&self, repo_url: &str) -> Result<String, ServiceError> {
        let body = saga_toon::encode_map_request(repo_url)?;
        tracing::debug!(url = %self.url("generate_map"), "requesting map document");

        let response = self
            .agent
            .post(&self.url("generate_map"))
            .header("content-type", "text/plain")
            .send(body.as_str())
            .map_err(|e| ServiceError::Http(e.to_string()))?;
        Self::read_text(response)
    }

    fn generate_script(&self, request: &ScriptRequest) -> Result<String, ServiceError> {
        tracing::debug!(panels = request.num_panels, "requesting panel script");
        self.post_json_for_text("generate_script", request)
    }

    fn call_json(&self, endpoint: &str, body: &Value) -> Result<Value, ServiceError> {
        let text = self.post_json_for_text(endpoint, body)?;
        serde_json::from_str(&text).map_err(|e| ServiceError::Parse(e.to_string()))
    }

    fn name(&self) -> &str {
        &self.base_url
    }
}
