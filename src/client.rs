use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tokio::time::sleep;

use crate::{
    transport::{HttpTransport, ReqwestTransport, TransportError, TransportRequest},
    AnalyticsFilters, ApiError, ClientConfig, ClientOptions, Endpoint, EventFilters, ListFilters,
    RequestContext, Result,
};

#[derive(Clone)]
/// Retrying client for the BIGO Live API.
///
/// Cloning is cheap: clones share the configuration and the transport.
pub struct ApiClient {
    transport: Arc<dyn HttpTransport>,
    config: ClientConfig,
    options: ClientOptions,
}

impl fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiClient")
            .field("config", &self.config)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    /// Creates a client that talks HTTP through `reqwest`.
    pub fn new(config: ClientConfig) -> Self {
        Self::with_transport(config, ReqwestTransport::new())
    }

    /// Creates a client on top of a custom transport.
    pub fn with_transport(config: ClientConfig, transport: impl HttpTransport + 'static) -> Self {
        Self::with_shared_transport(config, Arc::new(transport))
    }

    /// Creates a client sharing an already wrapped transport.
    pub fn with_shared_transport(config: ClientConfig, transport: Arc<dyn HttpTransport>) -> Self {
        Self {
            transport,
            config,
            options: ClientOptions::default(),
        }
    }

    /// Creates a `reqwest`-backed client from `BIGO_API_BASE_URL` and
    /// `BIGO_API_TOKEN`.
    pub fn from_env() -> std::result::Result<Self, String> {
        ClientConfig::from_env().map(Self::new)
    }

    /// Applies client options such as timeout and retry behavior.
    pub fn with_options(mut self, opts: ClientOptions) -> Self {
        self.options = opts;
        self
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn options(&self) -> &ClientOptions {
        &self.options
    }

    /// Lists rooms, optionally paginated and filtered by status.
    pub async fn list_resources(&self, filters: &ListFilters) -> Result<Value> {
        let mut ctx = RequestContext::new().filters(filters);
        self.call(&Endpoint::LIST_ROOMS, &mut ctx).await
    }

    /// Fetches one room. Fails without any request when `resource_id` is blank.
    pub async fn get_resource_details(&self, resource_id: &str) -> Result<Value> {
        let resource_id = require_resource_id(resource_id)?;
        let mut ctx = RequestContext::new().path_param("roomId", resource_id);
        self.call(&Endpoint::ROOM_DETAILS, &mut ctx).await
    }

    /// Fetches a room's events. Fails without any request when `resource_id`
    /// is blank.
    pub async fn get_resource_events(
        &self,
        resource_id: &str,
        filters: &EventFilters,
    ) -> Result<Value> {
        let resource_id = require_resource_id(resource_id)?;
        let mut ctx = RequestContext::new()
            .path_param("roomId", resource_id)
            .filters(filters);
        self.call(&Endpoint::ROOM_EVENTS, &mut ctx).await
    }

    /// Fetches analytics; every filter is optional.
    pub async fn get_analytics(&self, filters: &AnalyticsFilters) -> Result<Value> {
        let mut ctx = RequestContext::new().filters(filters);
        self.call(&Endpoint::ANALYTICS, &mut ctx).await
    }

    /// Runs `endpoint` with the retry policy and returns the decoded body.
    ///
    /// The request is built once; every retry resends the same request.
    /// Only the final attempt's failure is reported.
    pub async fn call(&self, endpoint: &Endpoint, ctx: &mut RequestContext) -> Result<Value> {
        let url = endpoint.build_url(self.config.base_url(), &ctx.path_params, &ctx.query)?;
        let request = TransportRequest {
            method: endpoint.method,
            url,
            headers: self.headers(&ctx.headers),
            body: ctx.body.clone(),
            timeout: Duration::from_millis(self.options.timeout_ms),
        };
        let cancel = ctx.cancel.clone();
        let policy = &self.options.retry;

        if ctx.is_cancelled() {
            return Err(ApiError::Cancelled);
        }

        loop {
            let attempt = ctx.begin_attempt();

            #[cfg(feature = "tracing")]
            tracing::debug!(
                endpoint = endpoint.name,
                method = %request.method,
                url = %request.url,
                attempt,
                "sending request"
            );

            let outcome = match &cancel {
                Some(token) => tokio::select! {
                    biased;
                    _ = token.cancelled() => return Err(ApiError::Cancelled),
                    outcome = self.transport.send(&request) => outcome,
                },
                None => self.transport.send(&request).await,
            };

            let err = match outcome {
                Ok(response) if (200..300).contains(&response.status) => {
                    return Ok(decode_body(&response.body));
                }
                Ok(response) => {
                    let data = (!response.body.trim().is_empty())
                        .then(|| decode_body(&response.body));
                    ApiError::from_status(response.status, data)
                }
                Err(err) => from_transport_error(err),
            };

            if !policy.should_retry(&err, attempt) {
                #[cfg(feature = "tracing")]
                tracing::warn!(
                    endpoint = endpoint.name,
                    attempts = attempt + 1,
                    error = %err,
                    "request failed"
                );
                return Err(err);
            }

            let delay = policy.delay_for(attempt);

            #[cfg(feature = "tracing")]
            tracing::debug!(
                endpoint = endpoint.name,
                attempt,
                delay_ms = delay.as_millis() as u64,
                error = %err,
                "retrying request"
            );

            match &cancel {
                Some(token) => tokio::select! {
                    biased;
                    _ = token.cancelled() => return Err(ApiError::Cancelled),
                    _ = sleep(delay) => {}
                },
                None => sleep(delay).await,
            }
        }
    }

    fn headers(&self, overrides: &[(String, String)]) -> Vec<(String, String)> {
        let mut headers = vec![
            ("Authorization".to_owned(), self.config.authorization()),
            ("Content-Type".to_owned(), "application/json".to_owned()),
        ];
        for (name, value) in overrides {
            headers.retain(|(key, _)| !key.eq_ignore_ascii_case(name));
            headers.push((name.clone(), value.clone()));
        }
        headers
    }
}

fn require_resource_id(resource_id: &str) -> Result<&str> {
    let trimmed = resource_id.trim();
    if trimmed.is_empty() {
        return Err(ApiError::Validation("Resource ID is required".to_owned()));
    }
    Ok(trimmed)
}

/// JSON bodies are decoded; anything else is passed through as a string.
fn decode_body(body: &str) -> Value {
    if body.trim().is_empty() {
        return Value::Null;
    }
    serde_json::from_str(body).unwrap_or_else(|_| Value::String(body.to_owned()))
}

fn from_transport_error(err: TransportError) -> ApiError {
    match err.kind.code() {
        Some(code) => ApiError::Network {
            code: code.to_owned(),
            message: err.message,
        },
        None => ApiError::Unknown {
            message: err.message,
            status: None,
            data: None,
            code: None,
        },
    }
}
