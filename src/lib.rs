//! `bigo-api-client` is a retrying async HTTP client for the BIGO Live API.
//!
//! The client exposes the room operations the agency platform needs:
//! - [`ApiClient::list_resources`]
//! - [`ApiClient::get_resource_details`]
//! - [`ApiClient::get_resource_events`]
//! - [`ApiClient::get_analytics`]
//!
//! Server errors (5xx) and network failures are retried with exponential
//! backoff; every other failure is returned immediately as an [`ApiError`].

mod client;
mod config;
mod context;
mod endpoint;
mod error;
mod options;
mod params;
mod retry;
pub mod transport;

pub use client::ApiClient;
pub use config::{ClientConfig, BASE_URL_ENV, TOKEN_ENV};
pub use context::RequestContext;
pub use endpoint::{Endpoint, HttpMethod};
pub use error::{ApiError, ErrorKind};
pub use options::ClientOptions;
pub use params::{AnalyticsFilters, EventFilters, ListFilters};
pub use retry::{is_retryable, RetryPolicy, RetryPredicate};
pub use tokio_util::sync::CancellationToken;

pub type Result<T> = std::result::Result<T, ApiError>;
