use reqwest::Client;
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use std::time::Duration;
use tracing::{debug, instrument};
use url::Url;

use crate::errors::{FlashDutyError, Result};
use crate::types::{AlertEvent, PushResponse};

/// Endpoint of the Flashduty standard alert push API.
pub const DEFAULT_API_URL: &str = "https://api.flashcat.cloud/event/push/alert/standard";

pub(crate) fn default_api_url() -> Url {
    Url::parse(DEFAULT_API_URL).expect("Valid default API URL")
}

/// Client for pushing alert events to Flashduty
///
/// Owns its configuration: the integration key, an optional user prefix
/// applied to alert titles, the endpoint URL, and the HTTP client. For the
/// process-wide configuration surface see [`set_key`](crate::set_key) and
/// the crate-level [`push_alert`](crate::push_alert).
///
/// # Example
///
/// ```rust,no_run
/// use flashduty_push::{AlertEvent, EventStatus, FlashDutyClient};
/// use std::time::Duration;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let client = FlashDutyClient::new("your-integration-key", Duration::from_secs(10))?;
///
///     let event = AlertEvent::new("cpu idle low than 20%", EventStatus::Warning)
///         .with_label("service", "engine");
///
///     let response = client.push_alert(event).await?;
///     println!("alert key: {}", response.data.alert_key);
///     Ok(())
/// }
/// ```
#[derive(Clone)]
pub struct FlashDutyClient {
    client: ClientWithMiddleware,
    api_url: Url,
    integration_key: Option<String>,
    user_prefix: Option<String>,
}

impl FlashDutyClient {
    /// Create a new client with the given integration key
    ///
    /// # Arguments
    ///
    /// * `integration_key` - Credential obtained from Flashduty after adding
    ///   an integration
    /// * `timeout` - Request timeout duration
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(integration_key: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(FlashDutyError::BuildHttpClient)?;

        let client = ClientBuilder::new(client).build();

        Ok(Self::with_client(client).with_integration_key(integration_key))
    }

    /// Create a new client from a custom reqwest middleware client
    ///
    /// This allows you to add custom middleware (retry, logging, etc.) or
    /// share a connection pool. The client starts without an integration
    /// key; set one with [`with_integration_key`](Self::with_integration_key)
    /// or provide it per event.
    pub fn with_client(client: ClientWithMiddleware) -> Self {
        Self {
            client,
            api_url: default_api_url(),
            integration_key: None,
            user_prefix: None,
        }
    }

    /// Set the integration key used when an event carries no override
    #[must_use]
    pub fn with_integration_key(mut self, integration_key: &str) -> Self {
        self.integration_key = Some(integration_key.to_string());
        self
    }

    /// Prepend an identity prefix to every alert title
    ///
    /// The prefix and the title are joined with a single space.
    #[must_use]
    pub fn with_user_prefix(mut self, user_prefix: &str) -> Self {
        self.user_prefix = Some(user_prefix.to_string());
        self
    }

    /// Override the API URL (useful for testing against a mock server)
    #[must_use]
    pub fn with_api_url(mut self, api_url: Url) -> Self {
        self.api_url = api_url;
        self
    }

    /// Get the API URL
    pub fn api_url(&self) -> &Url {
        &self.api_url
    }

    /// Push an alert event to Flashduty
    ///
    /// Resolves the effective integration key (the event's override, else
    /// the client's), validates the event against the documented field
    /// limits, and POSTs the JSON payload with the key as the
    /// `integration_key` query parameter. Safe to invoke concurrently;
    /// each call owns its request/response exchange.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - No integration key is available (no request is sent)
    /// - The event violates a documented field limit (no request is sent)
    /// - The HTTP request fails
    /// - Flashduty returns a non-success status code
    /// - The success response body is not a valid push response
    #[instrument(
        name = "FlashDutyClient::push_alert",
        skip_all,
        fields(title_rule = %event.title_rule, event_status = %event.event_status)
    )]
    pub async fn push_alert(&self, event: AlertEvent) -> Result<PushResponse> {
        let key = event
            .integration_key
            .as_deref()
            .or(self.integration_key.as_deref())
            .ok_or(FlashDutyError::MissingIntegrationKey)?;

        event.validate()?;

        let payload = event.to_payload(self.user_prefix.as_deref());

        debug!(url = %self.api_url, "Pushing alert event to Flashduty");

        let response = self
            .client
            .post(self.api_url.clone())
            .query(&[("integration_key", key)])
            .json(&payload)
            .send()
            .await
            .map_err(FlashDutyError::Request)?;

        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FlashDutyError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|err| FlashDutyError::Request(err.into()))?;
        let decoded: PushResponse =
            serde_json::from_slice(&body).map_err(FlashDutyError::Decode)?;

        debug!(
            request_id = %decoded.request_id,
            alert_key = %decoded.data.alert_key,
            "Alert event accepted"
        );

        Ok(decoded)
    }

    /// Push an alert event, blocking the current thread
    ///
    /// Drives [`push_alert`](Self::push_alert) to completion on a private
    /// current-thread runtime. Intended for synchronous callers; must not
    /// be called from within an async runtime (doing so panics, as nested
    /// runtimes are not supported).
    pub fn push_alert_blocking(&self, event: AlertEvent) -> Result<PushResponse> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(FlashDutyError::BlockingRuntime)?;

        runtime.block_on(self.push_alert(event))
    }
}
