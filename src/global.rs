//! Process-wide configuration and crate-level push functions.
//!
//! [`FlashDutyClient`](crate::FlashDutyClient) is the primary API; this
//! module carries the ambient surface for callers that configure one
//! integration key per process and push from anywhere. State lives behind
//! an `RwLock`: pushes take an atomic snapshot of the key and prefix at the
//! moment of the call, [`set_key`] takes the write lock.

use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use std::sync::{OnceLock, PoisonError, RwLock};

use crate::client::FlashDutyClient;
use crate::errors::Result;
use crate::types::{AlertEvent, PushResponse};

#[derive(Debug, Clone)]
struct Identity {
    integration_key: Option<String>,
    user_prefix: Option<String>,
}

static IDENTITY: RwLock<Identity> = RwLock::new(Identity {
    integration_key: None,
    user_prefix: None,
});

/// Shared HTTP client backing the crate-level push functions, built once.
fn http_client() -> &'static ClientWithMiddleware {
    static CLIENT: OnceLock<ClientWithMiddleware> = OnceLock::new();
    CLIENT.get_or_init(|| ClientBuilder::new(reqwest::Client::new()).build())
}

/// Set the process-wide integration key
///
/// Overwrites both stored fields unconditionally: passing `user = None`
/// clears any previously configured title prefix. The key format is not
/// validated.
///
/// # Example
///
/// ```rust
/// flashduty_push::set_key("5c4cfe6e1ae15dfeb73bfc70181f786b073", Some("admin"));
/// ```
pub fn set_key(key: &str, user: Option<&str>) {
    let mut identity = IDENTITY.write().unwrap_or_else(PoisonError::into_inner);
    identity.integration_key = Some(key.to_string());
    identity.user_prefix = user.map(str::to_string);
}

/// Get the current process-wide integration key
pub fn get_key() -> Option<String> {
    IDENTITY
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .integration_key
        .clone()
}

/// Get the current process-wide user prefix
pub fn get_user() -> Option<String> {
    IDENTITY
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .user_prefix
        .clone()
}

#[cfg(test)]
fn reset_identity() {
    let mut identity = IDENTITY.write().unwrap_or_else(PoisonError::into_inner);
    identity.integration_key = None;
    identity.user_prefix = None;
}

/// Snapshot the identity store into a client over the shared HTTP client.
fn ambient_client() -> FlashDutyClient {
    let identity = IDENTITY
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .clone();

    let mut client = FlashDutyClient::with_client(http_client().clone());
    if let Some(key) = &identity.integration_key {
        client = client.with_integration_key(key);
    }
    if let Some(prefix) = &identity.user_prefix {
        client = client.with_user_prefix(prefix);
    }
    client
}

/// Push an alert event using the process-wide configuration
///
/// The key and prefix are read at the moment of the call; an event-level
/// key set via [`AlertEvent::with_integration_key`] takes precedence.
/// Fails with [`MissingIntegrationKey`](crate::FlashDutyError::MissingIntegrationKey)
/// before any network I/O when neither is available.
///
/// # Example
///
/// ```rust,no_run
/// use flashduty_push::{push_alert, set_key, AlertEvent, EventStatus};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     set_key("your-integration-key", None);
///
///     let response = push_alert(
///         AlertEvent::new("cpu idle low than 20%", EventStatus::Warning)
///             .with_label("service", "engine"),
///     )
///     .await?;
///
///     println!("alert key: {}", response.data.alert_key);
///     Ok(())
/// }
/// ```
pub async fn push_alert(event: AlertEvent) -> Result<PushResponse> {
    ambient_client().push_alert(event).await
}

/// Push an alert event using the process-wide configuration, blocking
///
/// Blocking form of [`push_alert`]; must not be called from within an
/// async runtime.
pub fn push_alert_blocking(event: AlertEvent) -> Result<PushResponse> {
    ambient_client().push_alert_blocking(event)
}
