//! # Flashduty Push
//!
//! A Rust client library for pushing alert events to
//! [Flashduty](https://flashcat.cloud/) via the standard alert push API.
//!
//! ## Features
//!
//! - Push alert events (trigger, update, recover) via HTTP API
//! - Builder pattern for constructing events
//! - Async core plus a blocking entry point for synchronous callers
//! - Process-wide or per-client configuration of the integration key and
//!   an optional title prefix
//! - Typed success and error responses
//!
//! ## Example
//!
//! ```rust,no_run
//! use flashduty_push::{AlertEvent, EventStatus, FlashDutyClient};
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = FlashDutyClient::new("your-integration-key", Duration::from_secs(10))?;
//!
//!     let event = AlertEvent::new("cpu idle low than 20%", EventStatus::Warning)
//!         .with_label("service", "engine")
//!         .with_label("cluster", "nj")
//!         .with_label("resource", "es.nj.01")
//!         .with_description("node_cpu_seconds_total idle ratio below 20%");
//!
//!     let response = client.push_alert(event).await?;
//!     println!("alert key: {}", response.data.alert_key);
//!     Ok(())
//! }
//! ```
//!
//! Alternatively, configure the key once for the whole process and push
//! from anywhere:
//!
//! ```rust,no_run
//! use flashduty_push::{push_alert, set_key, AlertEvent, EventStatus};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     set_key("your-integration-key", Some("admin"));
//!
//!     let response = push_alert(AlertEvent::new("disk full", EventStatus::Critical)).await?;
//!     println!("request id: {}", response.request_id);
//!     Ok(())
//! }
//! ```

mod client;
mod errors;
mod global;
mod types;

pub use client::{FlashDutyClient, DEFAULT_API_URL};
pub use errors::{FlashDutyError, Result};
pub use global::{get_key, get_user, push_alert, push_alert_blocking, set_key};
pub use types::{
    AlertData, AlertEvent, ErrorBody, ErrorDetail, EventStatus, Image, PushResponse,
    MAX_DESCRIPTION_CHARS, MAX_LABELS, MAX_LABEL_KEY_CHARS, MAX_LABEL_VALUE_CHARS,
    MAX_TITLE_CHARS,
};
