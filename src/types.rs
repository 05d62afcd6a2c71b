use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt::{Display, Formatter};

use crate::errors::{FlashDutyError, Result};

/// Maximum length of an alert title, in characters.
pub const MAX_TITLE_CHARS: usize = 512;
/// Maximum length of an alert description, in characters.
pub const MAX_DESCRIPTION_CHARS: usize = 2048;
/// Maximum number of labels on a single alert event.
pub const MAX_LABELS: usize = 50;
/// Maximum length of a label key, in characters.
pub const MAX_LABEL_KEY_CHARS: usize = 128;
/// Maximum length of a label value, in characters.
pub const MAX_LABEL_VALUE_CHARS: usize = 2048;

/// Lifecycle status of an alert event
///
/// `Critical`, `Warning` and `Info` report an active problem at a severity;
/// `Ok` recovers (closes) the alert identified by its `alert_key`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum EventStatus {
    Critical,
    Warning,
    Info,
    Ok,
}

impl Display for EventStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            EventStatus::Critical => write!(f, "Critical"),
            EventStatus::Warning => write!(f, "Warning"),
            EventStatus::Info => write!(f, "Info"),
            EventStatus::Ok => write!(f, "Ok"),
        }
    }
}

/// Image attached to an alert notification
///
/// All fields are optional; `src` is the image URL, `href` a link target,
/// `alt` the alternative text.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Image {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub src: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
}

impl Image {
    /// Create an empty image
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the image URL
    #[must_use]
    pub fn with_src(mut self, src: &str) -> Self {
        self.src = Some(src.to_string());
        self
    }

    /// Set the link target opened when the image is clicked
    #[must_use]
    pub fn with_href(mut self, href: &str) -> Self {
        self.href = Some(href.to_string());
        self
    }

    /// Set the alternative text
    #[must_use]
    pub fn with_alt(mut self, alt: &str) -> Self {
        self.alt = Some(alt.to_string());
        self
    }
}

/// Alert event pushed to Flashduty
///
/// An event either opens/updates an alert (`Critical`/`Warning`/`Info`) or
/// recovers one (`Ok`). Flashduty correlates events through `alert_key`:
/// pushing with the same key updates the existing alert instead of creating
/// a new one.
///
/// # Example
///
/// ```rust
/// use flashduty_push::{AlertEvent, EventStatus};
///
/// let event = AlertEvent::new("cpu idle low than 20%", EventStatus::Warning)
///     .with_label("service", "engine")
///     .with_label("cluster", "nj")
///     .with_description("node_cpu_seconds_total idle ratio below threshold");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct AlertEvent {
    /// Alert title, at most 512 characters
    pub title_rule: String,

    /// Event status
    pub event_status: EventStatus,

    /// Identifier correlating this event with an existing alert.
    /// Absent means "create a new alert".
    pub alert_key: Option<String>,

    /// Alert description, at most 2048 characters
    pub description: Option<String>,

    /// Key-value annotations used for routing, grouping and filtering.
    /// At most 50 entries; keys at most 128 characters, values at most 2048.
    pub labels: Option<HashMap<String, String>>,

    /// Images attached to notifications
    pub images: Option<Vec<Image>>,

    /// Per-call integration key, overriding the client's configured key.
    /// Never serialized into the payload.
    pub integration_key: Option<String>,
}

impl AlertEvent {
    /// Create a new alert event with the given title and status
    pub fn new(title_rule: &str, event_status: EventStatus) -> Self {
        Self {
            title_rule: title_rule.to_string(),
            event_status,
            alert_key: None,
            description: None,
            labels: None,
            images: None,
            integration_key: None,
        }
    }

    /// Set the alert key
    ///
    /// Use the key returned by an earlier push to update or recover that
    /// alert instead of creating a new one.
    #[must_use]
    pub fn with_alert_key(mut self, alert_key: &str) -> Self {
        self.alert_key = Some(alert_key.to_string());
        self
    }

    /// Set the description
    #[must_use]
    pub fn with_description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }

    /// Add a single label
    #[must_use]
    pub fn with_label(mut self, key: &str, value: &str) -> Self {
        self.labels
            .get_or_insert_with(HashMap::new)
            .insert(key.to_string(), value.to_string());
        self
    }

    /// Replace all labels at once
    #[must_use]
    pub fn with_labels(mut self, labels: HashMap<String, String>) -> Self {
        self.labels = Some(labels);
        self
    }

    /// Append an image
    #[must_use]
    pub fn with_image(mut self, image: Image) -> Self {
        self.images.get_or_insert_with(Vec::new).push(image);
        self
    }

    /// Replace all images at once
    #[must_use]
    pub fn with_images(mut self, images: Vec<Image>) -> Self {
        self.images = Some(images);
        self
    }

    /// Use a different integration key for this event only
    ///
    /// Takes precedence over the key configured on the client or via
    /// [`set_key`](crate::set_key).
    #[must_use]
    pub fn with_integration_key(mut self, integration_key: &str) -> Self {
        self.integration_key = Some(integration_key.to_string());
        self
    }

    /// Check the event against Flashduty's documented field limits
    ///
    /// Runs before any network I/O on every push.
    pub fn validate(&self) -> Result<()> {
        let title_chars = self.title_rule.chars().count();
        if title_chars > MAX_TITLE_CHARS {
            return Err(FlashDutyError::Validation(format!(
                "title_rule exceeds {MAX_TITLE_CHARS} characters (got {title_chars})"
            )));
        }

        if let Some(description) = &self.description {
            let chars = description.chars().count();
            if chars > MAX_DESCRIPTION_CHARS {
                return Err(FlashDutyError::Validation(format!(
                    "description exceeds {MAX_DESCRIPTION_CHARS} characters (got {chars})"
                )));
            }
        }

        if let Some(labels) = &self.labels {
            if labels.len() > MAX_LABELS {
                return Err(FlashDutyError::Validation(format!(
                    "labels exceed {MAX_LABELS} entries (got {})",
                    labels.len()
                )));
            }
            for (key, value) in labels {
                if key.chars().count() > MAX_LABEL_KEY_CHARS {
                    return Err(FlashDutyError::Validation(format!(
                        "label key {key:?} exceeds {MAX_LABEL_KEY_CHARS} characters"
                    )));
                }
                if value.chars().count() > MAX_LABEL_VALUE_CHARS {
                    return Err(FlashDutyError::Validation(format!(
                        "value of label {key:?} exceeds {MAX_LABEL_VALUE_CHARS} characters"
                    )));
                }
            }
        }

        Ok(())
    }

    /// Build the wire payload, applying the user prefix to the title
    ///
    /// Absent optional fields are omitted from the JSON entirely, not
    /// serialized as `null`. The integration key never enters the payload;
    /// it travels as a query parameter.
    pub(crate) fn to_payload<'a>(&'a self, user_prefix: Option<&str>) -> AlertPayload<'a> {
        let title_rule = match user_prefix {
            Some(prefix) => Cow::Owned(format!("{prefix} {}", self.title_rule)),
            None => Cow::Borrowed(self.title_rule.as_str()),
        };

        AlertPayload {
            title_rule,
            event_status: self.event_status,
            alert_key: self.alert_key.as_deref(),
            description: self.description.as_deref(),
            labels: self.labels.as_ref(),
            images: self.images.as_deref(),
        }
    }
}

/// JSON body of the push request
#[derive(Debug, Serialize)]
pub(crate) struct AlertPayload<'a> {
    title_rule: Cow<'a, str>,
    event_status: EventStatus,

    #[serde(skip_serializing_if = "Option::is_none")]
    alert_key: Option<&'a str>,

    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<&'a str>,

    #[serde(skip_serializing_if = "Option::is_none")]
    labels: Option<&'a HashMap<String, String>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    images: Option<&'a [Image]>,
}

/// Successful push response
///
/// Returned by the API on HTTP 2xx. The nested `alert_key` identifies the
/// created or updated alert and can be fed back via
/// [`AlertEvent::with_alert_key`] for updates and recovery.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct PushResponse {
    pub request_id: String,
    pub data: AlertData,
}

/// Payload of a successful push response
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct AlertData {
    pub alert_key: String,
}

/// Error body returned by the API on HTTP 4xx/5xx
///
/// Decode one from an [`Api`](crate::FlashDutyError::Api) error via
/// [`FlashDutyError::api_error`](crate::FlashDutyError::api_error).
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct ErrorBody {
    pub request_id: String,
    pub error: ErrorDetail,
}

/// Machine-readable code and human-readable message of an API error
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_event_builder() {
        let event = AlertEvent::new("disk full", EventStatus::Warning)
            .with_alert_key("k1")
            .with_description("partition /var above 95%")
            .with_label("host", "h1")
            .with_label("service", "storage")
            .with_image(Image::new().with_src("https://example.com/graph.png"));

        assert_eq!(event.title_rule, "disk full");
        assert_eq!(event.event_status, EventStatus::Warning);
        assert_eq!(event.alert_key.as_deref(), Some("k1"));
        assert_eq!(
            event.labels.as_ref().unwrap().get("host"),
            Some(&"h1".to_string())
        );
        assert_eq!(event.labels.as_ref().unwrap().len(), 2);
        assert_eq!(event.images.as_ref().unwrap().len(), 1);
        assert!(event.integration_key.is_none());
    }

    #[test]
    fn test_payload_omits_absent_fields() {
        let event = AlertEvent::new("disk full", EventStatus::Warning);
        let value = serde_json::to_value(event.to_payload(None)).unwrap();

        assert_eq!(
            value,
            json!({"title_rule": "disk full", "event_status": "Warning"})
        );
    }

    #[test]
    fn test_payload_includes_present_fields() {
        let event = AlertEvent::new("disk full", EventStatus::Critical)
            .with_alert_key("k1")
            .with_description("desc")
            .with_label("host", "h1")
            .with_image(Image::new().with_src("https://example.com/a.png"));
        let value = serde_json::to_value(event.to_payload(None)).unwrap();

        assert_eq!(
            value,
            json!({
                "title_rule": "disk full",
                "event_status": "Critical",
                "alert_key": "k1",
                "description": "desc",
                "labels": {"host": "h1"},
                "images": [{"src": "https://example.com/a.png"}],
            })
        );
    }

    #[test]
    fn test_payload_title_prefix() {
        let event = AlertEvent::new("disk full", EventStatus::Warning);

        let value = serde_json::to_value(event.to_payload(Some("team-x"))).unwrap();
        assert_eq!(value["title_rule"], "team-x disk full");

        let value = serde_json::to_value(event.to_payload(None)).unwrap();
        assert_eq!(value["title_rule"], "disk full");
    }

    #[test]
    fn test_payload_excludes_integration_key() {
        let event =
            AlertEvent::new("disk full", EventStatus::Warning).with_integration_key("secret");
        let value = serde_json::to_value(event.to_payload(None)).unwrap();

        assert!(value.get("integration_key").is_none());
    }

    #[test]
    fn test_empty_labels_still_serialized() {
        // Presence, not non-emptiness, drives inclusion.
        let event = AlertEvent::new("t", EventStatus::Info).with_labels(HashMap::new());
        let value = serde_json::to_value(event.to_payload(None)).unwrap();

        assert_eq!(value["labels"], json!({}));
    }

    #[test]
    fn test_status_wire_labels() {
        for (status, label) in [
            (EventStatus::Critical, "Critical"),
            (EventStatus::Warning, "Warning"),
            (EventStatus::Info, "Info"),
            (EventStatus::Ok, "Ok"),
        ] {
            assert_eq!(serde_json::to_value(status).unwrap(), json!(label));
            assert_eq!(status.to_string(), label);
        }
    }

    #[test]
    fn test_validate_title_too_long() {
        let event = AlertEvent::new(&"x".repeat(MAX_TITLE_CHARS + 1), EventStatus::Info);
        let err = event.validate().unwrap_err();
        assert!(matches!(err, FlashDutyError::Validation(_)));
        assert!(err.to_string().contains("title_rule"));
    }

    #[test]
    fn test_validate_title_counts_chars_not_bytes() {
        // 512 multi-byte characters stay within the limit.
        let event = AlertEvent::new(&"告".repeat(MAX_TITLE_CHARS), EventStatus::Info);
        assert!(event.validate().is_ok());
    }

    #[test]
    fn test_validate_description_too_long() {
        let event = AlertEvent::new("t", EventStatus::Info)
            .with_description(&"x".repeat(MAX_DESCRIPTION_CHARS + 1));
        assert!(matches!(
            event.validate(),
            Err(FlashDutyError::Validation(_))
        ));
    }

    #[test]
    fn test_validate_too_many_labels() {
        let labels: HashMap<String, String> = (0..=MAX_LABELS)
            .map(|i| (format!("k{i}"), "v".to_string()))
            .collect();
        let event = AlertEvent::new("t", EventStatus::Info).with_labels(labels);
        assert!(matches!(
            event.validate(),
            Err(FlashDutyError::Validation(_))
        ));
    }

    #[test]
    fn test_validate_label_key_and_value_limits() {
        let event = AlertEvent::new("t", EventStatus::Info)
            .with_label(&"k".repeat(MAX_LABEL_KEY_CHARS + 1), "v");
        assert!(matches!(
            event.validate(),
            Err(FlashDutyError::Validation(_))
        ));

        let event = AlertEvent::new("t", EventStatus::Info)
            .with_label("k", &"v".repeat(MAX_LABEL_VALUE_CHARS + 1));
        assert!(matches!(
            event.validate(),
            Err(FlashDutyError::Validation(_))
        ));
    }

    #[test]
    fn test_validate_at_limits_passes() {
        let event = AlertEvent::new(&"t".repeat(MAX_TITLE_CHARS), EventStatus::Ok)
            .with_description(&"d".repeat(MAX_DESCRIPTION_CHARS))
            .with_labels(
                (0..MAX_LABELS)
                    .map(|i| (format!("k{i}"), "v".repeat(MAX_LABEL_VALUE_CHARS)))
                    .collect(),
            );
        assert!(event.validate().is_ok());
    }

    #[test]
    fn test_push_response_deserialization() {
        let response: PushResponse =
            serde_json::from_str(r#"{"request_id":"r1","data":{"alert_key":"k1"}}"#).unwrap();

        assert_eq!(response.request_id, "r1");
        assert_eq!(response.data.alert_key, "k1");
    }

    #[test]
    fn test_error_body_deserialization() {
        let body: ErrorBody = serde_json::from_str(
            r#"{"request_id":"r2","error":{"code":"InvalidParameter","message":"bad key"}}"#,
        )
        .unwrap();

        assert_eq!(body.request_id, "r2");
        assert_eq!(body.error.code, "InvalidParameter");
        assert_eq!(body.error.message, "bad key");
    }
}
