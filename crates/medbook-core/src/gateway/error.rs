use std::fmt;

use serde_json::Value;

/// Message shown when the API cannot be reached at all.
pub const NETWORK_ERROR_MESSAGE: &str =
    "Network error. Please check if the backend server is running.";

/// Message shown after the session was invalidated by the server.
pub const SESSION_EXPIRED_MESSAGE: &str = "Session expired. Please log in again.";

/// Category of a failed API call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorKind {
    /// 401: credential missing, expired or invalid
    Unauthorized,
    /// 400/422 carrying field errors
    Validation,
    /// Other 4xx (forbidden, not found, business-rule rejection)
    Rejected,
    /// 5xx
    Server,
    /// Connection refused, DNS failure, timeout
    Network,
    /// Request or response body could not be (de)serialized
    Payload,
}

impl fmt::Display for ApiErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiErrorKind::Unauthorized => write!(f, "unauthorized"),
            ApiErrorKind::Validation => write!(f, "validation"),
            ApiErrorKind::Rejected => write!(f, "rejected"),
            ApiErrorKind::Server => write!(f, "server"),
            ApiErrorKind::Network => write!(f, "network"),
            ApiErrorKind::Payload => write!(f, "payload"),
        }
    }
}

/// Structured failure returned by the gateway.
#[derive(Debug, Clone)]
pub struct ApiError {
    pub kind: ApiErrorKind,
    /// HTTP status, when a response was received
    pub status: Option<u16>,
    /// One-line summary suitable for display
    pub message: String,
    /// Server `detail` message, if any
    pub detail: Option<String>,
    /// Per-field messages in the order the server sent the fields
    /// (`non_field_errors` included)
    pub field_errors: Vec<(String, Vec<String>)>,
}

impl ApiError {
    pub fn new(kind: ApiErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            status: None,
            message: message.into(),
            detail: None,
            field_errors: Vec::new(),
        }
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(ApiErrorKind::Network, message)
    }

    pub fn payload(message: impl Into<String>) -> Self {
        Self::new(ApiErrorKind::Payload, message)
    }

    /// A request refused before it was sent; `message` is shown as-is.
    pub fn invalid_request(message: impl Into<String>) -> Self {
        let message = message.into();
        Self {
            detail: Some(message.clone()),
            ..Self::new(ApiErrorKind::Validation, message)
        }
    }

    /// Builds an error from a non-success response.
    ///
    /// Understands DRF-style bodies: `{"detail": ".."}`,
    /// `{"non_field_errors": [..]}` and `{"field": ["..", ..]}`.
    pub fn from_response(status: u16, body: &str) -> Self {
        let kind = match status {
            401 => ApiErrorKind::Unauthorized,
            400 | 422 => ApiErrorKind::Validation,
            500..=599 => ApiErrorKind::Server,
            _ => ApiErrorKind::Rejected,
        };

        let mut detail = None;
        let mut field_errors = Vec::new();

        match serde_json::from_str::<Value>(body) {
            Ok(Value::Object(map)) => {
                for (key, value) in map {
                    if key == "detail" {
                        detail = value_to_messages(&value).into_iter().next();
                        continue;
                    }
                    let messages = value_to_messages(&value);
                    if !messages.is_empty() {
                        field_errors.push((key, messages));
                    }
                }
            }
            Ok(Value::String(text)) if !text.trim().is_empty() => {
                detail = Some(text.trim().to_string());
            }
            Ok(Value::Array(items)) => {
                let messages: Vec<String> = items.iter().flat_map(value_to_messages).collect();
                if !messages.is_empty() {
                    field_errors.push(("non_field_errors".to_string(), messages));
                }
            }
            _ => {}
        }

        let message = detail
            .as_ref()
            .map_or_else(|| format!("HTTP {status}"), |d| format!("HTTP {status}: {d}"));

        Self {
            kind,
            status: Some(status),
            message,
            detail,
            field_errors,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        self.kind == ApiErrorKind::Unauthorized
    }

    /// Messages attached to one field (empty if none).
    pub fn errors_for(&self, field: &str) -> &[String] {
        self.field_errors
            .iter()
            .find(|(name, _)| name == field)
            .map_or(&[][..], |(_, messages)| messages.as_slice())
    }

    /// All field messages joined into one display line.
    pub fn joined_field_errors(&self) -> Option<String> {
        let all: Vec<&str> = self
            .field_errors
            .iter()
            .flat_map(|(_, messages)| messages.iter().map(String::as_str))
            .collect();
        (!all.is_empty()).then(|| all.join(". "))
    }

    /// Best display line for the initiating screen.
    ///
    /// Order: server `detail`, then `non_field_errors`, then every field
    /// error joined, then a kind-specific message, then `fallback`.
    pub fn display_message(&self, fallback: &str) -> String {
        if let Some(detail) = &self.detail {
            return detail.clone();
        }
        let non_field = self.errors_for("non_field_errors");
        if !non_field.is_empty() {
            return non_field.join(". ");
        }
        if let Some(joined) = self.joined_field_errors() {
            return joined;
        }
        match self.kind {
            ApiErrorKind::Network => NETWORK_ERROR_MESSAGE.to_string(),
            ApiErrorKind::Unauthorized => SESSION_EXPIRED_MESSAGE.to_string(),
            _ => fallback.to_string(),
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ApiError {}

/// Result type for gateway operations.
pub type ApiResult<T> = std::result::Result<T, ApiError>;

fn value_to_messages(value: &Value) -> Vec<String> {
    match value {
        Value::String(text) => vec![text.clone()],
        Value::Array(items) => items.iter().flat_map(value_to_messages).collect(),
        Value::Object(map) => map.values().flat_map(value_to_messages).collect(),
        Value::Null => Vec::new(),
        other => vec![other.to_string()],
    }
}
