//! Screen controllers.
//!
//! Each controller calls the API through the gateway and returns a
//! [`View`]: the data to show, plus an optional success message and an
//! optional inline error. Failures never escape as errors; they degrade to
//! an empty view with a message.

pub mod admin;
pub mod auth;
pub mod doctor;
pub mod landing;
pub mod patient;

use crate::gateway::{ApiError, ApiErrorKind, NETWORK_ERROR_MESSAGE, SESSION_EXPIRED_MESSAGE};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct View<T> {
    pub data: T,
    pub message: Option<String>,
    pub error: Option<String>,
}

impl<T> View<T> {
    pub fn ok(data: T) -> Self {
        Self {
            data,
            message: None,
            error: None,
        }
    }

    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    #[must_use]
    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

impl<T: Default> View<T> {
    /// Empty state with an inline error.
    pub fn failed(error: impl Into<String>) -> Self {
        Self::ok(T::default()).with_error(error)
    }
}

/// Server `detail`, else a transport-level message, else `fallback`.
pub(crate) fn detail_or(err: &ApiError, fallback: &str) -> String {
    if let Some(detail) = &err.detail {
        return detail.clone();
    }
    match err.kind {
        ApiErrorKind::Network => NETWORK_ERROR_MESSAGE.to_string(),
        ApiErrorKind::Unauthorized => SESSION_EXPIRED_MESSAGE.to_string(),
        _ => fallback.to_string(),
    }
}

/// Server `detail`, else the first message for `field`, else [`detail_or`].
pub(crate) fn detail_or_field(err: &ApiError, field: &str, fallback: &str) -> String {
    if err.detail.is_none()
        && let Some(first) = err.errors_for(field).first()
    {
        return first.clone();
    }
    detail_or(err, fallback)
}

/// Attaches the success message of a change to the view reloaded after it.
///
/// The change went through even when the reload failed, so the message is
/// kept next to the reload error.
pub(crate) fn with_success<T>(view: View<T>, message: impl Into<String>) -> View<T> {
    view.with_message(message)
}

pub(crate) fn require<'a>(value: &'a str, label: &str) -> Result<&'a str, String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(format!("{label} is required"))
    } else {
        Ok(trimmed)
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::time::Duration;

    use url::Url;
    use wiremock::MockServer;

    use crate::api::types::{Id, LoginResponse, Role};
    use crate::gateway::Gateway;
    use crate::navigation::Navigator;
    use crate::routes::Route;
    use crate::session::SessionStore;

    pub fn gateway(server: &MockServer, start: Route) -> Gateway {
        Gateway::new(
            Url::parse(&server.uri()).unwrap(),
            Some(Duration::from_secs(5)),
            SessionStore::in_memory(),
            Navigator::new(start),
        )
        .unwrap()
    }

    pub fn login_as(gateway: &Gateway, role: Role) {
        gateway
            .session()
            .login(&LoginResponse {
                access: Some("tok".to_string()),
                refresh: Some("ref".to_string()),
                role: Some(role.as_str().to_string()),
                user_id: Some(Id::from("1")),
                patient_id: (role == Role::Patient).then(|| Id::from("11")),
                doctor_id: (role == Role::Doctor).then(|| Id::from("21")),
            })
            .unwrap();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detail_or_prefers_detail() {
        let err = ApiError::from_response(404, r#"{"detail": "Not found."}"#);
        assert_eq!(detail_or(&err, "Failed"), "Not found.");
        let err = ApiError::from_response(500, "");
        assert_eq!(detail_or(&err, "Failed"), "Failed");
    }

    #[test]
    fn test_detail_or_field_uses_first_field_message() {
        let err = ApiError::from_response(400, r#"{"slot_id": ["Slot already booked", "x"]}"#);
        assert_eq!(
            detail_or_field(&err, "slot_id", "Failed to book appointment"),
            "Slot already booked"
        );
    }

    #[test]
    fn test_success_message_survives_reload_error() {
        let reloaded: View<Vec<u8>> = View::failed("Failed to load slots");
        let view = with_success(reloaded, "Slot added successfully");
        assert_eq!(view.message.as_deref(), Some("Slot added successfully"));
        assert_eq!(view.error.as_deref(), Some("Failed to load slots"));
    }

    #[test]
    fn test_failed_view_is_empty() {
        let view: View<Vec<u8>> = View::failed("boom");
        assert!(view.data.is_empty());
        assert!(view.is_error());
        assert_eq!(view.message, None);
    }
}
