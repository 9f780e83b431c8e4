//! Request gateway: the only path from the client to the booking API.
//!
//! Every call goes through [`Gateway::send`], which attaches the bearer
//! credential from the session store, classifies failures into
//! [`ApiError`] and applies the [`AuthFailureHandler`] on 401.

mod error;
mod policy;

use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::Method;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};
use url::Url;

pub use error::{
    ApiError, ApiErrorKind, ApiResult, NETWORK_ERROR_MESSAGE, SESSION_EXPIRED_MESSAGE,
};
pub use policy::{AuthAction, AuthFailureHandler};

use crate::api::HospitalApi;
use crate::navigation::Navigator;
use crate::session::SessionStore;

/// One outbound call, relative to the API base URL.
///
/// `path` is a fixed endpoint prefix. Values that come from user input are
/// added with [`ApiRequest::segment`] and always stay a single path segment.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub segments: Vec<String>,
    pub query: Vec<(&'static str, String)>,
    pub body: Option<Value>,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            segments: Vec::new(),
            query: Vec::new(),
            body: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// Appends one path segment after `path`, followed by a trailing slash.
    ///
    /// `/`, `?` and `#` inside `segment` are percent-encoded; blank, `.` and
    /// `..` segments are refused when the request is sent.
    #[must_use]
    pub fn segment(mut self, segment: impl Into<String>) -> Self {
        self.segments.push(segment.into());
        self
    }

    #[must_use]
    pub fn query(mut self, pairs: Vec<(&'static str, String)>) -> Self {
        self.query.extend(pairs);
        self
    }

    /// Attaches a JSON body.
    ///
    /// # Errors
    /// Returns a `Payload` error if `body` cannot be serialized.
    pub fn json<B: Serialize + ?Sized>(mut self, body: &B) -> ApiResult<Self> {
        let value = serde_json::to_value(body)
            .map_err(|e| ApiError::payload(format!("Failed to encode request body: {e}")))?;
        self.body = Some(value);
        Ok(self)
    }
}

/// Raw successful response.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
}

#[derive(Debug, Clone)]
pub struct Gateway {
    http: reqwest::Client,
    base_url: Url,
    session: SessionStore,
    navigator: Navigator,
    policy: AuthFailureHandler,
}

impl Gateway {
    /// Builds a gateway for `base_url`.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(
        base_url: Url,
        timeout: Option<Duration>,
        session: SessionStore,
        navigator: Navigator,
    ) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().context("Failed to build HTTP client")?;

        let mut base_url = base_url;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        Ok(Self {
            http,
            base_url,
            session,
            navigator,
            policy: AuthFailureHandler::default(),
        })
    }

    #[must_use]
    pub fn with_policy(mut self, policy: AuthFailureHandler) -> Self {
        self.policy = policy;
        self
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    pub fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Typed endpoint surface.
    pub fn api(&self) -> HospitalApi<'_> {
        HospitalApi::new(self)
    }

    fn endpoint(&self, request: &ApiRequest) -> ApiResult<Url> {
        let path = &request.path;
        let mut url = self
            .base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| ApiError::payload(format!("Invalid API path '{path}': {e}")))?;
        if request.segments.is_empty() {
            return Ok(url);
        }

        if let Some(bad) = request
            .segments
            .iter()
            .find(|s| matches!(s.trim(), "" | "." | ".."))
        {
            return Err(ApiError::invalid_request(format!("Invalid identifier '{bad}'")));
        }
        url.path_segments_mut()
            .map_err(|()| ApiError::payload(format!("API base URL cannot carry '{path}'")))?
            .pop_if_empty()
            .extend(request.segments.iter().map(|s| s.trim()))
            .push("");
        Ok(url)
    }

    /// Sends `request` and returns the body of a 2xx response.
    ///
    /// # Errors
    /// Returns an [`ApiError`] for transport failures and non-2xx statuses.
    /// A 401 additionally invalidates the session the request was sent with.
    pub async fn send(&self, request: ApiRequest) -> ApiResult<ApiResponse> {
        let url = self.endpoint(&request)?;
        let session = self.session.snapshot();

        let mut builder = self.http.request(request.method.clone(), url);
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(token) = session.access_token() {
            builder = builder.bearer_auth(token);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        debug!(
            method = %request.method,
            path = %request.path,
            authenticated = session.is_active(),
            "api request"
        );

        let response = builder.send().await.map_err(|e| {
            warn!(path = %request.path, "request failed: {e}");
            ApiError::network(e.to_string())
        })?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| ApiError::network(format!("Failed to read response body: {e}")))?;

        debug!(path = %request.path, status, "api response");

        if (200..300).contains(&status) {
            return Ok(ApiResponse { status, body });
        }

        let error = ApiError::from_response(status, &body);
        let current = self.navigator.current();
        if let Some(action) = self.policy.on_status(status, &current) {
            warn!(path = %request.path, screen = %current, "credential rejected");
            if self.session.expire(session.version())
                && let Some(target) = action.redirect_target()
            {
                self.navigator.redirect(target.clone());
            }
        }
        Err(error)
    }

    /// Sends `request` and decodes the JSON body into `T`.
    ///
    /// # Errors
    /// See [`Gateway::send`]; an undecodable body is a `Payload` error.
    pub async fn fetch<T: DeserializeOwned>(&self, request: ApiRequest) -> ApiResult<T> {
        let path = request.path.clone();
        let response = self.send(request).await?;
        decode(&path, &response.body)
    }

    /// Like [`Gateway::fetch`] for list endpoints; an empty or `null` body
    /// is an empty list.
    ///
    /// # Errors
    /// See [`Gateway::fetch`].
    pub async fn fetch_list<T: DeserializeOwned>(&self, request: ApiRequest) -> ApiResult<Vec<T>> {
        let path = request.path.clone();
        let response = self.send(request).await?;
        let items: Option<Vec<T>> = decode(&path, &response.body)?;
        Ok(items.unwrap_or_default())
    }

    /// Sends `request` and discards the body.
    ///
    /// # Errors
    /// See [`Gateway::send`].
    pub async fn execute(&self, request: ApiRequest) -> ApiResult<()> {
        self.send(request).await.map(|_| ())
    }
}

fn decode<T: DeserializeOwned>(path: &str, body: &str) -> ApiResult<T> {
    let body = if body.trim().is_empty() { "null" } else { body };
    serde_json::from_str(body).map_err(|e| {
        warn!(path, "undecodable response: {e}");
        ApiError::payload(format!("Unexpected response from {path}: {e}"))
    })
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;
    use serde_json::json;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::api::types::{Id, LoginResponse};
    use crate::routes::Route;

    fn gateway_for(server: &MockServer, start: Route) -> Gateway {
        Gateway::new(
            Url::parse(&server.uri()).unwrap(),
            Some(Duration::from_secs(5)),
            SessionStore::in_memory(),
            Navigator::new(start),
        )
        .unwrap()
    }

    fn patient_login() -> LoginResponse {
        LoginResponse {
            access: Some("t1".to_string()),
            refresh: Some("r1".to_string()),
            role: Some("PATIENT".to_string()),
            user_id: Some(Id::from("5")),
            patient_id: Some(Id::from("9")),
            doctor_id: None,
        }
    }

    #[derive(Debug, Deserialize)]
    struct Named {
        name: String,
    }

    #[tokio::test]
    async fn test_bearer_header_is_attached_after_login() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/doctors/"))
            .and(header("authorization", "Bearer t1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"name": "Grey"}])))
            .expect(1)
            .mount(&server)
            .await;

        let gateway = gateway_for(&server, Route::PatientDoctors);
        gateway.session().login(&patient_login()).unwrap();

        let doctors: Vec<Named> = gateway
            .fetch_list(ApiRequest::get("doctors/"))
            .await
            .unwrap();
        assert_eq!(doctors.len(), 1);
        assert_eq!(doctors[0].name, "Grey");
    }

    #[tokio::test]
    async fn test_anonymous_request_has_no_authorization() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/patient/register"))
            .respond_with(ResponseTemplate::new(201))
            .mount(&server)
            .await;

        let gateway = gateway_for(&server, Route::PatientRegister);
        gateway
            .execute(ApiRequest::post("patient/register").json(&json!({})).unwrap())
            .await
            .unwrap();

        let received = server.received_requests().await.unwrap();
        assert_eq!(received.len(), 1);
        assert!(!received[0].headers.contains_key("authorization"));
    }

    #[tokio::test]
    async fn test_401_clears_session_and_redirects_home() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/appointments/7/approve/"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({
                "detail": "Given token not valid for any token type"
            })))
            .mount(&server)
            .await;

        let gateway = gateway_for(&server, Route::DoctorAppointments);
        gateway.session().login(&patient_login()).unwrap();

        let err = gateway
            .execute(ApiRequest::post("appointments/7/approve/"))
            .await
            .unwrap_err();

        assert_eq!(err.kind, ApiErrorKind::Unauthorized);
        assert!(!gateway.session().snapshot().is_active());
        assert_eq!(gateway.navigator().current(), Route::Landing);
        assert!(gateway.navigator().was_redirected());
    }

    #[tokio::test]
    async fn test_concurrent_401s_expire_once() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let gateway = gateway_for(&server, Route::PatientDoctorDetail("3".to_string()));
        let before = gateway.session().login(&patient_login()).unwrap().version();

        let (a, b) = tokio::join!(
            gateway.execute(ApiRequest::get("doctors/3/")),
            gateway.execute(ApiRequest::get("doctors/3/slots/")),
        );
        assert!(a.unwrap_err().is_unauthorized());
        assert!(b.unwrap_err().is_unauthorized());

        let after = gateway.session().snapshot();
        assert!(!after.is_active());
        assert_eq!(after.version(), before + 1);
        assert_eq!(gateway.navigator().current(), Route::Landing);
    }

    #[tokio::test]
    async fn test_401_on_login_screen_does_not_redirect() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/doctor/login"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({
                "detail": "No active account found with the given credentials"
            })))
            .mount(&server)
            .await;

        let gateway = gateway_for(&server, Route::DoctorLogin);
        let err = gateway
            .execute(ApiRequest::post("doctor/login"))
            .await
            .unwrap_err();

        assert_eq!(
            err.display_message("Invalid credentials"),
            "No active account found with the given credentials"
        );
        assert_eq!(gateway.navigator().current(), Route::DoctorLogin);
        assert!(!gateway.navigator().was_redirected());
    }

    #[tokio::test]
    async fn test_late_401_after_logout_is_noop() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let gateway = gateway_for(&server, Route::PatientAppointments);
        gateway.session().logout().unwrap();

        gateway
            .execute(ApiRequest::get("appointments/"))
            .await
            .unwrap_err();
        assert_eq!(gateway.navigator().current(), Route::PatientAppointments);
    }

    #[tokio::test]
    async fn test_other_errors_leave_session_alone() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/appointments/"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "slot_id": ["This slot is already booked."]
            })))
            .mount(&server)
            .await;

        let gateway = gateway_for(&server, Route::PatientDoctorDetail("1".to_string()));
        gateway.session().login(&patient_login()).unwrap();

        let err = gateway
            .execute(ApiRequest::post("appointments/").json(&json!({"slot_id": 4})).unwrap())
            .await
            .unwrap_err();
        assert_eq!(err.kind, ApiErrorKind::Validation);
        assert_eq!(err.errors_for("slot_id"), ["This slot is already booked."]);
        assert!(gateway.session().snapshot().is_active());
    }

    #[tokio::test]
    async fn test_query_pairs_are_sent() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/doctors/"))
            .and(query_param("specialization", "Cardiology"))
            .respond_with(ResponseTemplate::new(200).set_body_string(""))
            .expect(1)
            .mount(&server)
            .await;

        let gateway = gateway_for(&server, Route::PatientDoctors);
        let doctors: Vec<Named> = gateway
            .fetch_list(
                ApiRequest::get("doctors/")
                    .query(vec![("specialization", "Cardiology".to_string())]),
            )
            .await
            .unwrap();
        assert!(doctors.is_empty());
    }

    #[tokio::test]
    async fn test_unreachable_server_is_network_error() {
        // a port that was just free and has nothing listening on it
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let gateway = Gateway::new(
            Url::parse(&format!("http://127.0.0.1:{port}/api/")).unwrap(),
            Some(Duration::from_secs(5)),
            SessionStore::in_memory(),
            Navigator::new(Route::PatientDoctors),
        )
        .unwrap();

        let err = gateway
            .execute(ApiRequest::get("doctors/"))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ApiErrorKind::Network);
        assert_eq!(err.display_message("x"), NETWORK_ERROR_MESSAGE);
    }

    #[tokio::test]
    async fn test_identifier_stays_one_path_segment() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .respond_with(ResponseTemplate::new(204))
            .mount(&server)
            .await;

        let gateway = gateway_for(&server, Route::DoctorSlots);
        gateway
            .api()
            .delete_slot(&Id::new("../admin/doctors/5"))
            .await
            .unwrap();
        gateway.api().delete_slot(&Id::new("4?x=1")).await.unwrap();

        let paths: Vec<String> = server
            .received_requests()
            .await
            .unwrap()
            .iter()
            .map(|r| r.url.path().to_string())
            .collect();
        assert_eq!(paths, ["/slots/..%2Fadmin%2Fdoctors%2F5/", "/slots/4%3Fx=1/"]);
    }

    #[tokio::test]
    async fn test_dot_identifiers_are_refused_before_sending() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let gateway = gateway_for(&server, Route::DoctorAppointments);
        for id in ["..", ".", "  "] {
            let err = gateway.api().approve(&Id::new(id)).await.unwrap_err();
            assert_eq!(err.kind, ApiErrorKind::Validation);
            assert!(err.display_message("x").starts_with("Invalid identifier"));
        }
    }

    #[tokio::test]
    async fn test_nested_resource_path() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/doctors/4/slots/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .expect(1)
            .mount(&server)
            .await;

        let gateway = gateway_for(&server, Route::PatientDoctorDetail("4".into()));
        let slots = gateway.api().doctor_slots(&Id::from(4)).await.unwrap();
        assert!(slots.is_empty());
    }

    #[tokio::test]
    async fn test_bad_json_is_payload_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
            .mount(&server)
            .await;

        let gateway = gateway_for(&server, Route::PatientDoctors);
        let err = gateway
            .fetch::<Named>(ApiRequest::get("doctors/1/"))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ApiErrorKind::Payload);
    }
}
