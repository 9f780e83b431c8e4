//! Login and registration screens.

use tracing::{info, warn};

use super::{View, require};
use crate::api::types::{RegisterPatient, Role};
use crate::gateway::{ApiError, ApiErrorKind, Gateway, NETWORK_ERROR_MESSAGE};
use crate::routes::Route;

pub const MIN_PASSWORD_LEN: usize = 8;

const INVALID_CREDENTIALS: &str = "Invalid credentials";
const REGISTRATION_FAILED: &str = "Registration failed";

/// Login screen for `role`.
pub fn login_route(role: Role) -> Route {
    match role {
        Role::Patient => Route::PatientLogin,
        Role::Doctor => Route::DoctorLogin,
        Role::Admin => Route::AdminLogin,
    }
}

fn login_error(err: &ApiError) -> String {
    if let Some(detail) = &err.detail {
        return detail.clone();
    }
    if let Some(first) = err.errors_for("non_field_errors").first() {
        return first.clone();
    }
    if err.kind == ApiErrorKind::Network {
        return NETWORK_ERROR_MESSAGE.to_string();
    }
    INVALID_CREDENTIALS.to_string()
}

/// Posts credentials and, on success, stores the session and moves to the
/// role's dashboard.
///
/// The returned view carries the dashboard route on success. On failure the
/// navigator stays on the login screen.
pub async fn login(
    gateway: &Gateway,
    role: Role,
    email: &str,
    password: &str,
) -> View<Option<Route>> {
    let email = email.trim();
    if email.is_empty() || password.is_empty() {
        return View::failed("Email and password are required");
    }

    let response = match gateway.api().login(role, email, password).await {
        Ok(response) => response,
        Err(err) => return View::failed(login_error(&err)),
    };

    let session = match gateway.session().login(&response) {
        Ok(session) => session,
        Err(err) => {
            warn!("rejected login response: {err}");
            return View::failed(err.to_string());
        }
    };

    let Some(actual) = session.role() else {
        return View::failed(INVALID_CREDENTIALS);
    };
    if actual != role {
        info!(expected = %role, actual = %actual, "logged in with a different role");
    }

    let dashboard = Route::dashboard_for(actual);
    gateway.navigator().navigate(dashboard.clone());
    View::ok(Some(dashboard)).with_message(format!("Logged in as {}", actual.label()))
}

/// Raw registration input, as typed by the user.
#[derive(Debug, Clone, Default)]
pub struct RegistrationForm {
    pub full_name: String,
    pub age: String,
    pub gender: String,
    pub phone: String,
    pub email: String,
    pub password: String,
    pub medical_history: Option<String>,
}

impl RegistrationForm {
    /// Client-side checks before anything is sent.
    ///
    /// # Errors
    /// Returns the first problem found, as a display message.
    pub fn validate(&self) -> Result<RegisterPatient, String> {
        let full_name = require(&self.full_name, "Full name")?;
        let age_raw = require(&self.age, "Age")?;
        let age = age_raw
            .parse::<u32>()
            .ok()
            .filter(|age| *age > 0)
            .ok_or_else(|| "Age must be a positive number".to_string())?;
        let gender = require(&self.gender, "Gender")?;
        let phone = require(&self.phone, "Phone")?;
        let email = require(&self.email, "Email")?;
        if self.password.is_empty() {
            return Err("Password is required".to_string());
        }
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(format!(
                "Password must be at least {MIN_PASSWORD_LEN} characters"
            ));
        }

        Ok(RegisterPatient {
            full_name: full_name.to_string(),
            age,
            gender: gender.to_string(),
            phone: phone.to_string(),
            email: email.to_string(),
            password: self.password.clone(),
            medical_history: self
                .medical_history
                .as_deref()
                .map(str::trim)
                .unwrap_or_default()
                .to_string(),
        })
    }
}

/// Registers a patient and moves to the patient login screen.
///
/// Validation and server errors keep the user on the registration screen.
pub async fn register(gateway: &Gateway, form: &RegistrationForm) -> View<bool> {
    let body = match form.validate() {
        Ok(body) => body,
        Err(message) => return View::failed(message),
    };

    if let Err(err) = gateway.api().register_patient(&body).await {
        return View::failed(err.display_message(REGISTRATION_FAILED));
    }

    info!("patient registered");
    gateway.navigator().navigate(Route::PatientLogin);
    View::ok(true).with_message("Registration successful. Please log in.")
}
