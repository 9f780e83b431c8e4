//! Admin screens: doctor management, appointment overview, patients.

use tracing::info;

use super::{View, detail_or, require, with_success};
use crate::api::types::{Appointment, AppointmentFilter, Doctor, Id, NewDoctor, PatientRecord};
use crate::gateway::Gateway;

pub const DELETE_DOCTOR_PROMPT: &str =
    "Are you sure you want to delete this doctor? This action cannot be undone.";

pub async fn doctors(gateway: &Gateway) -> View<Vec<Doctor>> {
    match gateway.api().admin_doctors().await {
        Ok(doctors) => View::ok(doctors),
        Err(err) => View::failed(detail_or(&err, "Failed to load doctors")),
    }
}

#[derive(Debug, Clone, Default)]
pub struct DoctorForm {
    pub name: String,
    pub email: String,
    pub password: String,
    pub specialization: String,
    pub phone: Option<String>,
}

impl DoctorForm {
    /// # Errors
    /// Returns the first missing required field as a display message.
    pub fn validate(&self) -> Result<NewDoctor, String> {
        let name = require(&self.name, "Name")?;
        let email = require(&self.email, "Email")?;
        if self.password.is_empty() {
            return Err("Password is required".to_string());
        }
        let specialization = require(&self.specialization, "Specialization")?;
        let phone = self
            .phone
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(str::to_string);

        Ok(NewDoctor {
            name: name.to_string(),
            email: email.to_string(),
            password: self.password.clone(),
            specialization: specialization.to_string(),
            phone,
        })
    }
}

pub async fn create_doctor(gateway: &Gateway, form: &DoctorForm) -> View<Vec<Doctor>> {
    let body = match form.validate() {
        Ok(body) => body,
        Err(message) => return View::failed(message),
    };

    if let Err(err) = gateway.api().create_doctor(&body).await {
        return View::failed(err.display_message("Failed to create doctor"));
    }
    info!(specialization = %body.specialization, "doctor created");
    with_success(doctors(gateway).await, "Doctor created successfully")
}

/// Deletes a doctor. Confirmation happens in the caller.
pub async fn delete_doctor(gateway: &Gateway, id: &Id) -> View<Vec<Doctor>> {
    if let Err(err) = gateway.api().delete_doctor(id).await {
        return View::failed(detail_or(&err, "Failed to delete doctor"));
    }
    info!(doctor = %id, "doctor deleted");
    with_success(doctors(gateway).await, "Doctor deleted successfully")
}

/// All appointments, narrowed by whichever filters are non-empty.
pub async fn appointments(gateway: &Gateway, filter: &AppointmentFilter) -> View<Vec<Appointment>> {
    match gateway.api().appointments(filter).await {
        Ok(items) => View::ok(items),
        Err(err) => View::failed(detail_or(&err, "Failed to load appointments")),
    }
}

pub async fn patients(gateway: &Gateway) -> View<Vec<PatientRecord>> {
    match gateway.api().admin_patients().await {
        Ok(items) => View::ok(items),
        Err(err) => View::failed(detail_or(&err, "Failed to load patients")),
    }
}
