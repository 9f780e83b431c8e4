//! Typed endpoints of the booking API.
//!
//! Thin wrappers that build [`ApiRequest`]s and decode responses. Every
//! method goes through the gateway so credentials and 401 handling apply.

pub mod types;

use crate::gateway::{ApiRequest, ApiResult, Gateway};
use types::{
    Appointment, AppointmentFilter, BookAppointment, Doctor, Id, LoginRequest, LoginResponse,
    NewDoctor, NewSlot, PatientRecord, RegisterPatient, Role, Slot,
};

#[derive(Debug, Clone, Copy)]
pub struct HospitalApi<'a> {
    gateway: &'a Gateway,
}

fn login_path(role: Role) -> &'static str {
    match role {
        Role::Patient => "patient/login",
        Role::Doctor => "doctor/login",
        Role::Admin => "admin/login",
    }
}

impl<'a> HospitalApi<'a> {
    pub fn new(gateway: &'a Gateway) -> Self {
        Self { gateway }
    }

    /// `POST {role}/login`. Does not touch the session; callers pass the
    /// response to the session store.
    pub async fn login(
        &self,
        role: Role,
        email: &str,
        password: &str,
    ) -> ApiResult<LoginResponse> {
        let request =
            ApiRequest::post(login_path(role)).json(&LoginRequest { email, password })?;
        self.gateway.fetch(request).await
    }

    pub async fn register_patient(&self, form: &RegisterPatient) -> ApiResult<()> {
        self.gateway
            .execute(ApiRequest::post("patient/register").json(form)?)
            .await
    }

    /// `GET doctors/`, filtered by specialization when one is given.
    pub async fn doctors(&self, specialization: Option<&str>) -> ApiResult<Vec<Doctor>> {
        let query = specialization
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| vec![("specialization", s.to_string())])
            .unwrap_or_default();
        self.gateway
            .fetch_list(ApiRequest::get("doctors/").query(query))
            .await
    }

    pub async fn doctor(&self, id: &Id) -> ApiResult<Doctor> {
        self.gateway
            .fetch(ApiRequest::get("doctors/").segment(id.as_str()))
            .await
    }

    pub async fn doctor_slots(&self, id: &Id) -> ApiResult<Vec<Slot>> {
        let request = ApiRequest::get("doctors/")
            .segment(id.as_str())
            .segment("slots");
        self.gateway.fetch_list(request).await
    }

    pub async fn book(&self, slot_id: &Id) -> ApiResult<()> {
        let body = BookAppointment {
            slot_id: slot_id.clone(),
        };
        self.gateway
            .execute(ApiRequest::post("appointments/").json(&body)?)
            .await
    }

    /// `GET appointments/`. The server scopes the list to the caller's role.
    pub async fn appointments(&self, filter: &AppointmentFilter) -> ApiResult<Vec<Appointment>> {
        self.gateway
            .fetch_list(ApiRequest::get("appointments/").query(filter.query_pairs()))
            .await
    }

    pub async fn approve(&self, id: &Id) -> ApiResult<()> {
        let request = ApiRequest::post("appointments/")
            .segment(id.as_str())
            .segment("approve");
        self.gateway.execute(request).await
    }

    pub async fn reject(&self, id: &Id) -> ApiResult<()> {
        let request = ApiRequest::post("appointments/")
            .segment(id.as_str())
            .segment("reject");
        self.gateway.execute(request).await
    }

    /// The logged-in doctor's slots.
    pub async fn my_slots(&self) -> ApiResult<Vec<Slot>> {
        self.gateway.fetch_list(ApiRequest::get("slots/")).await
    }

    pub async fn create_slot(&self, slot: &NewSlot) -> ApiResult<()> {
        self.gateway
            .execute(ApiRequest::post("slots/").json(slot)?)
            .await
    }

    pub async fn delete_slot(&self, id: &Id) -> ApiResult<()> {
        self.gateway
            .execute(ApiRequest::delete("slots/").segment(id.as_str()))
            .await
    }

    pub async fn admin_doctors(&self) -> ApiResult<Vec<Doctor>> {
        self.gateway
            .fetch_list(ApiRequest::get("admin/doctors/"))
            .await
    }

    pub async fn create_doctor(&self, doctor: &NewDoctor) -> ApiResult<()> {
        self.gateway
            .execute(ApiRequest::post("admin/doctors/").json(doctor)?)
            .await
    }

    pub async fn delete_doctor(&self, id: &Id) -> ApiResult<()> {
        self.gateway
            .execute(ApiRequest::delete("admin/doctors/").segment(id.as_str()))
            .await
    }

    pub async fn admin_patients(&self) -> ApiResult<Vec<PatientRecord>> {
        self.gateway
            .fetch_list(ApiRequest::get("admin/patients"))
            .await
    }
}
