//! Patient screens: doctor discovery, booking and appointment history.

use tracing::info;

use super::{View, detail_or, detail_or_field, with_success};
use crate::api::types::{Appointment, AppointmentFilter, Doctor, Id, Slot};
use crate::gateway::Gateway;

pub async fn doctors(gateway: &Gateway, specialization: Option<&str>) -> View<Vec<Doctor>> {
    match gateway.api().doctors(specialization).await {
        Ok(doctors) => View::ok(doctors),
        Err(err) => View::failed(detail_or(&err, "Failed to load doctors")),
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DoctorDetail {
    pub doctor: Option<Doctor>,
    pub slots: Vec<Slot>,
}

/// Loads a doctor and their available slots in parallel.
pub async fn doctor_detail(gateway: &Gateway, id: &Id) -> View<DoctorDetail> {
    let api = gateway.api();
    let (doctor, slots) = tokio::join!(api.doctor(id), api.doctor_slots(id));
    match (doctor, slots) {
        (Ok(doctor), Ok(slots)) => View::ok(DoctorDetail {
            doctor: Some(doctor),
            slots,
        }),
        (Err(err), _) | (_, Err(err)) => {
            View::failed(detail_or(&err, "Failed to load doctor details"))
        }
    }
}

/// Requests an appointment for `slot_id`, then reloads the doctor's slots.
pub async fn book(gateway: &Gateway, doctor_id: &Id, slot_id: &Id) -> View<DoctorDetail> {
    if let Err(err) = gateway.api().book(slot_id).await {
        return View::failed(detail_or_field(&err, "slot_id", "Failed to book appointment"));
    }
    info!(doctor = %doctor_id, slot = %slot_id, "appointment requested");

    with_success(
        doctor_detail(gateway, doctor_id).await,
        "Appointment requested successfully.",
    )
}

/// The patient's own appointments; the server scopes the list.
pub async fn appointments(gateway: &Gateway) -> View<Vec<Appointment>> {
    match gateway.api().appointments(&AppointmentFilter::default()).await {
        Ok(items) => View::ok(items),
        Err(err) => View::failed(detail_or(&err, "Failed to load appointments")),
    }
}
