//! Doctor screens: slot management and appointment decisions.

use chrono::{NaiveDate, NaiveTime};
use tracing::info;

use super::{View, detail_or, require, with_success};
use crate::api::types::{Appointment, AppointmentFilter, Id, NewSlot, Slot};
use crate::gateway::Gateway;

pub const DELETE_SLOT_PROMPT: &str = "Are you sure you want to delete this slot?";

const DATE_FORMAT: &str = "%Y-%m-%d";
const TIME_FORMAT: &str = "%H:%M";

pub async fn slots(gateway: &Gateway) -> View<Vec<Slot>> {
    match gateway.api().my_slots().await {
        Ok(slots) => View::ok(slots),
        Err(err) => View::failed(detail_or(&err, "Failed to load slots")),
    }
}

#[derive(Debug, Clone, Default)]
pub struct SlotForm {
    pub date: String,
    pub start_time: String,
    pub end_time: String,
}

impl SlotForm {
    /// Checks formats only (`YYYY-MM-DD`, `HH:MM`); ordering and overlap
    /// are the server's business.
    ///
    /// # Errors
    /// Returns the first malformed field as a display message.
    pub fn validate(&self) -> Result<NewSlot, String> {
        let date = require(&self.date, "Date")?;
        NaiveDate::parse_from_str(date, DATE_FORMAT)
            .map_err(|_| "Date must be in YYYY-MM-DD format".to_string())?;
        let start = require(&self.start_time, "Start time")?;
        NaiveTime::parse_from_str(start, TIME_FORMAT)
            .map_err(|_| "Start time must be in HH:MM format".to_string())?;
        let end = require(&self.end_time, "End time")?;
        NaiveTime::parse_from_str(end, TIME_FORMAT)
            .map_err(|_| "End time must be in HH:MM format".to_string())?;

        Ok(NewSlot {
            date: date.to_string(),
            start_time: start.to_string(),
            end_time: end.to_string(),
        })
    }
}

/// Creates a slot and reloads the list.
pub async fn add_slot(gateway: &Gateway, form: &SlotForm) -> View<Vec<Slot>> {
    let slot = match form.validate() {
        Ok(slot) => slot,
        Err(message) => return View::failed(message),
    };

    if let Err(err) = gateway.api().create_slot(&slot).await {
        return View::failed(err.display_message("Failed to add slot"));
    }
    info!(date = %slot.date, "slot added");
    with_success(slots(gateway).await, "Slot added successfully")
}

/// Deletes a slot and reloads the list. Confirmation happens in the caller.
pub async fn delete_slot(gateway: &Gateway, id: &Id) -> View<Vec<Slot>> {
    if let Err(err) = gateway.api().delete_slot(id).await {
        return View::failed(detail_or(&err, "Failed to delete slot"));
    }
    info!(slot = %id, "slot deleted");
    with_success(slots(gateway).await, "Slot deleted successfully")
}

pub async fn appointments(gateway: &Gateway) -> View<Vec<Appointment>> {
    match gateway.api().appointments(&AppointmentFilter::default()).await {
        Ok(items) => View::ok(items),
        Err(err) => View::failed(detail_or(&err, "Failed to load appointments")),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Approve,
    Reject,
}

impl Decision {
    fn verb(self) -> &'static str {
        match self {
            Decision::Approve => "approve",
            Decision::Reject => "reject",
        }
    }

    fn past(self) -> &'static str {
        match self {
            Decision::Approve => "approved",
            Decision::Reject => "rejected",
        }
    }
}

/// Approves or rejects a pending appointment, then reloads the list.
pub async fn decide(gateway: &Gateway, id: &Id, decision: Decision) -> View<Vec<Appointment>> {
    let api = gateway.api();
    let result = match decision {
        Decision::Approve => api.approve(id).await,
        Decision::Reject => api.reject(id).await,
    };
    if let Err(err) = result {
        let fallback = format!("Failed to {} appointment", decision.verb());
        return View::failed(detail_or(&err, &fallback));
    }
    info!(appointment = %id, "appointment {}", decision.past());
    with_success(
        appointments(gateway).await,
        format!("Appointment {} successfully", decision.past()),
    )
}
