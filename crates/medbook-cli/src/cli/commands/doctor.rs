//! Doctor command handlers.

use anyhow::Result;
use medbook_core::api::types::Id;
use medbook_core::routes::Route;
use medbook_core::screens::doctor::{self, DELETE_SLOT_PROMPT, Decision, SlotForm};

use super::{Client, confirm};
use crate::render::{self, Columns};

const NO_SLOTS: &str = "No slots created yet";

const DOCTOR_COLUMNS: Columns = Columns {
    doctor: false,
    patient: true,
};

pub async fn slots(client: &Client) -> Result<()> {
    client.enter(Route::DoctorSlots)?;
    render::heading(&Route::DoctorSlots);

    let view = doctor::slots(client.gateway()).await;
    client.finish(&view, |slots| render::slots(slots, NO_SLOTS))
}

pub async fn add_slot(client: &Client, date: String, start: String, end: String) -> Result<()> {
    client.enter(Route::DoctorSlots)?;

    let form = SlotForm {
        date,
        start_time: start,
        end_time: end,
    };
    let view = doctor::add_slot(client.gateway(), &form).await;
    client.finish(&view, |slots| render::slots(slots, NO_SLOTS))
}

pub async fn delete_slot(client: &Client, id: &str, yes: bool) -> Result<()> {
    client.enter(Route::DoctorSlots)?;
    if !confirm(DELETE_SLOT_PROMPT, yes)? {
        println!("Cancelled.");
        return Ok(());
    }

    let view = doctor::delete_slot(client.gateway(), &Id::new(id)).await;
    client.finish(&view, |slots| render::slots(slots, NO_SLOTS))
}

pub async fn appointments(client: &Client) -> Result<()> {
    client.enter(Route::DoctorAppointments)?;
    render::heading(&Route::DoctorAppointments);

    let view = doctor::appointments(client.gateway()).await;
    client.finish(&view, |items| render::appointments(items, DOCTOR_COLUMNS))
}

pub async fn approve(client: &Client, id: &str) -> Result<()> {
    decide(client, id, Decision::Approve).await
}

pub async fn reject(client: &Client, id: &str) -> Result<()> {
    decide(client, id, Decision::Reject).await
}

async fn decide(client: &Client, id: &str, decision: Decision) -> Result<()> {
    client.enter(Route::DoctorAppointments)?;

    let view = doctor::decide(client.gateway(), &Id::new(id), decision).await;
    client.finish(&view, |items| render::appointments(items, DOCTOR_COLUMNS))
}
