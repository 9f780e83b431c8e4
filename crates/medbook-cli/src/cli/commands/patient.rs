//! Patient command handlers.

use anyhow::Result;
use medbook_core::api::types::Id;
use medbook_core::routes::Route;
use medbook_core::screens::patient;

use super::Client;
use crate::render::{self, Columns};

pub async fn doctors(client: &Client, specialization: Option<&str>) -> Result<()> {
    client.enter(Route::PatientDoctors)?;
    render::heading(&Route::PatientDoctors);

    let view = patient::doctors(client.gateway(), specialization).await;
    client.finish(&view, |doctors| render::doctors(doctors))
}

pub async fn doctor(client: &Client, id: &str) -> Result<()> {
    let route = Route::PatientDoctorDetail(id.to_string());
    client.enter(route.clone())?;
    render::heading(&route);

    let view = patient::doctor_detail(client.gateway(), &Id::new(id)).await;
    client.finish(&view, |detail| {
        render::doctor_detail(detail.doctor.as_ref(), &detail.slots);
    })
}

pub async fn book(client: &Client, doctor_id: &str, slot_id: &str) -> Result<()> {
    client.enter(Route::PatientDoctorDetail(doctor_id.to_string()))?;

    let view = patient::book(client.gateway(), &Id::new(doctor_id), &Id::new(slot_id)).await;
    client.finish(&view, |detail| {
        println!();
        render::doctor_detail(detail.doctor.as_ref(), &detail.slots);
    })
}

pub async fn appointments(client: &Client) -> Result<()> {
    client.enter(Route::PatientAppointments)?;
    render::heading(&Route::PatientAppointments);

    let view = patient::appointments(client.gateway()).await;
    client.finish(&view, |items| {
        render::appointments(
            items,
            Columns {
                doctor: true,
                patient: false,
            },
        );
    })
}
