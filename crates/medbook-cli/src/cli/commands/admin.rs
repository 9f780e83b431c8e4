//! Admin command handlers.

use anyhow::Result;
use medbook_core::api::types::{AppointmentFilter, Id};
use medbook_core::routes::Route;
use medbook_core::screens::admin::{self, DELETE_DOCTOR_PROMPT, DoctorForm};

use super::{Client, confirm, read_secret};
use crate::render::{self, Columns};

pub async fn doctors(client: &Client) -> Result<()> {
    client.enter(Route::AdminDoctors)?;
    render::heading(&Route::AdminDoctors);

    let view = admin::doctors(client.gateway()).await;
    client.finish(&view, |doctors| render::doctors(doctors))
}

pub async fn add_doctor(
    client: &Client,
    name: String,
    email: String,
    specialization: String,
    phone: Option<String>,
) -> Result<()> {
    client.enter(Route::AdminDoctors)?;
    let password = read_secret("Password")?;

    let form = DoctorForm {
        name,
        email,
        password,
        specialization,
        phone,
    };
    let view = admin::create_doctor(client.gateway(), &form).await;
    client.finish(&view, |doctors| render::doctors(doctors))
}

pub async fn delete_doctor(client: &Client, id: &str, yes: bool) -> Result<()> {
    client.enter(Route::AdminDoctors)?;
    if !confirm(DELETE_DOCTOR_PROMPT, yes)? {
        println!("Cancelled.");
        return Ok(());
    }

    let view = admin::delete_doctor(client.gateway(), &Id::new(id)).await;
    client.finish(&view, |doctors| render::doctors(doctors))
}

pub async fn appointments(
    client: &Client,
    doctor_id: Option<String>,
    status: Option<String>,
    date: Option<String>,
) -> Result<()> {
    client.enter(Route::AdminAppointments)?;
    render::heading(&Route::AdminAppointments);

    let filter = AppointmentFilter {
        doctor_id,
        status: status.map(|s| s.to_uppercase()),
        date,
    };
    let view = admin::appointments(client.gateway(), &filter).await;
    client.finish(&view, |items| {
        render::appointments(
            items,
            Columns {
                doctor: true,
                patient: true,
            },
        );
    })
}

pub async fn patients(client: &Client) -> Result<()> {
    client.enter(Route::AdminPatients)?;
    render::heading(&Route::AdminPatients);

    let view = admin::patients(client.gateway()).await;
    client.finish(&view, |items| render::patients(items))
}
